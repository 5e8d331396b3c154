use super::*;

#[test]
fn interning_is_stable() {
    let interner = StringInterner::new();
    let foo = interner.intern("foo");
    let bar = interner.intern("bar");
    assert_eq!(foo, interner.intern("foo"));
    assert_ne!(foo, bar);
    assert_eq!(interner.lookup(foo), "foo");
    assert_eq!(interner.lookup(bar), "bar");
}

#[test]
fn empty_string_is_name_empty() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
}

#[test]
fn well_known_names_are_pre_interned() {
    let interner = StringInterner::new();
    let before = interner.len();
    interner.intern("Unit");
    interner.intern("WHEN_CALL");
    assert_eq!(interner.len(), before);
}

#[test]
fn shared_handles_see_the_same_table() {
    let a = SharedInterner::new();
    let b = a.clone();
    assert_eq!(a.intern("shared"), b.intern("shared"));
    assert_eq!(StringLookup::lookup(&b, a.intern("shared")), "shared");
}
