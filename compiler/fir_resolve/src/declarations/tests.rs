use super::*;
use fir_tree::{
    DeclarationOrigin, FirBlock, FirSimpleFunction, FirTypeRef, FunctionSymbol, Name,
    StringInterner,
};
use pretty_assertions::assert_eq;

fn function_with_body(table: &DeclarationTable, name: Name) -> DeclId {
    table.register_with(Designation::default(), |id| {
        FirDeclaration::SimpleFunction(Box::new(FirSimpleFunction::new(
            FunctionSymbol(id),
            name,
            DeclarationOrigin::Source,
            None,
            Vec::new(),
            None,
            Vec::new(),
            FirTypeRef::Implicit,
            Some(FirBlock::empty()),
        )))
    })
}

#[test]
fn register_with_hands_out_the_new_id() {
    let interner = StringInterner::new();
    let table = DeclarationTable::new();
    let first = function_with_body(&table, interner.intern("a"));
    let second = function_with_body(&table, interner.intern("b"));
    assert_eq!(first, DeclId::from_raw(0));
    assert_eq!(second, DeclId::from_raw(1));
    let symbol = table
        .with(second, |d| d.as_function().map(FirSimpleFunction::symbol))
        .flatten();
    assert_eq!(symbol, Some(FunctionSymbol(second)));
}

#[test]
fn checked_out_declaration_shows_its_signature_only() {
    let interner = StringInterner::new();
    let table = DeclarationTable::new();
    let id = function_with_body(&table, interner.intern("f"));

    let declaration = table.checkout(id).expect("available");
    assert!(table.is_checked_out(id));
    let shadow = table.get(id).expect("registered");
    assert!(shadow.as_function().expect("function").body().is_none());
    assert!(declaration.as_function().expect("function").body().is_some());

    table.checkin(id, declaration);
    assert!(!table.is_checked_out(id));
    assert!(table
        .get(id)
        .and_then(|d| d.as_function().map(|f| f.body().is_some()))
        .unwrap_or(false));
}

#[test]
fn second_checkout_reports_recursion() {
    let interner = StringInterner::new();
    let table = DeclarationTable::new();
    let id = function_with_body(&table, interner.intern("f"));
    let _taken = table.checkout(id).expect("available");
    assert_eq!(table.checkout(id), Err(ResolveError::DeclarationInUse(id)));
    assert_eq!(
        table.checkout(DeclId::from_raw(9)),
        Err(ResolveError::UnknownDeclaration(DeclId::from_raw(9)))
    );
}

#[test]
#[should_panic(expected = "was not checked out")]
fn checkin_without_checkout_panics() {
    let interner = StringInterner::new();
    let table = DeclarationTable::new();
    let id = function_with_body(&table, interner.intern("f"));
    let copy = table.get(id).expect("registered");
    table.checkin(id, copy);
}

#[test]
fn designation_nesting_keeps_outermost_first() {
    let file = DeclId::from_raw(0);
    let outer = DeclId::from_raw(1);
    let inner = DeclId::from_raw(2);
    let designation = Designation::in_file(file).nested(outer).nested(inner);
    assert_eq!(designation.classes, vec![outer, inner]);
    assert_eq!(designation.innermost_class(), Some(inner));
}
