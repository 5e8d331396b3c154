use fir_tree::SharedInterner;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

#[test]
fn entries_split_into_owner_name_and_descriptor() {
    let entry = WhitelistEntry::parse("java/util/Map$Entry.comparingByKey()Ljava/util/Comparator;").expect("valid");
    assert_eq!(entry.owner, "java/util/Map$Entry");
    assert_eq!(entry.name, "comparingByKey");
    assert_eq!(entry.descriptor, "()Ljava/util/Comparator;");
    assert_eq!(entry.signature(), "comparingByKey()Ljava/util/Comparator;");
}

#[test]
fn malformed_entries_are_rejected() {
    let err = |entry: &str| WhitelistEntry::parse(entry).expect_err(entry);
    assert_eq!(
        err("java/lang/String.length"),
        WhitelistError::MissingParameterList {
            entry: "java/lang/String.length".to_owned()
        }
    );
    assert_eq!(
        err("length()I"),
        WhitelistError::MissingOwner {
            entry: "length()I".to_owned()
        }
    );
    assert_eq!(
        err("java//String.length()I"),
        WhitelistError::MissingOwner {
            entry: "java//String.length()I".to_owned()
        }
    );
    assert_eq!(
        err("java/lang/String.()I"),
        WhitelistError::EmptyName {
            entry: "java/lang/String.()I".to_owned()
        }
    );
    assert_eq!(
        err("java/lang/String.foo(Q)V"),
        WhitelistError::MalformedDescriptor {
            entry: "java/lang/String.foo(Q)V".to_owned(),
            offset: 21,
        }
    );
    assert!(matches!(err("java/lang/String.foo()"), WhitelistError::MalformedDescriptor { .. }));
    assert!(matches!(err("java/lang/String.foo(V)V"), WhitelistError::MalformedDescriptor { .. }));
    assert!(matches!(err("java/lang/String.foo(Ljava/lang/String)V"), WhitelistError::MalformedDescriptor { .. }));
    assert!(matches!(err("java/lang/String.foo()VV"), WhitelistError::MalformedDescriptor { .. }));
}

#[test]
fn owners_match_whole_names() {
    let whitelist = SignatureWhitelist::from_entries([
        "java/lang/String.length()I",
        "java/lang/StringBuilder.append(I)Ljava/lang/StringBuilder;",
        "java/lang/StringBuilder.length()I",
    ])
    .expect("valid entries");
    assert_eq!(whitelist.len(), 3);
    assert_eq!(whitelist.entries_for("java/lang/String").len(), 1);
    assert!(whitelist.contains("java/lang/String", "length()I"));
    assert!(!whitelist.contains("java/lang/String", "append(I)Ljava/lang/StringBuilder;"));
    assert!(whitelist.entries_for("java/lang").is_empty());
}

#[test]
fn signatures_are_grouped_by_name() {
    let interner = SharedInterner::new();
    let whitelist = SignatureWhitelist::from_entries([
        "java/lang/String.indexOf(I)I",
        "java/lang/String.indexOf(II)I",
        "java/lang/String.trim()Ljava/lang/String;",
        "java/lang/Object.notify()V",
    ])
    .expect("valid entries");
    let string = ClassId::parse(&interner, "java/lang/String");
    let grouped = whitelist.signatures_by_name(&interner, &*interner, &string);
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[&interner.intern("indexOf")], vec!["indexOf(I)I", "indexOf(II)I"]);
    assert_eq!(grouped[&interner.intern("trim")], vec!["trim()Ljava/lang/String;"]);
}

#[test]
fn nested_owners_use_dollar_names() {
    let interner = SharedInterner::new();
    let whitelist =
        SignatureWhitelist::from_entries(["java/util/Map$Entry.getKey()Ljava/lang/Object;"]).expect("valid entry");
    let entry = ClassId::parse(&interner, "java/util/Map.Entry");
    let grouped = whitelist.signatures_by_name(&interner, &*interner, &entry);
    assert_eq!(grouped[&interner.intern("getKey")], vec!["getKey()Ljava/lang/Object;"]);
}

#[test]
fn first_malformed_entry_fails_the_list() {
    let result = SignatureWhitelist::from_entries(["java/lang/String.length()I", "broken", "also broken"]);
    assert_eq!(
        result.map(|w| w.len()),
        Err(WhitelistError::MissingParameterList {
            entry: "broken".to_owned()
        })
    );
}

#[test]
fn duplicates_are_counted_once() {
    let whitelist = SignatureWhitelist::from_entries(["java/lang/String.length()I", "java/lang/String.length()I"])
        .expect("valid entries");
    assert_eq!(whitelist.len(), 1);
}

#[test]
fn builtin_table_parses_completely() {
    let whitelist = SignatureWhitelist::jvm_builtins();
    assert_eq!(whitelist.len(), JVM_BUILTINS.len());
    assert!(whitelist.contains("java/lang/String", "codePointAt(I)I"));
    assert!(whitelist.contains("java/util/List", "sort(Ljava/util/Comparator;)V"));
}

proptest! {
    #[test]
    fn parsing_never_panics(entry in "\\PC{0,40}") {
        let _ = WhitelistEntry::parse(&entry);
    }

    #[test]
    fn accepted_entries_render_back(
        owner in "[a-z]{1,6}(/[A-Z][a-z]{0,6}){1,2}",
        name in "[a-z][A-Za-z]{0,8}",
        params in "(I|J|Z|\\[I|Ljava/lang/String;){0,4}",
        ret in "(V|I|Ljava/lang/Object;)",
    ) {
        let text = format!("{owner}.{name}({params}){ret}");
        let entry = WhitelistEntry::parse(&text).expect("generated entries are well formed");
        prop_assert_eq!(format!("{}.{}", entry.owner, entry.signature()), text);
    }
}
