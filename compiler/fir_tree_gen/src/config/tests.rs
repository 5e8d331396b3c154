use super::*;
use crate::fir_tree_schema;
use pretty_assertions::assert_eq;

#[test]
fn fir_configuration_is_valid() {
    let schema = fir_tree_schema().expect("FIR schema is valid");
    let config = fir_implementations(&schema).expect("FIR hooks are valid");
    let when = schema.find("WhenExpression").expect("kind exists");
    let implementation = config.implementation(when);
    assert_eq!(implementation.separate, vec!["subject", "subjectVariable", "branches"]);
    assert!(implementation.transform_others);
}

#[test]
fn unconfigured_leaves_use_combined_traversal() {
    let schema = fir_tree_schema().expect("FIR schema is valid");
    let config = fir_implementations(&schema).expect("FIR hooks are valid");
    let block = schema.find("Block").expect("kind exists");
    assert_eq!(config.implementation(block), Implementation::default());
}

#[test]
fn simple_fields_cannot_be_separated() {
    let schema = fir_tree_schema().expect("FIR schema is valid");
    let mut config = ImplementationConfig::new();
    assert_eq!(
        config.separate(&schema, "LoopJump", &["kind"], false),
        Err(SchemaError::SeparateSimpleField {
            element: "LoopJump".to_owned(),
            field: "kind".to_owned(),
        })
    );
}

#[test]
fn abstract_kinds_and_unknown_fields_are_rejected() {
    let schema = fir_tree_schema().expect("FIR schema is valid");
    let mut config = ImplementationConfig::new();
    assert_eq!(
        config.separate(&schema, "Expression", &["typeRef"], false),
        Err(SchemaError::NotALeaf("Expression".to_owned()))
    );
    assert!(matches!(
        config.separate(&schema, "Block", &["branches"], false),
        Err(SchemaError::UnknownField { .. })
    ));
    assert_eq!(
        config.separate(&schema, "Nope", &[], false),
        Err(SchemaError::UnknownElement("Nope".to_owned()))
    );
}
