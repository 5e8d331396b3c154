//! The schema and the hand-maintained `fir_tree` crate describe the same kinds.

use fir_tree::ElementKind;
use fir_tree_gen::fir_tree_schema;
use pretty_assertions::assert_eq;

#[test]
fn leaf_kinds_match_element_kinds() {
    let schema = fir_tree_schema().expect("FIR schema is valid");
    let mut generated: Vec<String> = schema
        .leaves()
        .into_iter()
        .map(|leaf| schema.element(leaf).schema_name())
        .collect();
    generated.sort();

    let mut tree: Vec<String> = ElementKind::ALL.iter().map(|k| k.name().to_owned()).collect();
    tree.sort();

    assert_eq!(generated, tree);
}

#[test]
fn generated_visitor_names_every_kind() {
    let schema = fir_tree_schema().expect("FIR schema is valid");
    let config = fir_tree_gen::fir_implementations(&schema).expect("FIR hooks are valid");
    let files = fir_tree_gen::generate(&schema, &config);
    let visitor = &files
        .iter()
        .find(|f| f.name == "visitor.rs")
        .expect("visitor is generated")
        .contents;
    for leaf in schema.leaves() {
        let snake = schema.element(leaf).snake_name();
        assert!(visitor.contains(&format!("fn visit_{snake}(")), "missing visit_{snake}");
    }
}
