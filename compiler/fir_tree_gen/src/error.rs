//! Schema construction errors.

/// A tree schema that cannot be turned into source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("element `{element}` names unknown parent kind `{parent}`")]
    UnknownParent { element: String, parent: String },

    #[error("element kind `{0}` is declared twice")]
    DuplicateElement(String),

    #[error("element `{element}` declares field `{field}` twice")]
    DuplicateField { element: String, field: String },

    #[error("cyclic schema: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    #[error("no element kind named `{0}`")]
    UnknownElement(String),

    #[error("`{element}` has no field `{field}`")]
    UnknownField { element: String, field: String },

    #[error("field `{field}` of `{element}` holds no tree elements and cannot get its own transform hook")]
    SeparateSimpleField { element: String, field: String },

    #[error("`{0}` has child kinds, only leaf kinds get implementations")]
    NotALeaf(String),
}
