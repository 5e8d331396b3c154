//! Implementation configuration: which fields of a leaf kind get their own
//! transform hook.
//!
//! By default a leaf's `transform_children` rewrites every child field in
//! field order. A pass that must control the order itself (resolving the
//! branches of a `when` only after its subject, a lambda's parameters before
//! its body) needs one hook per field instead; `separate` requests them, and
//! `transform_others` bundles the remaining children into one
//! `transform_other_children` hook.

use rustc_hash::FxHashMap;

use crate::model::{ElementId, TreeSchema};
use crate::SchemaError;

/// How one leaf kind is implemented.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Implementation {
    /// Fields with their own `transform_<field>` hook, in hook order.
    pub separate: Vec<String>,
    /// Whether the other children get a `transform_other_children` hook.
    pub transform_others: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ImplementationConfig {
    implementations: FxHashMap<ElementId, Implementation>,
}

impl ImplementationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `fields` of leaf kind `element` their own transform hooks.
    pub fn separate(
        &mut self,
        schema: &TreeSchema,
        element: &str,
        fields: &[&str],
        transform_others: bool,
    ) -> Result<(), SchemaError> {
        let id = schema.find(element)?;
        if !schema.is_leaf(id) {
            return Err(SchemaError::NotALeaf(element.to_owned()));
        }
        for field in fields {
            let Some(found) = schema.all_fields(id).iter().find(|f| f.name == *field) else {
                return Err(SchemaError::UnknownField {
                    element: element.to_owned(),
                    field: (*field).to_owned(),
                });
            };
            if !found.is_child() {
                return Err(SchemaError::SeparateSimpleField {
                    element: element.to_owned(),
                    field: (*field).to_owned(),
                });
            }
        }
        self.implementations.insert(
            id,
            Implementation {
                separate: fields.iter().map(|f| (*f).to_owned()).collect(),
                transform_others,
            },
        );
        Ok(())
    }

    /// The implementation of `element`; plain combined traversal if unconfigured.
    pub fn implementation(&self, element: ElementId) -> Implementation {
        self.implementations.get(&element).cloned().unwrap_or_default()
    }
}

/// Hooks the FIR passes rely on.
pub fn fir_implementations(schema: &TreeSchema) -> Result<ImplementationConfig, SchemaError> {
    let mut config = ImplementationConfig::new();
    config.separate(schema, "WhenExpression", &["subject", "subjectVariable", "branches"], true)?;
    config.separate(schema, "WhenBranch", &["condition", "result"], false)?;
    config.separate(schema, "TryExpression", &["tryBlock", "catches", "finallyBlock"], true)?;
    config.separate(schema, "Catch", &["parameter", "block"], false)?;
    config.separate(schema, "WhileLoop", &["condition", "block"], false)?;
    config.separate(schema, "DoWhileLoop", &["block", "condition"], false)?;
    config.separate(
        schema,
        "AnonymousFunction",
        &["valueParameters", "returnTypeRef", "body"],
        true,
    )?;
    config.separate(schema, "ValueParameter", &["returnTypeRef"], true)?;
    config.separate(
        schema,
        "FunctionCall",
        &["explicitReceiver", "typeArguments", "arguments"],
        false,
    )?;
    config.separate(
        schema,
        "SimpleFunction",
        &["typeParameters", "receiverTypeRef", "valueParameters", "returnTypeRef", "body"],
        false,
    )?;
    config.separate(schema, "RegularClass", &["typeParameters", "superTypeRefs"], false)?;
    config.separate(schema, "Property", &["receiverTypeRef", "returnTypeRef", "initializer"], false)?;
    config.separate(schema, "ReturnExpression", &["result"], false)?;
    Ok(config)
}

#[cfg(test)]
mod tests;
