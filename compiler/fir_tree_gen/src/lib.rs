//! FIR tree generator.
//!
//! The element kinds of the FIR tree, their inheritance and their fields are
//! described once, declaratively, in [`fir_tree_schema`]. From that schema and
//! an [`ImplementationConfig`] the printer emits the node structs, the
//! `FirVisitor` trait and the `FirTransformer` trait.
//!
//! Field order is inherited fields first (later parents before earlier ones),
//! own fields last, with a redeclared field moving to the redeclaring kind's
//! position. Generated traversal follows that order, which is what lets a
//! do-while loop visit its block before its condition.

mod config;
mod emitter;
mod error;
pub mod model;
mod printer;
mod schema;

pub use config::{fir_implementations, Implementation, ImplementationConfig};
pub use error::SchemaError;
pub use model::{ElementId, Field, FieldSet, FieldType, TreeBuilder, TreeSchema};
pub use printer::{describe_leaves, generate, GeneratedFile};
pub use schema::fir_tree_schema;
