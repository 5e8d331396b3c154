//! Rust source printer.
//!
//! Emits three files from a schema and its implementation configuration:
//! - `elements.rs`: one struct per leaf kind with getters, `replace_*`
//!   methods, `accept`/`accept_children` and the transform hooks
//! - `visitor.rs`: `FirElementRef` and the `FirVisitor` trait
//! - `transformer.rs`: the `FirTransformer` trait
//!
//! Child traversal order is the schema's field order everywhere.

use rustc_hash::FxHashSet;

use crate::config::{Implementation, ImplementationConfig};
use crate::emitter::SourceEmitter;
use crate::model::{snake_case, ElementId, Field, FieldType, TreeSchema};

const HEADER: &str = "// Generated by fir-tree-gen. Do not edit.";

/// One generated source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: &'static str,
    pub contents: String,
}

/// Print every generated file.
pub fn generate(schema: &TreeSchema, config: &ImplementationConfig) -> Vec<GeneratedFile> {
    vec![
        GeneratedFile {
            name: "elements.rs",
            contents: print_elements(schema, config),
        },
        GeneratedFile {
            name: "visitor.rs",
            contents: print_visitor(schema),
        },
        GeneratedFile {
            name: "transformer.rs",
            contents: print_transformer(schema),
        },
    ]
}

// === Elements ===

pub fn print_elements(schema: &TreeSchema, config: &ImplementationConfig) -> String {
    let mut out = SourceEmitter::new();
    out.line(HEADER);
    out.blank();
    out.line("use crate::nodes::{transform_inplace, transform_opt, transform_slot};");
    out.line(&format!("use crate::{{{}}};", element_imports(schema).join(", ")));

    for leaf in schema.leaves() {
        out.blank();
        print_leaf(&mut out, schema, leaf, &config.implementation(leaf));
    }
    out.output()
}

/// Names `elements.rs` refers to but does not define.
fn element_imports(schema: &TreeSchema) -> Vec<String> {
    let mut names: FxHashSet<String> = FxHashSet::default();
    names.insert("FirTransformer".to_owned());
    names.insert("FirVisitor".to_owned());
    for leaf in schema.leaves() {
        for field in schema.all_fields(leaf) {
            match field.ty {
                FieldType::Simple(ty) => {
                    let name = &schema.ty(ty).name;
                    if name != "bool" && name != "String" {
                        names.insert(name.clone());
                    }
                }
                FieldType::Element(element) if !schema.is_leaf(element) => {
                    names.insert(schema.element(element).type_name());
                }
                FieldType::Element(_) => {}
            }
        }
    }
    let mut names: Vec<String> = names.into_iter().collect();
    names.sort();
    names
}

fn print_leaf(out: &mut SourceEmitter, schema: &TreeSchema, leaf: ElementId, imp: &Implementation) {
    let element = schema.element(leaf);
    let type_name = element.type_name();
    let fields = schema.all_fields(leaf);

    out.line("#[derive(Clone, Debug, PartialEq)]");
    out.open(&format!("pub struct {type_name}"));
    for field in fields {
        out.line(&format!(
            "pub(crate) {}: {},",
            snake_case(&field.name),
            schema.rust_type(field)
        ));
    }
    out.close();
    out.blank();

    out.open(&format!("impl {type_name}"));
    for field in fields {
        print_getter(out, schema, field);
    }
    for field in fields.iter().filter(|f| f.replaceable) {
        let name = snake_case(&field.name);
        out.open(&format!(
            "pub fn replace_{name}(&mut self, {name}: {})",
            schema.rust_type(field)
        ));
        out.line(&format!("self.{name} = {name};"));
        out.close();
        out.blank();
    }

    out.open("pub fn accept<V: FirVisitor<D> + ?Sized, D>(&self, visitor: &mut V, data: D) -> V::Output");
    out.line(&format!("visitor.visit_{}(self, data)", element.snake_name()));
    out.close();
    out.blank();

    print_accept_children(out, schema, leaf);
    print_transform_hooks(out, schema, leaf, imp);
    print_transform_children(out, schema, leaf, imp);
    out.close();
}

fn print_getter(out: &mut SourceEmitter, schema: &TreeSchema, field: &Field) {
    let name = snake_case(&field.name);
    let base = match field.ty {
        FieldType::Simple(ty) => schema.ty(ty).name.clone(),
        FieldType::Element(element) => schema.element(element).type_name(),
    };
    let copy = matches!(field.ty, FieldType::Simple(ty) if schema.ty(ty).copy);
    let (ret, body) = if field.list {
        (format!("&[{base}]"), format!("&self.{name}"))
    } else if field.nullable && copy {
        (format!("Option<{base}>"), format!("self.{name}"))
    } else if field.nullable {
        (format!("Option<&{base}>"), format!("self.{name}.as_ref()"))
    } else if copy {
        (base, format!("self.{name}"))
    } else {
        (format!("&{base}"), format!("&self.{name}"))
    };
    out.line("#[inline]");
    out.open(&format!("pub fn {name}(&self) -> {ret}"));
    out.line(&body);
    out.close();
    out.blank();
}

fn print_accept_children(out: &mut SourceEmitter, schema: &TreeSchema, leaf: ElementId) {
    out.open(
        "pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D)",
    );
    let mut any = false;
    for field in schema.all_fields(leaf) {
        let name = snake_case(&field.name);
        if schema.is_member_ref(field) {
            any = true;
            out.open(&format!("for member in &self.{name}"));
            out.line("visitor.visit_member(*member, data.clone());");
            out.close();
            continue;
        }
        if !field.is_child() {
            continue;
        }
        if field.list {
            any = true;
            out.open(&format!("for item in &self.{name}"));
            out.line("item.accept(visitor, data.clone());");
            out.close();
        } else if field.nullable {
            any = true;
            out.open(&format!("if let Some({name}) = &self.{name}"));
            out.line(&format!("{name}.accept(visitor, data.clone());"));
            out.close();
        } else {
            any = true;
            out.line(&format!("self.{name}.accept(visitor, data.clone());"));
        }
    }
    if !any {
        out.line("let _ = (visitor, data);");
    }
    out.close();
    out.blank();
}

/// The statement rewriting one field, or `None` for fields traversal skips.
fn transform_statement(schema: &TreeSchema, field: &Field) -> Option<String> {
    let name = snake_case(&field.name);
    if schema.is_member_ref(field) {
        return Some(format!(
            "for member in &self.{name} {{ transformer.transform_member(*member, data.clone()); }}"
        ));
    }
    let FieldType::Element(element) = field.ty else {
        return None;
    };
    let method = format!("transform_{}", schema.element(element).snake_name());
    Some(if field.list {
        format!("transform_inplace(&mut self.{name}, |e| transformer.{method}(e, data.clone()));")
    } else if field.nullable {
        format!("transform_opt(&mut self.{name}, |e| transformer.{method}(e, data.clone()));")
    } else {
        format!("transform_slot(&mut self.{name}, |e| transformer.{method}(e, data.clone()));")
    })
}

fn open_hook(out: &mut SourceEmitter, name: &str) {
    out.open(&format!(
        "pub fn {name}<D: Clone, T: FirTransformer<D> + ?Sized>(&mut self, transformer: &mut T, data: D)"
    ));
}

fn print_transform_hooks(
    out: &mut SourceEmitter,
    schema: &TreeSchema,
    leaf: ElementId,
    imp: &Implementation,
) {
    let fields = schema.all_fields(leaf);
    for separate in &imp.separate {
        let Some(field) = fields.iter().find(|f| f.name == *separate) else {
            continue;
        };
        let Some(statement) = transform_statement(schema, field) else {
            continue;
        };
        open_hook(out, &format!("transform_{}", snake_case(&field.name)));
        out.line(&statement);
        out.close();
        out.blank();
    }
    if imp.transform_others {
        open_hook(out, "transform_other_children");
        let mut any = false;
        for field in fields.iter().filter(|f| !imp.separate.contains(&f.name)) {
            if let Some(statement) = transform_statement(schema, field) {
                any = true;
                out.line(&statement);
            }
        }
        if !any {
            out.line("let _ = (transformer, data);");
        }
        out.close();
        out.blank();
    }
}

fn print_transform_children(
    out: &mut SourceEmitter,
    schema: &TreeSchema,
    leaf: ElementId,
    imp: &Implementation,
) {
    out.line("#[must_use]");
    out.open(
        "pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(mut self, transformer: &mut T, data: D) -> Self",
    );
    let mut any = false;
    for field in schema.all_fields(leaf) {
        if imp.separate.contains(&field.name) {
            any = true;
            out.line(&format!(
                "self.transform_{}(transformer, data.clone());",
                snake_case(&field.name)
            ));
        } else if !imp.transform_others {
            if let Some(statement) = transform_statement(schema, field) {
                any = true;
                out.line(&statement);
            }
        }
    }
    if imp.transform_others {
        any = true;
        out.line("self.transform_other_children(transformer, data.clone());");
    }
    if !any {
        out.line("let _ = (transformer, data);");
    }
    out.line("self");
    out.close();
}

// === Visitor ===

pub fn print_visitor(schema: &TreeSchema) -> String {
    let leaves = schema.leaves();
    let mut out = SourceEmitter::new();
    out.line(HEADER);
    out.blank();
    out.line("use crate::elements::*;");
    out.line("use crate::DeclId;");
    out.blank();

    out.line("/// Borrowed view of any element, handed to `visit_element`.");
    out.line("#[derive(Copy, Clone, Debug)]");
    out.open("pub enum FirElementRef<'a>");
    for leaf in &leaves {
        let element = schema.element(*leaf);
        out.line(&format!("{}(&'a {}),", element.name, element.type_name()));
    }
    out.close();
    out.blank();

    out.open("impl FirElementRef<'_>");
    out.open(
        "pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D)",
    );
    out.open("match self");
    for leaf in &leaves {
        let element = schema.element(*leaf);
        out.line(&format!(
            "FirElementRef::{}(e) => e.accept_children(visitor, data),",
            element.name
        ));
    }
    out.close();
    out.close();
    out.close();
    out.blank();

    out.open("pub trait FirVisitor<D>");
    out.line("type Output;");
    out.blank();
    out.line("fn visit_element(&mut self, element: FirElementRef<'_>, data: D) -> Self::Output;");
    out.blank();
    out.open("fn visit_member(&mut self, member: DeclId, data: D)");
    out.line("let _ = (member, data);");
    out.close();
    for leaf in &leaves {
        let element = schema.element(*leaf);
        let param = element.snake_name();
        out.blank();
        out.open(&format!(
            "fn visit_{param}(&mut self, {param}: &{}, data: D) -> Self::Output",
            element.type_name()
        ));
        out.line(&format!(
            "self.visit_element(FirElementRef::{}({param}), data)",
            element.name
        ));
        out.close();
    }
    out.close();
    out.output()
}

// === Transformer ===

pub fn print_transformer(schema: &TreeSchema) -> String {
    let mut out = SourceEmitter::new();
    out.line(HEADER);
    out.blank();
    out.line("use crate::elements::*;");
    out.line("use crate::DeclId;");
    out.blank();

    out.open("pub trait FirTransformer<D: Clone>");

    // Abstract kinds used as field types dispatch on the concrete kind.
    let mut categories: Vec<ElementId> = schema
        .element_ids()
        .filter(|id| !schema.is_leaf(*id))
        .filter(|id| {
            schema.leaves().iter().any(|leaf| {
                schema
                    .all_fields(*leaf)
                    .iter()
                    .any(|f| f.ty == FieldType::Element(*id))
            })
        })
        .collect();
    categories.sort();
    for category in categories {
        let element = schema.element(category);
        let param = element.snake_name();
        out.open(&format!(
            "fn transform_{param}(&mut self, {param}: {ty}, data: D) -> {ty}",
            ty = element.type_name()
        ));
        out.line(&format!("{param}.transform(self, data)"));
        out.close();
        out.blank();
    }

    out.open("fn transform_member(&mut self, member: DeclId, data: D)");
    out.line("let _ = (member, data);");
    out.close();

    for leaf in schema.leaves() {
        let element = schema.element(leaf);
        let param = element.snake_name();
        out.blank();
        out.open(&format!(
            "fn transform_{param}(&mut self, {param}: {ty}, data: D) -> {ty}",
            ty = element.type_name()
        ));
        out.line(&format!("{param}.transform_children(self, data)"));
        out.close();
    }
    out.close();
    out.output()
}

// === Listing ===

/// Human-readable listing of every leaf kind and its fields.
pub fn describe_leaves(schema: &TreeSchema) -> String {
    let mut out = SourceEmitter::new();
    for leaf in schema.leaves() {
        let element = schema.element(leaf);
        let parents: Vec<&str> = element
            .parents
            .iter()
            .map(|p| schema.element(*p).name.as_str())
            .collect();
        if parents.is_empty() {
            out.open(&element.schema_name());
        } else {
            out.open(&format!("{}: {}", element.schema_name(), parents.join(", ")));
        }
        for field in schema.all_fields(leaf) {
            let marker = if field.replaceable { " [replace]" } else { "" };
            out.line(&format!("{}: {}{marker}", field.name, schema.rust_type(field)));
        }
        out.close();
    }
    out.output()
}
