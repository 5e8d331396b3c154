//! Schema model: element kinds, their parent kinds and their fields.
//!
//! # Design
//!
//! An element kind names any number of parent kinds and inherits every field
//! they carry. Storage is flat: a leaf kind (one that no other kind names as
//! a parent) becomes a single struct holding the union of its inherited and
//! own fields, so a diamond never duplicates state.
//!
//! Field union follows declaration distance. Walking from the kind itself
//! outwards (own fields first, then each parent's full field list), the first
//! declaration of a name wins, and the result is reversed so that inherited
//! fields lead and own fields trail. Redeclaring an inherited field therefore
//! both overrides its attributes and moves it to the kind's own position,
//! which is how a kind reorders traversal (`doWhileLoop` puts `block` before
//! `condition`).

use rustc_hash::{FxHashMap, FxHashSet};

use crate::SchemaError;

// === Ids ===

/// Index of an element kind in its schema.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a non-element field type in its schema.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeId(u32);

impl TypeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

// === Types and fields ===

/// A field type that is not a tree element (`Name`, `bool`, `ClassId`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleType {
    /// Rust type name, used verbatim in generated code.
    pub name: String,
    /// Getters return it by value.
    pub copy: bool,
    /// A table handle for a named declaration; traversal goes through
    /// `visit_member` / `transform_member` instead of skipping it.
    pub member_ref: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    Simple(TypeId),
    Element(ElementId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    /// camelCase name as written in the schema.
    pub name: String,
    pub ty: FieldType,
    pub list: bool,
    pub nullable: bool,
    /// Exposes `replace_<name>`.
    pub replaceable: bool,
}

impl Field {
    pub fn simple(name: &str, ty: TypeId) -> Self {
        Self::new(name, FieldType::Simple(ty), false)
    }

    pub fn element(name: &str, element: ElementId) -> Self {
        Self::new(name, FieldType::Element(element), false)
    }

    pub fn list(name: &str, element: ElementId) -> Self {
        Self::new(name, FieldType::Element(element), true)
    }

    pub fn simple_list(name: &str, ty: TypeId) -> Self {
        Self::new(name, FieldType::Simple(ty), true)
    }

    fn new(name: &str, ty: FieldType, list: bool) -> Self {
        Field {
            name: name.to_owned(),
            ty,
            list,
            nullable: false,
            replaceable: false,
        }
    }

    /// Lists are never nullable; an empty list stands for absence.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = !self.list;
        self
    }

    #[must_use]
    pub fn with_replace(mut self) -> Self {
        self.replaceable = true;
        self
    }

    /// Holds tree elements, so traversal reaches it.
    pub fn is_child(&self) -> bool {
        matches!(self.ty, FieldType::Element(_))
    }
}

/// Reusable group of fields shared by several kinds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: Vec<Field>,
}

impl FieldSet {
    pub fn new(fields: impl IntoIterator<Item = Field>) -> Self {
        FieldSet {
            fields: fields.into_iter().collect(),
        }
    }

    /// Append another set's fields after this one's.
    #[must_use]
    pub fn with(mut self, other: &FieldSet) -> Self {
        self.fields.extend(other.fields.iter().cloned());
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

// === Elements ===

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    /// PascalCase kind name (`WhenExpression`).
    pub name: String,
    pub parents: Vec<ElementId>,
    pub fields: Vec<Field>,
}

impl Element {
    /// The generated struct name.
    pub fn type_name(&self) -> String {
        format!("Fir{}", self.name)
    }

    /// camelCase name, as element kinds are listed (`whenExpression`).
    pub fn schema_name(&self) -> String {
        decapitalize(&self.name)
    }

    /// snake_case name, as used in method names (`when_expression`).
    pub fn snake_name(&self) -> String {
        snake_case(&self.name)
    }
}

// === Builder ===

/// Collects types and element kinds, then validates them into a schema.
#[derive(Default)]
pub struct TreeBuilder {
    types: Vec<SimpleType>,
    elements: Vec<Element>,
    pending_parents: Vec<(ElementId, String)>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a simple type.
    pub fn ty(&mut self, name: &str, copy: bool) -> TypeId {
        self.push_type(SimpleType {
            name: name.to_owned(),
            copy,
            member_ref: false,
        })
    }

    /// Register a declaration-table handle type.
    pub fn member_ref_ty(&mut self, name: &str) -> TypeId {
        self.push_type(SimpleType {
            name: name.to_owned(),
            copy: true,
            member_ref: true,
        })
    }

    fn push_type(&mut self, ty: SimpleType) -> TypeId {
        let id = TypeId(index_u32(self.types.len()));
        self.types.push(ty);
        id
    }

    /// Declare an element kind with already-declared parents.
    pub fn element(&mut self, name: &str, parents: &[ElementId]) -> ElementId {
        let id = ElementId(index_u32(self.elements.len()));
        self.elements.push(Element {
            name: name.to_owned(),
            parents: parents.to_vec(),
            fields: Vec::new(),
        });
        id
    }

    /// Add a parent by name; resolved (and validated) in [`build`](Self::build).
    pub fn add_parent_by_name(&mut self, element: ElementId, parent: &str) {
        self.pending_parents.push((element, parent.to_owned()));
    }

    pub fn add_parent(&mut self, element: ElementId, parent: ElementId) {
        self.elements[element.index()].parents.push(parent);
    }

    pub fn fields(&mut self, element: ElementId, set: &FieldSet) {
        self.elements[element.index()]
            .fields
            .extend(set.fields.iter().cloned());
    }

    pub fn field(&mut self, element: ElementId, field: Field) {
        self.elements[element.index()].fields.push(field);
    }

    /// Validate and compute every kind's full field list.
    pub fn build(mut self) -> Result<TreeSchema, SchemaError> {
        let mut by_name = FxHashMap::default();
        for (i, element) in self.elements.iter().enumerate() {
            if by_name.insert(element.name.clone(), ElementId(index_u32(i))).is_some() {
                return Err(SchemaError::DuplicateElement(element.name.clone()));
            }
            let mut seen = FxHashSet::default();
            for field in &element.fields {
                if !seen.insert(field.name.as_str()) {
                    return Err(SchemaError::DuplicateField {
                        element: element.name.clone(),
                        field: field.name.clone(),
                    });
                }
            }
        }

        for (element, parent) in std::mem::take(&mut self.pending_parents) {
            let Some(&parent_id) = by_name.get(&parent) else {
                return Err(SchemaError::UnknownParent {
                    element: self.elements[element.index()].name.clone(),
                    parent,
                });
            };
            self.elements[element.index()].parents.push(parent_id);
        }

        check_acyclic(&self.elements)?;

        let mut all_fields: Vec<Option<Vec<Field>>> = vec![None; self.elements.len()];
        for i in 0..self.elements.len() {
            collect_all_fields(&self.elements, ElementId(index_u32(i)), &mut all_fields);
        }
        let all_fields = all_fields.into_iter().map(Option::unwrap_or_default).collect();

        Ok(TreeSchema {
            types: self.types,
            elements: self.elements,
            by_name,
            all_fields,
        })
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "schemas hold a few dozen kinds and types"
)]
fn index_u32(index: usize) -> u32 {
    index as u32
}

/// Depth-first search for a parent cycle, reported as the path around it.
fn check_acyclic(elements: &[Element]) -> Result<(), SchemaError> {
    #[derive(Copy, Clone, PartialEq)]
    enum Mark {
        Unvisited,
        OnPath,
        Done,
    }

    fn visit(
        elements: &[Element],
        id: ElementId,
        marks: &mut [Mark],
        path: &mut Vec<ElementId>,
    ) -> Result<(), SchemaError> {
        match marks[id.index()] {
            Mark::Done => return Ok(()),
            Mark::OnPath => {
                let start = path.iter().position(|p| *p == id).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..]
                    .iter()
                    .map(|p| elements[p.index()].name.clone())
                    .collect();
                cycle.push(elements[id.index()].name.clone());
                return Err(SchemaError::Cycle(cycle));
            }
            Mark::Unvisited => {}
        }
        marks[id.index()] = Mark::OnPath;
        path.push(id);
        for parent in &elements[id.index()].parents {
            visit(elements, *parent, marks, path)?;
        }
        path.pop();
        marks[id.index()] = Mark::Done;
        Ok(())
    }

    let mut marks = vec![Mark::Unvisited; elements.len()];
    let mut path = Vec::new();
    for i in 0..elements.len() {
        visit(elements, ElementId(index_u32(i)), &mut marks, &mut path)?;
    }
    Ok(())
}

fn collect_all_fields(
    elements: &[Element],
    id: ElementId,
    memo: &mut Vec<Option<Vec<Field>>>,
) -> Vec<Field> {
    if let Some(fields) = &memo[id.index()] {
        return fields.clone();
    }
    let element = &elements[id.index()];
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut reversed: Vec<Field> = Vec::new();
    for field in element.fields.iter().rev() {
        if seen.insert(field.name.clone()) {
            reversed.push(field.clone());
        }
    }
    for parent in &element.parents {
        for field in collect_all_fields(elements, *parent, memo).into_iter().rev() {
            if seen.insert(field.name.clone()) {
                reversed.push(field);
            }
        }
    }
    reversed.reverse();
    memo[id.index()] = Some(reversed.clone());
    reversed
}

// === Schema ===

/// A validated tree schema.
#[derive(Clone, Debug)]
pub struct TreeSchema {
    types: Vec<SimpleType>,
    elements: Vec<Element>,
    by_name: FxHashMap<String, ElementId>,
    all_fields: Vec<Vec<Field>>,
}

impl TreeSchema {
    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.index()]
    }

    pub fn ty(&self, id: TypeId) -> &SimpleType {
        &self.types[id.index()]
    }

    pub fn element_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        (0..self.elements.len()).map(|i| ElementId(index_u32(i)))
    }

    pub fn find(&self, name: &str) -> Result<ElementId, SchemaError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| SchemaError::UnknownElement(name.to_owned()))
    }

    /// Inherited and own fields, inherited first, one entry per name.
    pub fn all_fields(&self, id: ElementId) -> &[Field] {
        &self.all_fields[id.index()]
    }

    /// Fields that hold tree elements, in traversal order.
    pub fn child_fields(&self, id: ElementId) -> impl Iterator<Item = &Field> {
        self.all_fields(id).iter().filter(|f| f.is_child())
    }

    /// Kinds no other kind names as parent, in declaration order.
    pub fn leaves(&self) -> Vec<ElementId> {
        let parents: FxHashSet<ElementId> = self
            .elements
            .iter()
            .flat_map(|e| e.parents.iter().copied())
            .collect();
        self.element_ids().filter(|id| !parents.contains(id)).collect()
    }

    pub fn is_leaf(&self, id: ElementId) -> bool {
        self.elements.iter().all(|e| !e.parents.contains(&id))
    }

    /// True if `id` is `ancestor` or inherits from it.
    pub fn is_subkind_of(&self, id: ElementId, ancestor: ElementId) -> bool {
        id == ancestor
            || self.elements[id.index()]
                .parents
                .iter()
                .any(|p| self.is_subkind_of(*p, ancestor))
    }

    /// Rust type of a field in a generated struct.
    pub fn rust_type(&self, field: &Field) -> String {
        let base = match field.ty {
            FieldType::Simple(ty) => self.ty(ty).name.clone(),
            FieldType::Element(element) => self.element(element).type_name(),
        };
        if field.list {
            format!("Vec<{base}>")
        } else if field.nullable {
            format!("Option<{base}>")
        } else {
            base
        }
    }

    pub fn is_member_ref(&self, field: &Field) -> bool {
        match field.ty {
            FieldType::Simple(ty) => self.ty(ty).member_ref,
            FieldType::Element(_) => false,
        }
    }
}

// === Naming ===

pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `WhenExpression` / `calleeReference` to `when_expression` / `callee_reference`.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
