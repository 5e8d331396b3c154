//! Class ids of the built-in classes the resolver refers to by name.

use crate::{ClassId, FqName, Name, StringInterner};

/// Largest `kotlin/FunctionN` arity the builtins provide.
pub const MAX_FUNCTION_ARITY: usize = 22;

/// Pre-built ids of well-known classes, created once per interner.
#[derive(Clone, Debug)]
pub struct StandardClassIds {
    pub kotlin_package: FqName,
    pub collections_package: FqName,
    pub any: ClassId,
    pub nothing: ClassId,
    pub unit: ClassId,
    pub boolean: ClassId,
    pub char: ClassId,
    pub int: ClassId,
    pub long: ClassId,
    pub double: ClassId,
    pub number: ClassId,
    pub string: ClassId,
    pub char_sequence: ClassId,
    pub comparable: ClassId,
    pub throwable: ClassId,
    pub exception: ClassId,
    pub array: ClassId,
    pub iterable: ClassId,
    pub collection: ClassId,
    pub list: ClassId,
    pub map: ClassId,
    functions: Vec<ClassId>,
}

impl StandardClassIds {
    pub fn new(interner: &StringInterner) -> Self {
        let kotlin_package = FqName::parse(interner, "kotlin");
        let collections_package = FqName::parse(interner, "kotlin.collections");
        let kotlin = |name: &str| ClassId::top_level(kotlin_package.clone(), interner.intern(name));
        let collections =
            |name: &str| ClassId::top_level(collections_package.clone(), interner.intern(name));
        let functions = (0..=MAX_FUNCTION_ARITY)
            .map(|arity| kotlin(&format!("Function{arity}")))
            .collect();
        StandardClassIds {
            any: kotlin("Any"),
            nothing: kotlin("Nothing"),
            unit: kotlin("Unit"),
            boolean: kotlin("Boolean"),
            char: kotlin("Char"),
            int: kotlin("Int"),
            long: kotlin("Long"),
            double: kotlin("Double"),
            number: kotlin("Number"),
            string: kotlin("String"),
            char_sequence: kotlin("CharSequence"),
            comparable: kotlin("Comparable"),
            throwable: kotlin("Throwable"),
            exception: kotlin("Exception"),
            array: kotlin("Array"),
            iterable: collections("Iterable"),
            collection: collections("Collection"),
            list: collections("List"),
            map: collections("Map"),
            functions,
            kotlin_package,
            collections_package,
        }
    }

    /// `kotlin/Function{arity}`, if the builtins provide that arity.
    pub fn function(&self, arity: usize) -> Option<&ClassId> {
        self.functions.get(arity)
    }

    /// Arity of a `kotlin/FunctionN` class id.
    pub fn function_arity(&self, id: &ClassId) -> Option<usize> {
        self.functions.iter().position(|f| f == id)
    }

    pub fn all_functions(&self) -> &[ClassId] {
        &self.functions
    }

    pub fn is_primitive_number(&self, id: &ClassId) -> bool {
        *id == self.int || *id == self.long || *id == self.double
    }

    /// Name the synthetic when/try callee is registered under.
    pub fn synthetic_call_name(interner: &StringInterner, when: bool) -> Name {
        interner.intern(if when { "WHEN_CALL" } else { "TRY_CALL" })
    }
}
