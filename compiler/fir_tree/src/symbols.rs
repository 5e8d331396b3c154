//! Symbols: stable handles to declarations.
//!
//! A symbol owns no data. Trees refer to each other through symbols, and a
//! session turns a symbol back into its declaration (through the declaration
//! table for `DeclId`-based symbols, through the symbol provider for class
//! lookup tags).

use crate::{ClassId, Name};

/// Index of a named declaration in a session's declaration table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct DeclId(u32);

impl DeclId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        DeclId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identity of a local variable or value parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct LocalSymbolId(u32);

impl LocalSymbolId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        LocalSymbolId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A class-like declaration, identified by its lookup tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassLikeSymbol(pub ClassId);

impl ClassLikeSymbol {
    #[inline]
    pub fn class_id(&self) -> &ClassId {
        &self.0
    }
}

/// Declaration that owns a type parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeParameterOwner {
    Class(ClassId),
    Callable(DeclId),
    /// The synthetic callee used to unify `when`/`try` branches.
    Synthetic(SyntheticCallKind),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParameterSymbol {
    pub owner: TypeParameterOwner,
    pub index: u32,
    pub name: Name,
}

/// Functions and constructors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionSymbol(pub DeclId);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VariableSymbol {
    /// Member or top-level property.
    Property(DeclId),
    /// Local variable, value parameter or catch parameter.
    Local(LocalSymbolId),
}

/// Classifiers returned by classifier lookups.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClassifierSymbol {
    Class(ClassLikeSymbol),
    TypeParameter(TypeParameterSymbol),
}

/// Constructs that resolve through a fabricated callee.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SyntheticCallKind {
    When,
    Try,
}

/// Anything a resolved reference can point at.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FirSymbol {
    Class(ClassLikeSymbol),
    TypeParameter(TypeParameterSymbol),
    Function(FunctionSymbol),
    Variable(VariableSymbol),
    Synthetic(SyntheticCallKind),
}

impl From<ClassifierSymbol> for FirSymbol {
    fn from(symbol: ClassifierSymbol) -> Self {
        match symbol {
            ClassifierSymbol::Class(class) => FirSymbol::Class(class),
            ClassifierSymbol::TypeParameter(param) => FirSymbol::TypeParameter(param),
        }
    }
}
