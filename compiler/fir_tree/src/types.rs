//! Semantic ("cone") types.
//!
//! A cone type is what a type reference resolves to: a class lookup tag with
//! argument projections, a type-parameter type, or an explicit error type
//! carrying the reason resolution failed. Error types are values, never
//! panics: they flow through the tree like any other type.

use crate::{ClassId, StringLookup, TypeParameterSymbol};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Variance {
    Invariant,
    In,
    Out,
}

/// Type argument in a class type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConeTypeProjection {
    Star,
    Type { variance: Variance, ty: ConeType },
}

impl ConeTypeProjection {
    pub fn invariant(ty: ConeType) -> Self {
        ConeTypeProjection::Type {
            variance: Variance::Invariant,
            ty,
        }
    }

    /// The projected type, if this is not a star projection.
    pub fn ty(&self) -> Option<&ConeType> {
        match self {
            ConeTypeProjection::Star => None,
            ConeTypeProjection::Type { ty, .. } => Some(ty),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConeClassType {
    pub lookup_tag: ClassId,
    pub type_arguments: Vec<ConeTypeProjection>,
    pub nullable: bool,
    /// Function type whose first argument is the receiver (`A.(B) -> C`).
    pub extension_function: bool,
}

/// Why a type could not be resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConeErrorKind {
    /// A name or symbol lookup found nothing, or inference failed.
    Unresolved,
    /// A shape the resolver deliberately does not handle.
    Unsupported,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConeErrorType {
    pub kind: ConeErrorKind,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConeType {
    Class(ConeClassType),
    TypeParameter {
        symbol: TypeParameterSymbol,
        nullable: bool,
    },
    Error(ConeErrorType),
}

impl ConeType {
    pub fn class(lookup_tag: ClassId, type_arguments: Vec<ConeTypeProjection>, nullable: bool) -> Self {
        ConeType::Class(ConeClassType {
            lookup_tag,
            type_arguments,
            nullable,
            extension_function: false,
        })
    }

    /// Non-null class type without arguments.
    pub fn simple(lookup_tag: ClassId) -> Self {
        Self::class(lookup_tag, Vec::new(), false)
    }

    pub fn type_parameter(symbol: TypeParameterSymbol) -> Self {
        ConeType::TypeParameter {
            symbol,
            nullable: false,
        }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        ConeType::Error(ConeErrorType {
            kind: ConeErrorKind::Unresolved,
            reason: reason.into(),
        })
    }

    pub fn unsupported(reason: impl Into<String>) -> Self {
        ConeType::Error(ConeErrorType {
            kind: ConeErrorKind::Unsupported,
            reason: reason.into(),
        })
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, ConeType::Error(_))
    }

    /// True if this type or any argument is an error type.
    pub fn contains_error(&self) -> bool {
        match self {
            ConeType::Error(_) => true,
            ConeType::TypeParameter { .. } => false,
            ConeType::Class(class) => class
                .type_arguments
                .iter()
                .filter_map(ConeTypeProjection::ty)
                .any(ConeType::contains_error),
        }
    }

    pub fn error_reason(&self) -> Option<&str> {
        match self {
            ConeType::Error(error) => Some(&error.reason),
            _ => None,
        }
    }

    pub fn error_kind(&self) -> Option<ConeErrorKind> {
        match self {
            ConeType::Error(error) => Some(error.kind),
            _ => None,
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            ConeType::Class(class) => class.nullable,
            ConeType::TypeParameter { nullable, .. } => *nullable,
            ConeType::Error(_) => false,
        }
    }

    #[must_use]
    pub fn with_nullability(&self, nullable: bool) -> Self {
        match self {
            ConeType::Class(class) => ConeType::Class(ConeClassType {
                nullable,
                ..class.clone()
            }),
            ConeType::TypeParameter { symbol, .. } => ConeType::TypeParameter {
                symbol: symbol.clone(),
                nullable,
            },
            ConeType::Error(_) => self.clone(),
        }
    }

    pub fn class_id(&self) -> Option<&ClassId> {
        match self {
            ConeType::Class(class) => Some(&class.lookup_tag),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ConeClassType> {
        match self {
            ConeType::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Argument types, star projections skipped.
    pub fn argument_types(&self) -> impl Iterator<Item = &ConeType> {
        let args: &[ConeTypeProjection] = match self {
            ConeType::Class(class) => &class.type_arguments,
            _ => &[],
        };
        args.iter().filter_map(ConeTypeProjection::ty)
    }

    pub fn is_class(&self, id: &ClassId) -> bool {
        self.class_id() == Some(id)
    }

    pub fn render(&self, names: &dyn StringLookup) -> String {
        let mut out = String::new();
        self.render_into(names, &mut out);
        out
    }

    fn render_into(&self, names: &dyn StringLookup, out: &mut String) {
        match self {
            ConeType::Error(error) => {
                out.push_str("ERROR CLASS: ");
                out.push_str(&error.reason);
            }
            ConeType::TypeParameter { symbol, nullable } => {
                out.push_str(names.lookup(symbol.name));
                if *nullable {
                    out.push('?');
                }
            }
            ConeType::Class(class) => {
                out.push_str(&class.lookup_tag.render(names));
                if !class.type_arguments.is_empty() {
                    out.push('<');
                    for (i, arg) in class.type_arguments.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        match arg {
                            ConeTypeProjection::Star => out.push('*'),
                            ConeTypeProjection::Type { variance, ty } => {
                                match variance {
                                    Variance::Invariant => {}
                                    Variance::In => out.push_str("in "),
                                    Variance::Out => out.push_str("out "),
                                }
                                ty.render_into(names, out);
                            }
                        }
                    }
                    out.push('>');
                }
                if class.nullable {
                    out.push('?');
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
