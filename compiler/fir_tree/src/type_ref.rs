//! Syntactic type references.
//!
//! A `FirTypeRef` starts out in one of the syntactic shapes (`User`,
//! `Function`, `ImplicitBuiltin`, `Delegated`, `Dynamic`) or `Implicit` when
//! the source omitted it, and is replaced by `Resolved` once a type resolver
//! or the body resolver has computed its cone type. Error type refs are
//! `Resolved` refs whose cone type is an error type.

use crate::{ClassId, ConeType, Name, StringLookup, Variance};

#[derive(Clone, Debug, PartialEq, Default)]
pub enum FirTypeRef {
    /// Omitted in source; inferred later.
    #[default]
    Implicit,
    Resolved(FirResolvedTypeRef),
    User(FirUserTypeRef),
    Function(FirFunctionTypeRef),
    /// A builtin the compiler refers to by id (`kotlin/Unit`, `kotlin/Any`).
    ImplicitBuiltin(ClassId),
    /// Wrapper around another type ref (delegation target in source).
    Delegated(Box<FirTypeRef>),
    Dynamic { nullable: bool },
}

#[derive(Clone, Debug, PartialEq)]
pub struct FirResolvedTypeRef {
    pub ty: ConeType,
}

/// One dotted segment of a user type, with its own type arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct FirQualifierPart {
    pub name: Name,
    pub type_arguments: Vec<FirTypeProjection>,
}

impl FirQualifierPart {
    pub fn simple(name: Name) -> Self {
        FirQualifierPart {
            name,
            type_arguments: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FirTypeProjection {
    Star,
    Type { variance: Variance, type_ref: FirTypeRef },
}

#[derive(Clone, Debug, PartialEq)]
pub struct FirUserTypeRef {
    pub qualifier: Vec<FirQualifierPart>,
    pub nullable: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FirFunctionTypeRef {
    pub receiver: Option<Box<FirTypeRef>>,
    pub parameters: Vec<FirTypeRef>,
    pub return_type: Box<FirTypeRef>,
    pub nullable: bool,
}

impl FirFunctionTypeRef {
    /// Arity of the `FunctionN` class: value parameters plus receiver.
    pub fn parameters_count(&self) -> usize {
        self.parameters.len() + usize::from(self.receiver.is_some())
    }
}

impl FirTypeRef {
    pub fn resolved(ty: ConeType) -> Self {
        FirTypeRef::Resolved(FirResolvedTypeRef { ty })
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Self::resolved(ConeType::error(reason))
    }

    /// Single-segment user type without arguments.
    pub fn user(name: Name, nullable: bool) -> Self {
        FirTypeRef::User(FirUserTypeRef {
            qualifier: vec![FirQualifierPart::simple(name)],
            nullable,
        })
    }

    #[inline]
    pub fn is_implicit(&self) -> bool {
        matches!(self, FirTypeRef::Implicit)
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        matches!(self, FirTypeRef::Resolved(_))
    }

    pub fn cone_type(&self) -> Option<&ConeType> {
        match self {
            FirTypeRef::Resolved(resolved) => Some(&resolved.ty),
            _ => None,
        }
    }

    /// The resolved type, or an error type naming what is still unresolved.
    pub fn cone_type_or_error(&self) -> ConeType {
        match self {
            FirTypeRef::Resolved(resolved) => resolved.ty.clone(),
            FirTypeRef::Implicit => ConeType::error("implicit type is not resolved yet"),
            _ => ConeType::error("type reference is not resolved yet"),
        }
    }

    pub fn is_error(&self) -> bool {
        self.cone_type().is_some_and(ConeType::is_error)
    }

    /// Source-like rendering, used in diagnostics.
    pub fn render(&self, names: &dyn StringLookup) -> String {
        let mut out = String::new();
        self.render_into(names, &mut out);
        out
    }

    fn render_into(&self, names: &dyn StringLookup, out: &mut String) {
        match self {
            FirTypeRef::Implicit => out.push_str("<implicit>"),
            FirTypeRef::Resolved(resolved) => out.push_str(&resolved.ty.render(names)),
            FirTypeRef::ImplicitBuiltin(id) => out.push_str(&id.render(names)),
            FirTypeRef::Delegated(inner) => inner.render_into(names, out),
            FirTypeRef::Dynamic { nullable } => {
                out.push_str("dynamic");
                if *nullable {
                    out.push('?');
                }
            }
            FirTypeRef::User(user) => {
                for (i, part) in user.qualifier.iter().enumerate() {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(names.lookup(part.name));
                    if !part.type_arguments.is_empty() {
                        out.push('<');
                        for (j, arg) in part.type_arguments.iter().enumerate() {
                            if j > 0 {
                                out.push_str(", ");
                            }
                            match arg {
                                FirTypeProjection::Star => out.push('*'),
                                FirTypeProjection::Type { variance, type_ref } => {
                                    match variance {
                                        Variance::Invariant => {}
                                        Variance::In => out.push_str("in "),
                                        Variance::Out => out.push_str("out "),
                                    }
                                    type_ref.render_into(names, out);
                                }
                            }
                        }
                        out.push('>');
                    }
                }
                if user.nullable {
                    out.push('?');
                }
            }
            FirTypeRef::Function(function) => {
                if function.nullable {
                    out.push('(');
                }
                if let Some(receiver) = &function.receiver {
                    receiver.render_into(names, out);
                    out.push('.');
                }
                out.push('(');
                for (i, param) in function.parameters.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    param.render_into(names, out);
                }
                out.push_str(") -> ");
                function.return_type.render_into(names, out);
                if function.nullable {
                    out.push_str(")?");
                }
            }
        }
    }
}
