//! Subtyping over cone types.
//!
//! Nominal: `A <: B` when `B`'s class appears among `A`'s supertypes and the
//! arguments agree under declaration-site (or use-site) variance. `Nothing`
//! is below everything, `Any` above everything, and error types are
//! compatible with anything so one failure does not cascade.

use std::collections::VecDeque;

use fir_tree::{
    ClassId, ConeClassType, ConeType, ConeTypeProjection, FirDeclaration, StandardClassIds,
    TypeParameterOwner, TypeParameterSymbol, Variance,
};
use rustc_hash::FxHashSet;

use crate::substitution::Substitutor;
use crate::FirSession;

/// The type operations inference needs.
pub trait TypeContext {
    fn standard(&self) -> &StandardClassIds;

    fn is_subtype_of(&self, sub: &ConeType, sup: &ConeType) -> bool;

    /// Least common supertype, approximated by the first supertype of the
    /// first type that every type is a subtype of.
    fn common_super_type(&self, types: &[ConeType]) -> ConeType;

    fn type_parameter_bounds(&self, symbol: &TypeParameterSymbol) -> Vec<ConeType>;

    /// `ty` seen as an instance of `target`, if `target` is among its supertypes.
    fn supertype_as(&self, ty: &ConeType, target: &ClassId) -> Option<ConeClassType>;
}

pub struct SessionTypeContext<'s> {
    session: &'s FirSession,
}

impl<'s> SessionTypeContext<'s> {
    pub fn new(session: &'s FirSession) -> Self {
        SessionTypeContext { session }
    }
}

/// Resolved supertypes of a class type, substituted with its arguments.
///
/// A class without resolved supertypes inherits from `Any`.
pub fn direct_supertypes(session: &FirSession, ty: &ConeClassType) -> Vec<ConeType> {
    let any = &session.standard().any;
    if ty.lookup_tag == *any {
        return Vec::new();
    }
    let declared = session
        .with_class(&ty.lookup_tag, |class| {
            class.resolved_super_types().cloned().collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let substitutor = Substitutor::for_class_type(session, ty);
    let mut supertypes: Vec<ConeType> = declared
        .iter()
        .filter(|t| !t.is_error())
        .map(|t| substitutor.substitute(t).with_nullability(ty.nullable))
        .collect();
    if supertypes.is_empty() {
        supertypes.push(ConeType::class(any.clone(), Vec::new(), ty.nullable));
    }
    supertypes
}

fn bounds_or_any(session: &FirSession, symbol: &TypeParameterSymbol) -> Vec<ConeType> {
    let bounds = type_parameter_bounds(session, symbol);
    if bounds.is_empty() {
        vec![ConeType::class(session.standard().any.clone(), Vec::new(), true)]
    } else {
        bounds
    }
}

fn immediate_supertypes(session: &FirSession, ty: &ConeType) -> Vec<ConeType> {
    match ty {
        ConeType::Class(class) => direct_supertypes(session, class),
        ConeType::TypeParameter { symbol, nullable } => bounds_or_any(session, symbol)
            .into_iter()
            .map(|b| if *nullable { b.with_nullability(true) } else { b })
            .collect(),
        ConeType::Error(_) => Vec::new(),
    }
}

/// Every supertype of `ty`, nearest first, each class once.
pub fn all_supertypes(session: &FirSession, ty: &ConeType) -> Vec<ConeType> {
    let mut seen: FxHashSet<ClassId> = FxHashSet::default();
    if let Some(id) = ty.class_id() {
        seen.insert(id.clone());
    }
    let mut queue: VecDeque<ConeType> = immediate_supertypes(session, ty).into();
    let mut out = Vec::new();
    while let Some(next) = queue.pop_front() {
        if let Some(id) = next.class_id() {
            if !seen.insert(id.clone()) {
                continue;
            }
        }
        queue.extend(immediate_supertypes(session, &next));
        out.push(next);
    }
    out
}

/// `ty` seen as an instance of `target`: `ArrayList<String>` as `List`
/// gives `List<String>`.
pub fn supertype_as(session: &FirSession, ty: &ConeType, target: &ClassId) -> Option<ConeClassType> {
    if let ConeType::Class(class) = ty {
        if class.lookup_tag == *target {
            return Some(class.clone());
        }
    }
    all_supertypes(session, ty)
        .into_iter()
        .find_map(|t| match t {
            ConeType::Class(class) if class.lookup_tag == *target => Some(class),
            _ => None,
        })
}

pub fn type_parameter_bounds(session: &FirSession, symbol: &TypeParameterSymbol) -> Vec<ConeType> {
    let index = symbol.index as usize;
    let collect = |parameters: &[fir_tree::FirTypeParameter]| {
        parameters
            .get(index)
            .map(|p| p.bounds().iter().filter_map(|b| b.cone_type().cloned()).collect())
            .unwrap_or_default()
    };
    match &symbol.owner {
        TypeParameterOwner::Class(class_id) => session
            .with_class(class_id, |class| collect(class.type_parameters()))
            .unwrap_or_default(),
        TypeParameterOwner::Callable(id) => session
            .declarations()
            .with(*id, |d| match d {
                FirDeclaration::SimpleFunction(f) => collect(f.type_parameters()),
                _ => Vec::new(),
            })
            .unwrap_or_default(),
        TypeParameterOwner::Synthetic(_) => Vec::new(),
    }
}

fn declared_variances(session: &FirSession, class_id: &ClassId) -> Vec<Variance> {
    session
        .with_class(class_id, |class| {
            class.type_parameters().iter().map(|p| p.variance()).collect()
        })
        .unwrap_or_default()
}

impl SessionTypeContext<'_> {
    fn arguments_agree(
        &self,
        sub: &ConeClassType,
        sup: &ConeClassType,
    ) -> bool {
        let variances = declared_variances(self.session, &sup.lookup_tag);
        sub.type_arguments
            .iter()
            .zip(&sup.type_arguments)
            .enumerate()
            .all(|(index, (sub_arg, sup_arg))| {
                let (use_site, sup_ty) = match sup_arg {
                    ConeTypeProjection::Star => return true,
                    ConeTypeProjection::Type { variance, ty } => (*variance, ty),
                };
                let Some(sub_ty) = sub_arg.ty() else {
                    return false;
                };
                let variance = match use_site {
                    Variance::Invariant => variances.get(index).copied().unwrap_or(Variance::Invariant),
                    projected => projected,
                };
                match variance {
                    Variance::Out => self.is_subtype_of(sub_ty, sup_ty),
                    Variance::In => self.is_subtype_of(sup_ty, sub_ty),
                    Variance::Invariant => {
                        self.is_subtype_of(sub_ty, sup_ty) && self.is_subtype_of(sup_ty, sub_ty)
                    }
                }
            })
    }
}

impl TypeContext for SessionTypeContext<'_> {
    fn standard(&self) -> &StandardClassIds {
        self.session.standard()
    }

    fn is_subtype_of(&self, sub: &ConeType, sup: &ConeType) -> bool {
        if sub.is_error() || sup.is_error() {
            return true;
        }
        if sub.is_nullable() && !sup.is_nullable() {
            return false;
        }
        let standard = self.session.standard();
        if sub.is_class(&standard.nothing) || sup.is_class(&standard.any) {
            return true;
        }
        match (sub, sup) {
            (
                ConeType::TypeParameter { symbol: a, .. },
                ConeType::TypeParameter { symbol: b, .. },
            ) if a == b => true,
            (ConeType::TypeParameter { symbol, .. }, _) => bounds_or_any(self.session, symbol)
                .iter()
                .any(|bound| self.is_subtype_of(&bound.with_nullability(false), sup)),
            (_, ConeType::TypeParameter { .. }) => false,
            (ConeType::Class(_), ConeType::Class(sup_class)) => {
                let sub = sub.with_nullability(false);
                match supertype_as(self.session, &sub, &sup_class.lookup_tag) {
                    Some(found) => self.arguments_agree(&found, sup_class),
                    None => false,
                }
            }
            (ConeType::Error(_), _) | (_, ConeType::Error(_)) => true,
        }
    }

    fn common_super_type(&self, types: &[ConeType]) -> ConeType {
        let standard = self.session.standard();
        let nullable = types.iter().any(ConeType::is_nullable);
        let informative: Vec<ConeType> = types
            .iter()
            .filter(|t| !t.is_error() && !t.is_class(&standard.nothing))
            .map(|t| t.with_nullability(false))
            .collect();
        let Some(first) = informative.first() else {
            if let Some(error) = types.iter().find(|t| t.is_error()) {
                if types.iter().all(ConeType::is_error) {
                    return error.clone();
                }
            }
            return ConeType::class(standard.nothing.clone(), Vec::new(), nullable);
        };
        let fits = |candidate: &ConeType| informative.iter().all(|t| self.is_subtype_of(t, candidate));
        let common = std::iter::once(first.clone())
            .chain(all_supertypes(self.session, first))
            .map(|t| t.with_nullability(false))
            .find(|candidate| fits(candidate))
            .unwrap_or_else(|| ConeType::simple(standard.any.clone()));
        common.with_nullability(nullable)
    }

    fn type_parameter_bounds(&self, symbol: &TypeParameterSymbol) -> Vec<ConeType> {
        type_parameter_bounds(self.session, symbol)
    }

    fn supertype_as(&self, ty: &ConeType, target: &ClassId) -> Option<ConeClassType> {
        supertype_as(self.session, ty, target)
    }
}

#[cfg(test)]
mod tests;
