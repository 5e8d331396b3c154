//! Type-parameter substitution.

use fir_tree::{ConeClassType, ConeType, ConeTypeProjection, TypeParameterSymbol};
use rustc_hash::FxHashMap;

use crate::FirSession;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Substitutor {
    map: FxHashMap<TypeParameterSymbol, ConeType>,
}

impl Substitutor {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (TypeParameterSymbol, ConeType)>) -> Self {
        Substitutor {
            map: pairs.into_iter().collect(),
        }
    }

    /// Maps the class's type parameters to the arguments of `ty`.
    ///
    /// Star projections map to `Any?`.
    pub fn for_class_type(session: &FirSession, ty: &ConeClassType) -> Self {
        let parameters = session
            .with_class(&ty.lookup_tag, |class| {
                class
                    .type_parameters()
                    .iter()
                    .map(|p| p.symbol().clone())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        let any = ConeType::class(session.standard().any.clone(), Vec::new(), true);
        Self::from_pairs(parameters.into_iter().zip(&ty.type_arguments).map(
            |(parameter, argument)| {
                let argument = argument.ty().cloned().unwrap_or_else(|| any.clone());
                (parameter, argument)
            },
        ))
    }

    pub fn insert(&mut self, parameter: TypeParameterSymbol, ty: ConeType) {
        self.map.insert(parameter, ty);
    }

    pub fn get(&self, parameter: &TypeParameterSymbol) -> Option<&ConeType> {
        self.map.get(parameter)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn substitute(&self, ty: &ConeType) -> ConeType {
        if self.map.is_empty() {
            return ty.clone();
        }
        match ty {
            ConeType::TypeParameter { symbol, nullable } => match self.map.get(symbol) {
                Some(replacement) if *nullable => replacement.with_nullability(true),
                Some(replacement) => replacement.clone(),
                None => ty.clone(),
            },
            ConeType::Class(class) => ConeType::Class(ConeClassType {
                lookup_tag: class.lookup_tag.clone(),
                type_arguments: class
                    .type_arguments
                    .iter()
                    .map(|a| self.substitute_projection(a))
                    .collect(),
                nullable: class.nullable,
                extension_function: class.extension_function,
            }),
            ConeType::Error(_) => ty.clone(),
        }
    }

    pub fn substitute_projection(&self, projection: &ConeTypeProjection) -> ConeTypeProjection {
        match projection {
            ConeTypeProjection::Star => ConeTypeProjection::Star,
            ConeTypeProjection::Type { variance, ty } => ConeTypeProjection::Type {
                variance: *variance,
                ty: self.substitute(ty),
            },
        }
    }

    /// `self` followed by `then`.
    #[must_use]
    pub fn compose(&self, then: &Substitutor) -> Substitutor {
        let mut map: FxHashMap<_, _> = self
            .map
            .iter()
            .map(|(k, v)| (k.clone(), then.substitute(v)))
            .collect();
        for (k, v) in &then.map {
            map.entry(k.clone()).or_insert_with(|| v.clone());
        }
        Substitutor { map }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fir_tree::{ClassId, StringInterner, TypeParameterOwner, Variance};
    use pretty_assertions::assert_eq;

    fn parameter(interner: &StringInterner, owner: &ClassId, name: &str) -> TypeParameterSymbol {
        TypeParameterSymbol {
            owner: TypeParameterOwner::Class(owner.clone()),
            index: 0,
            name: interner.intern(name),
        }
    }

    #[test]
    fn substitutes_inside_arguments_and_keeps_nullability() {
        let interner = StringInterner::new();
        let list = ClassId::parse(&interner, "kotlin/collections/List");
        let string = ClassId::parse(&interner, "kotlin/String");
        let t = parameter(&interner, &list, "T");
        let substitutor = Substitutor::from_pairs([(t.clone(), ConeType::simple(string.clone()))]);

        let list_of_t = ConeType::class(
            list.clone(),
            vec![ConeTypeProjection::Type {
                variance: Variance::Out,
                ty: ConeType::TypeParameter {
                    symbol: t,
                    nullable: true,
                },
            }],
            false,
        );
        let expected = ConeType::class(
            list,
            vec![ConeTypeProjection::Type {
                variance: Variance::Out,
                ty: ConeType::class(string, Vec::new(), true),
            }],
            false,
        );
        assert_eq!(substitutor.substitute(&list_of_t), expected);
    }

    #[test]
    fn composition_applies_the_second_to_the_first() {
        let interner = StringInterner::new();
        let owner = ClassId::parse(&interner, "p/Box");
        let int = ClassId::parse(&interner, "kotlin/Int");
        let a = parameter(&interner, &owner, "A");
        let b = TypeParameterSymbol {
            index: 1,
            ..parameter(&interner, &owner, "B")
        };
        let first = Substitutor::from_pairs([(a.clone(), ConeType::type_parameter(b.clone()))]);
        let second = Substitutor::from_pairs([(b.clone(), ConeType::simple(int.clone()))]);
        let composed = first.compose(&second);

        assert_eq!(composed.get(&a), Some(&ConeType::simple(int.clone())));
        assert_eq!(composed.get(&b), Some(&ConeType::simple(int)));
    }
}
