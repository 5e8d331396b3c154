use super::*;
use crate::{StandardClassIds, StringInterner, TypeParameterOwner};
use pretty_assertions::assert_eq;

#[test]
fn renders_arguments_and_nullability() {
    let interner = StringInterner::new();
    let std_ids = StandardClassIds::new(&interner);
    let ty = ConeType::class(
        std_ids.list.clone(),
        vec![ConeTypeProjection::Type {
            variance: Variance::Out,
            ty: ConeType::simple(std_ids.string.clone()).with_nullability(true),
        }],
        true,
    );
    assert_eq!(
        ty.render(&interner),
        "kotlin/collections/List<out kotlin/String?>?"
    );
}

#[test]
fn error_types_are_contagious_through_arguments() {
    let interner = StringInterner::new();
    let std_ids = StandardClassIds::new(&interner);
    let broken = ConeType::class(
        std_ids.list.clone(),
        vec![ConeTypeProjection::invariant(ConeType::error("nope"))],
        false,
    );
    assert!(!broken.is_error());
    assert!(broken.contains_error());
    assert_eq!(ConeType::error("nope").error_reason(), Some("nope"));
    assert_eq!(ConeType::error("nope").render(&interner), "ERROR CLASS: nope");
}

#[test]
fn nullability_is_not_applied_to_errors() {
    let error = ConeType::error("x");
    assert_eq!(error.with_nullability(true), error);
    assert!(!error.is_nullable());
}

#[test]
fn type_parameters_render_by_name() {
    let interner = StringInterner::new();
    let symbol = TypeParameterSymbol {
        owner: TypeParameterOwner::Synthetic(crate::SyntheticCallKind::When),
        index: 0,
        name: interner.intern("K"),
    };
    let ty = ConeType::type_parameter(symbol).with_nullability(true);
    assert_eq!(ty.render(&interner), "K?");
}
