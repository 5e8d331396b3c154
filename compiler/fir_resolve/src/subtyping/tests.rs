use fir_tree::{ConeTypeProjection, ResolvePhase, TypeParameterOwner, Variance};
use pretty_assertions::assert_eq;

use super::*;
use crate::phases::resolve_to;
use crate::{FirBuilder, ResolveConfig};

fn session() -> FirSession {
    FirSession::new(ResolveConfig::new())
}

fn simple(id: &ClassId) -> ConeType {
    ConeType::simple(id.clone())
}

fn applied(id: &ClassId, argument: ConeType) -> ConeType {
    ConeType::class(id.clone(), vec![ConeTypeProjection::invariant(argument)], false)
}

fn projected(id: &ClassId, variance: Variance, argument: ConeType) -> ConeType {
    ConeType::class(id.clone(), vec![ConeTypeProjection::Type { variance, ty: argument }], false)
}

#[test]
fn nominal_subtyping_follows_declared_supertypes() {
    let s = session();
    let std = s.standard();
    let cx = SessionTypeContext::new(&s);
    assert!(cx.is_subtype_of(&simple(&std.int), &simple(&std.number)));
    assert!(cx.is_subtype_of(&simple(&std.string), &simple(&std.char_sequence)));
    assert!(cx.is_subtype_of(&simple(&std.exception), &simple(&std.throwable)));
    assert!(!cx.is_subtype_of(&simple(&std.number), &simple(&std.int)));
    assert!(!cx.is_subtype_of(&simple(&std.string), &simple(&std.int)));
}

#[test]
fn nothing_and_any_bound_the_lattice() {
    let s = session();
    let std = s.standard();
    let cx = SessionTypeContext::new(&s);
    let nullable_any = simple(&std.any).with_nullability(true);
    assert!(cx.is_subtype_of(&simple(&std.nothing), &simple(&std.string)));
    assert!(cx.is_subtype_of(&simple(&std.string), &simple(&std.any)));
    assert!(cx.is_subtype_of(&simple(&std.string).with_nullability(true), &nullable_any));
    assert!(!cx.is_subtype_of(&nullable_any, &simple(&std.any)));
}

#[test]
fn nullable_is_not_below_non_null() {
    let s = session();
    let std = s.standard();
    let cx = SessionTypeContext::new(&s);
    let string = simple(&std.string);
    assert!(cx.is_subtype_of(&string, &string.with_nullability(true)));
    assert!(!cx.is_subtype_of(&string.with_nullability(true), &string));
}

#[test]
fn declaration_site_variance_decides_argument_checks() {
    let s = session();
    let std = s.standard();
    let cx = SessionTypeContext::new(&s);
    let (int, number) = (simple(&std.int), simple(&std.number));

    // List<out E>
    assert!(cx.is_subtype_of(&applied(&std.list, int.clone()), &applied(&std.list, number.clone())));
    assert!(!cx.is_subtype_of(&applied(&std.list, number.clone()), &applied(&std.list, int.clone())));
    // Comparable<in T>
    assert!(cx.is_subtype_of(&applied(&std.comparable, number.clone()), &applied(&std.comparable, int.clone())));
    // Array<T>
    assert!(!cx.is_subtype_of(&applied(&std.array, int.clone()), &applied(&std.array, number)));
    assert!(cx.is_subtype_of(&applied(&std.array, int.clone()), &applied(&std.array, int)));
}

#[test]
fn use_site_projections_and_stars() {
    let s = session();
    let std = s.standard();
    let cx = SessionTypeContext::new(&s);
    let (int, number) = (simple(&std.int), simple(&std.number));
    let ints = applied(&std.array, int);
    assert!(cx.is_subtype_of(&ints, &projected(&std.array, Variance::Out, number.clone())));
    assert!(!cx.is_subtype_of(&ints, &projected(&std.array, Variance::In, number)));
    let star = ConeType::class(std.array.clone(), vec![ConeTypeProjection::Star], false);
    assert!(cx.is_subtype_of(&ints, &star));
}

#[test]
fn arguments_are_carried_through_supertypes() {
    let s = session();
    let std = s.standard();
    let cx = SessionTypeContext::new(&s);
    let strings = applied(&std.list, simple(&std.string));
    let seen = supertype_as(&s, &strings, &std.iterable).expect("List is Iterable");
    assert_eq!(ConeType::Class(seen), applied(&std.iterable, simple(&std.string)));
    assert!(cx.is_subtype_of(&strings, &applied(&std.iterable, simple(&std.char_sequence))));
    assert!(supertype_as(&s, &strings, &std.map).is_none());
}

#[test]
fn supertypes_come_nearest_first() {
    let s = session();
    let std = s.standard();
    let rendered: Vec<String> = all_supertypes(&s, &simple(&std.int))
        .iter()
        .map(|t| s.render_type(t))
        .collect();
    assert_eq!(rendered, vec!["kotlin/Number", "kotlin/Comparable<kotlin/Int>", "kotlin/Any"]);
    assert!(all_supertypes(&s, &simple(&std.any)).is_empty());
}

#[test]
fn error_types_are_compatible_both_ways() {
    let s = session();
    let std = s.standard();
    let cx = SessionTypeContext::new(&s);
    let error = ConeType::error("broken");
    assert!(cx.is_subtype_of(&error, &simple(&std.int)));
    assert!(cx.is_subtype_of(&simple(&std.int), &error));
}

#[test]
fn type_parameters_are_bounded_by_their_upper_bounds() {
    let s = session();
    let b = FirBuilder::new(&s);
    let file = b.file("main.kt", "app");
    let id = b
        .function(file, "f")
        .type_parameter("T", vec![b.user_type("Number")])
        .type_parameter("U", Vec::new())
        .build();
    resolve_to(&s, id, ResolvePhase::Types).expect("resolves");

    let std = s.standard();
    let cx = SessionTypeContext::new(&s);
    let parameter = |index, name| TypeParameterSymbol {
        owner: TypeParameterOwner::Callable(id),
        index,
        name: s.name(name),
    };
    let t = ConeType::type_parameter(parameter(0, "T"));
    let u = ConeType::type_parameter(parameter(1, "U"));
    assert_eq!(cx.type_parameter_bounds(&parameter(0, "T")), vec![simple(&std.number)]);
    assert!(cx.is_subtype_of(&t, &simple(&std.number)));
    assert!(!cx.is_subtype_of(&t, &simple(&std.int)));
    assert!(!cx.is_subtype_of(&t.with_nullability(true), &simple(&std.number)));
    assert!(cx.is_subtype_of(&t, &t));
    assert!(!cx.is_subtype_of(&u, &simple(&std.number)));
    assert!(cx.is_subtype_of(&u, &simple(&std.any).with_nullability(true)));
    assert!(!cx.is_subtype_of(&simple(&std.int), &t));
}

#[test]
fn common_supertype_of_siblings_is_their_parent() {
    let s = session();
    let std = s.standard();
    let cx = SessionTypeContext::new(&s);
    assert_eq!(cx.common_super_type(&[simple(&std.int), simple(&std.long)]), simple(&std.number));
    assert_eq!(cx.common_super_type(&[simple(&std.int), simple(&std.string)]), simple(&std.any));
}

#[test]
fn common_supertype_skips_nothing_and_errors() {
    let s = session();
    let std = s.standard();
    let cx = SessionTypeContext::new(&s);
    let string = simple(&std.string);
    let common = cx.common_super_type(&[simple(&std.nothing), ConeType::error("x"), string.clone()]);
    assert_eq!(common, string);
    let common = cx.common_super_type(&[string.clone(), simple(&std.nothing).with_nullability(true)]);
    assert_eq!(common, string.with_nullability(true));
    assert_eq!(cx.common_super_type(&[ConeType::error("only")]), ConeType::error("only"));
    assert_eq!(cx.common_super_type(&[]), simple(&std.nothing));
}
