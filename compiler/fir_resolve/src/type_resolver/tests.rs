use std::sync::Arc;

use fir_tree::{ClassId, ConeErrorKind, DeclId, FirTypeRef, SharedInterner, TypeParameterOwner, TypeParameterSymbol};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::phases::callable_scopes;
use crate::scopes::FirCompositeScope;
use crate::{BuiltinTypeCache, FirBuilder, ResolveConfig};

/// `package app; class Outer { class Inner }; fun <T> f()`, and the scope
/// seen from the header of `f`.
struct Fixture {
    session: FirSession,
    function: DeclId,
}

impl Fixture {
    fn new() -> Self {
        Self::with_config(ResolveConfig::new())
    }

    fn with_config(config: ResolveConfig) -> Self {
        let session = FirSession::new(config);
        let function = {
            let b = FirBuilder::new(&session);
            let file = b.file("main.kt", "app");
            let outer = b.class(file, "Outer").build();
            b.class(outer, "Inner").build();
            b.function(file, "f").type_parameter("T", Vec::new()).build()
        };
        Fixture { session, function }
    }

    fn builder(&self) -> FirBuilder<'_> {
        FirBuilder::new(&self.session)
    }

    fn scope(&self) -> FirCompositeScope {
        FirCompositeScope::new(callable_scopes(&self.session, self.function))
    }

    fn resolve(&self, type_ref: &FirTypeRef) -> ConeType {
        FirTypeResolver::new(&self.session).resolve_type(type_ref, &self.scope())
    }

    fn render(&self, type_ref: &FirTypeRef) -> String {
        self.session.render_type(&self.resolve(type_ref))
    }
}

#[test]
fn default_imports_make_builtins_visible() {
    let fx = Fixture::new();
    let b = fx.builder();
    assert_eq!(fx.render(&b.user_type("Int")), "kotlin/Int");
    assert_eq!(fx.render(&b.user_type("String?")), "kotlin/String?");
    assert_eq!(
        fx.render(&b.generic_type("List", vec![b.user_type("String")])),
        "kotlin/collections/List<kotlin/String>"
    );
}

#[test]
fn qualified_and_nested_names() {
    let fx = Fixture::new();
    let b = fx.builder();
    assert_eq!(fx.render(&b.user_type("Outer.Inner")), "app/Outer.Inner");
    assert_eq!(fx.render(&b.user_type("kotlin.collections.Map")), "kotlin/collections/Map");
    assert_eq!(
        fx.render(&b.user_type("Outer.Missing")),
        "ERROR CLASS: Symbol not found, for `Outer.Missing`"
    );
}

#[test]
fn missing_class_names_the_reference_as_written() {
    let fx = Fixture::new();
    let b = fx.builder();
    let type_ref = b.generic_type("Foo?", vec![b.user_type("Int")]);
    let ty = fx.resolve(&type_ref);
    assert_eq!(ty.error_reason(), Some("Symbol not found, for `Foo<Int>?`"));
}

#[test]
fn type_parameters_resolve_in_their_scope() {
    let fx = Fixture::new();
    let b = fx.builder();
    let expected = ConeType::TypeParameter {
        symbol: TypeParameterSymbol {
            owner: TypeParameterOwner::Callable(fx.function),
            index: 0,
            name: fx.session.name("T"),
        },
        nullable: true,
    };
    assert_eq!(fx.resolve(&b.user_type("T?")), expected);
    assert!(fx.resolve(&b.user_type("T.Nested")).is_error());
}

#[test]
fn function_types_put_receiver_first_and_return_last() {
    let fx = Fixture::new();
    let b = fx.builder();
    let plain = b.function_type(None, vec![b.user_type("Int")], b.user_type("String"));
    assert_eq!(fx.render(&plain), "kotlin/Function1<kotlin/Int, kotlin/String>");

    let extension = b.function_type(Some(b.user_type("String")), vec![b.user_type("Int")], b.user_type("Unit"));
    let ty = fx.resolve(&extension);
    assert_eq!(fx.session.render_type(&ty), "kotlin/Function2<kotlin/String, kotlin/Int, kotlin/Unit>");
    assert!(ty.as_class().is_some_and(|class| class.extension_function));
}

#[test]
fn function_types_beyond_the_configured_arity_are_unsupported() {
    let fx = Fixture::with_config(ResolveConfig::new().with_max_function_arity(2));
    let b = fx.builder();
    let wide = b.function_type(
        None,
        vec![b.user_type("Int"), b.user_type("Int"), b.user_type("Int")],
        b.user_type("Unit"),
    );
    assert_eq!(
        fx.resolve(&wide).error_reason(),
        Some("Function type with 3 parameters is not supported")
    );
    assert_eq!(fx.resolve(&wide).error_kind(), Some(ConeErrorKind::Unsupported));
}

#[test]
fn dynamic_is_not_supported() {
    let fx = Fixture::new();
    assert_eq!(
        fx.resolve(&FirTypeRef::Dynamic { nullable: false }).error_reason(),
        Some("Not supported: dynamic")
    );
    assert_eq!(
        fx.resolve(&FirTypeRef::Dynamic { nullable: false }).error_kind(),
        Some(ConeErrorKind::Unsupported)
    );
}

#[test]
fn delegated_refs_resolve_their_target() {
    let fx = Fixture::new();
    let b = fx.builder();
    let delegated = FirTypeRef::Delegated(Box::new(b.user_type("Boolean")));
    assert_eq!(fx.render(&delegated), "kotlin/Boolean");
}

#[test]
fn implicit_and_resolved_refs_pass_through() {
    let fx = Fixture::new();
    let resolver = FirTypeResolver::new(&fx.session);
    let scope = fx.scope();
    assert_eq!(resolver.resolve_type_ref(FirTypeRef::Implicit, &scope), FirTypeRef::Implicit);
    let resolved = FirTypeRef::error("kept");
    assert_eq!(resolver.resolve_type_ref(resolved.clone(), &scope), resolved);
}

#[test]
fn builtin_refs_ask_the_provider_once() {
    let fx = Fixture::new();
    let cache = Arc::clone(fx.session.builtin_types());
    let char_id = fx.session.standard().char.clone();
    let before = cache.provider_queries();
    for _ in 0..3 {
        let ty = fx.resolve(&FirTypeRef::ImplicitBuiltin(char_id.clone()));
        assert_eq!(fx.session.render_type(&ty), "kotlin/Char");
    }
    assert_eq!(cache.provider_queries(), before + 1);

    let missing = ClassId::parse(fx.session.interner(), "kotlin/Missing");
    let ty = fx.resolve(&FirTypeRef::ImplicitBuiltin(missing.clone()));
    assert_eq!(ty.error_reason(), Some("Symbol not found, for `kotlin/Missing`"));
    fx.resolve(&FirTypeRef::ImplicitBuiltin(missing));
    assert_eq!(cache.provider_queries(), before + 2);
}

#[test]
fn builtin_cache_is_keyed_by_session() {
    let interner = SharedInterner::new();
    let cache = Arc::new(BuiltinTypeCache::new());
    let first = FirSession::with_shared(interner.clone(), Arc::clone(&cache), ResolveConfig::new());
    let second = FirSession::with_shared(interner, Arc::clone(&cache), ResolveConfig::new());
    let char_id = first.standard().char.clone();
    let before = cache.provider_queries();
    assert!(cache.symbol(&first, &char_id).is_some());
    assert!(cache.symbol(&second, &char_id).is_some());
    assert_eq!(cache.provider_queries(), before + 2);

    let entries = cache.len();
    drop(second);
    assert!(cache.len() < entries);
    assert!(cache.symbol(&first, &char_id).is_some());
    assert_eq!(cache.provider_queries(), before + 2);
}

/// Type refs as they could be written in source.
#[derive(Clone, Debug)]
enum Shape {
    Named(&'static str, bool),
    Generic(&'static str, Vec<Shape>, bool),
    Function(Option<Box<Shape>>, Vec<Shape>, Box<Shape>),
}

const NAMES: &[&str] = &["Int", "String", "Any", "T", "Missing", "Outer.Inner", "kotlin.Unit"];
const GENERICS: &[&str] = &["List", "Map", "Array", "Missing"];

fn shape() -> impl Strategy<Value = Shape> {
    let leaf = (prop::sample::select(NAMES), any::<bool>()).prop_map(|(name, nullable)| Shape::Named(name, nullable));
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            (prop::sample::select(GENERICS), prop::collection::vec(inner.clone(), 1..3), any::<bool>())
                .prop_map(|(name, arguments, nullable)| Shape::Generic(name, arguments, nullable)),
            (prop::option::of(inner.clone()), prop::collection::vec(inner.clone(), 0..3), inner)
                .prop_map(|(receiver, parameters, result)| {
                    Shape::Function(receiver.map(Box::new), parameters, Box::new(result))
                }),
        ]
    })
}

fn build(b: &FirBuilder<'_>, shape: &Shape) -> FirTypeRef {
    let text = |name: &str, nullable: bool| format!("{name}{}", if nullable { "?" } else { "" });
    match shape {
        Shape::Named(name, nullable) => b.user_type(&text(name, *nullable)),
        Shape::Generic(name, arguments, nullable) => b.generic_type(
            &text(name, *nullable),
            arguments.iter().map(|a| build(b, a)).collect(),
        ),
        Shape::Function(receiver, parameters, result) => b.function_type(
            receiver.as_deref().map(|r| build(b, r)),
            parameters.iter().map(|p| build(b, p)).collect(),
            build(b, result),
        ),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn resolving_a_resolved_ref_changes_nothing(shape in shape()) {
        let fx = Fixture::new();
        let resolver = FirTypeResolver::new(&fx.session);
        let scope = fx.scope();
        let raw = build(&fx.builder(), &shape);

        let once = resolver.resolve_type_ref(raw.clone(), &scope);
        prop_assert!(once.is_resolved());
        let twice = resolver.resolve_type_ref(once.clone(), &scope);
        prop_assert_eq!(&twice, &once);
        prop_assert_eq!(Some(&resolver.resolve_type(&raw, &scope)), once.cone_type());
    }
}
