use fir_tree::{
    ConeType, FirExpression, FirStatement, FirTypeRef, FirUserTypeRef, TypeParameterOwner, Variance,
};
use pretty_assertions::assert_eq;

use super::*;
use crate::ResolveConfig;

fn session() -> FirSession {
    FirSession::new(ResolveConfig::new())
}

#[test]
fn source_files_are_registered_and_library_files_are_not() {
    let s = session();
    let b = FirBuilder::new(&s);
    let source = b.file("main.kt", "app.core");
    let library = b.library_file("lib.kt", "lib");
    assert_eq!(s.files(), vec![source]);
    assert!(s.declarations().with(library, |d| d.as_file().is_some()).unwrap_or(false));
    assert!(s.provider().has_package(&b.fq_name("app.core")));
    assert!(s.provider().has_package(&b.fq_name("app")));
    assert!(s.provider().has_package(&b.fq_name("lib")));
}

#[test]
fn classes_get_ids_from_their_owner() {
    let s = session();
    let b = FirBuilder::new(&s);
    let file = b.file("main.kt", "app");
    let outer = b.class(file, "Outer").build();
    let inner = b.class(outer, "Inner").build();

    assert_eq!(s.class_decl_id(&b.class_id("app/Outer")), Some(outer));
    assert_eq!(s.class_decl_id(&b.class_id("app/Outer.Inner")), Some(inner));
    assert_eq!(s.declarations().designation(inner), Some(Designation {
        file: Some(file),
        classes: vec![outer],
    }));
    let members = s
        .declarations()
        .with(outer, |d| d.as_class().map(|c| c.declarations().to_vec()))
        .flatten();
    assert_eq!(members, Some(vec![inner]));
    let top_level = s.declarations().with(file, |d| d.as_file().map(|f| f.declarations().to_vec())).flatten();
    assert_eq!(top_level, Some(vec![outer]));
}

#[test]
fn only_top_level_callables_reach_the_provider() {
    let s = session();
    let b = FirBuilder::new(&s);
    let file = b.file("main.kt", "app");
    let class = b.class(file, "C").build();
    let top = b.function(file, "run").build();
    let member = b.function(class, "run").build();
    let property = b.property(file, "answer").returns(b.user_type("Int")).build();

    let package = b.fq_name("app");
    assert_eq!(s.provider().top_level_callables(&package, b.name("run")).to_vec(), vec![top]);
    assert_eq!(s.provider().top_level_callables(&package, b.name("answer")).to_vec(), vec![property]);
    let containing = s
        .declarations()
        .with(member, |d| d.as_function().and_then(|f| f.containing_class().cloned()))
        .flatten();
    assert_eq!(containing, Some(b.class_id("app/C")));
}

#[test]
fn return_types_default_by_body_shape() {
    let s = session();
    let b = FirBuilder::new(&s);
    let file = b.file("main.kt", "app");
    let abstract_fun = b.function(file, "a").build();
    let block = b.function(file, "b").body(b.block(Vec::new())).build();
    let expression = b.function(file, "c").expression_body(b.int(1)).build();
    let declared = b.function(file, "d").returns(b.user_type("Int")).expression_body(b.int(1)).build();

    let return_type = |id| {
        s.declarations()
            .with(id, |d| d.as_function().map(|f| f.return_type_ref().clone()))
            .flatten()
    };
    let unit = FirTypeRef::ImplicitBuiltin(s.standard().unit.clone());
    assert_eq!(return_type(abstract_fun), Some(unit.clone()));
    assert_eq!(return_type(block), Some(unit));
    assert_eq!(return_type(expression), Some(FirTypeRef::Implicit));
    assert_eq!(return_type(declared), Some(b.user_type("Int")));
}

#[test]
fn expression_bodies_return_their_expression() {
    let s = session();
    let b = FirBuilder::new(&s);
    let file = b.file("main.kt", "app");
    let id = b.function(file, "f").expression_body(b.int(7)).build();
    let statements = s
        .declarations()
        .with(id, |d| d.as_function().and_then(|f| f.body().map(|body| body.statements().to_vec())))
        .flatten()
        .unwrap_or_default();
    let [FirStatement::Expression(FirExpression::Return(ret))] = statements.as_slice() else {
        panic!("expected a single return, got {statements:?}");
    };
    assert_eq!(ret.result(), &b.int(7));
}

#[test]
fn type_parameters_keep_their_order_and_owner() {
    let s = session();
    let b = FirBuilder::new(&s);
    let file = b.file("main.kt", "app");
    let class = b
        .class(file, "Pair")
        .type_parameter("A", Variance::Out, Vec::new())
        .type_parameter("B", Variance::In, vec![b.user_type("Number")])
        .build();
    let function = b.function(file, "f").type_parameter("T", Vec::new()).build();

    let class_parameters = s
        .declarations()
        .with(class, |d| d.as_class().map(|c| c.type_parameters().to_vec()))
        .flatten()
        .unwrap_or_default();
    let summary: Vec<_> = class_parameters
        .iter()
        .map(|p| (s.text(p.name()).to_owned(), p.symbol().index, p.variance(), p.bounds().len()))
        .collect();
    assert_eq!(summary, vec![
        ("A".to_owned(), 0, Variance::Out, 0),
        ("B".to_owned(), 1, Variance::In, 1),
    ]);
    assert_eq!(
        class_parameters[0].symbol().owner,
        TypeParameterOwner::Class(b.class_id("app/Pair"))
    );

    let owner = s
        .declarations()
        .with(function, |d| {
            d.as_function()
                .and_then(|f| f.type_parameters().first().map(|p| p.symbol().owner.clone()))
        })
        .flatten();
    assert_eq!(owner, Some(TypeParameterOwner::Callable(function)));
}

#[test]
fn constructors_return_the_class_type() {
    let s = session();
    let b = FirBuilder::new(&s);
    let file = b.file("main.kt", "app");
    let class = b.class(file, "Box").type_parameter("T", Variance::Invariant, Vec::new()).build();
    let constructor = b.constructor(class).parameter("value", b.user_type("T")).build();

    let (owner, return_type) = s
        .declarations()
        .with(constructor, |d| {
            d.as_constructor().map(|c| (c.owner().clone(), c.return_type_ref().clone()))
        })
        .flatten()
        .unwrap_or_else(|| panic!("constructor is registered"));
    assert_eq!(owner, b.class_id("app/Box"));
    let default_type = s
        .declarations()
        .with(class, |d| d.as_class().map(fir_tree::FirRegularClass::default_type))
        .flatten()
        .unwrap_or_else(|| ConeType::error("missing"));
    assert_eq!(return_type, FirTypeRef::resolved(default_type));
}

#[test]
fn imports_are_attached_in_order() {
    let s = session();
    let b = FirBuilder::new(&s);
    let file = b.file("main.kt", "app");
    b.import(file, "lib.helper");
    b.import_as(file, "lib.Other", "O");
    b.star_import(file, "lib.util");

    let imports = s
        .declarations()
        .with(file, |d| d.as_file().map(|f| f.imports().to_vec()))
        .flatten()
        .unwrap_or_default();
    let summary: Vec<_> = imports
        .iter()
        .map(|i| (i.imported_fq_name().clone(), i.is_all_under(), i.alias()))
        .collect();
    assert_eq!(summary, vec![
        (b.fq_name("lib.helper"), false, None),
        (b.fq_name("lib.Other"), false, Some(b.name("O"))),
        (b.fq_name("lib.util"), true, None),
    ]);
}

#[test]
fn user_types_split_on_dots() {
    let s = session();
    let b = FirBuilder::new(&s);
    let FirTypeRef::User(FirUserTypeRef { qualifier, nullable }) = b.user_type("a.b.C?") else {
        panic!("user type expected");
    };
    assert!(nullable);
    let names: Vec<&str> = qualifier.iter().map(|part| s.text(part.name)).collect();
    assert_eq!(names, vec!["a", "b", "C"]);

    let FirTypeRef::User(generic) = b.generic_type("List", vec![b.user_type("Int")]) else {
        panic!("user type expected");
    };
    assert!(!generic.nullable);
    assert_eq!(generic.qualifier[0].type_arguments.len(), 1);
}

#[test]
#[should_panic(expected = "cannot own members")]
fn functions_cannot_own_members() {
    let s = session();
    let b = FirBuilder::new(&s);
    let file = b.file("main.kt", "app");
    let function = b.function(file, "f").build();
    b.property(function, "p").build();
}

#[test]
#[should_panic(expected = "constructors go into classes")]
fn constructors_need_a_class() {
    let s = session();
    let b = FirBuilder::new(&s);
    let file = b.file("main.kt", "app");
    b.constructor(file).build();
}
