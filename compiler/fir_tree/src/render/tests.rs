use super::*;
use crate::{
    FirBlock, FirConstExpression, FirFunctionCall, FirQualifiedAccessExpression,
    FirWhenBranch, FirWhenExpression, StringInterner,
};
use pretty_assertions::assert_eq;

fn int(value: i64) -> FirExpression {
    FirExpression::Const(Box::new(FirConstExpression::new(ConstValue::Int(value))))
}

#[test]
fn renders_calls_with_receivers() {
    let interner = StringInterner::new();
    let receiver = FirExpression::QualifiedAccess(Box::new(FirQualifiedAccessExpression::new(
        FirExpression::NoReceiver,
        interner.intern("list"),
        false,
    )));
    let call = FirFunctionCall::new(receiver, interner.intern("get"), Vec::new(), vec![int(0)])
        .with_safe(true);
    let rendered =
        FirRenderer::render_expression(&interner, &FirExpression::FunctionCall(Box::new(call)));
    assert_eq!(rendered, "list?.get(0)");
}

#[test]
fn renders_when_with_else() {
    let interner = StringInterner::new();
    let when = FirWhenExpression::new(
        Some(int(1)),
        vec![
            FirWhenBranch::new(int(1), FirBlock::new(vec![int(10).into()])),
            FirWhenBranch::new(
                FirExpression::ElseIfTrueCondition(Box::new(FirElseIfTrueCondition::new())),
                FirBlock::new(vec![int(20).into()]),
            ),
        ],
    );
    let rendered =
        FirRenderer::render_expression(&interner, &FirExpression::When(Box::new(when)));
    assert_eq!(
        rendered,
        "when (1) {\n    1 -> {\n        10\n    }\n    else -> {\n        20\n    }\n}"
    );
}

#[test]
fn with_types_appends_resolved_types() {
    let interner = StringInterner::new();
    let ids = crate::StandardClassIds::new(&interner);
    let mut access = FirQualifiedAccessExpression::new(
        FirExpression::NoReceiver,
        interner.intern("x"),
        false,
    );
    access.replace_type_ref(FirTypeRef::resolved(crate::ConeType::simple(ids.int.clone())));
    let expression = FirExpression::QualifiedAccess(Box::new(access));

    let mut renderer = FirRenderer::new(&interner).with_types(true);
    expression.accept(&mut renderer, ());
    assert_eq!(renderer.finish(), "x: kotlin/Int");
    assert_eq!(FirRenderer::render_expression(&interner, &expression), "x");
}

#[test]
fn unresolved_reference_is_marked() {
    let interner = StringInterner::new();
    let mut access = FirQualifiedAccessExpression::new(
        FirExpression::NoReceiver,
        interner.intern("y"),
        false,
    );
    access.replace_callee_reference(FirReference::Error {
        name: interner.intern("y"),
        reason: "no candidates".to_owned(),
    });
    let rendered =
        FirRenderer::render_expression(&interner, &FirExpression::QualifiedAccess(Box::new(access)));
    assert_eq!(rendered, "<Unresolved name: y> /* no candidates */");
}
