use super::*;
use crate::{
    ConstValue, FirBlock, FirConstExpression, FirDoWhileLoop, FirElseIfTrueCondition,
    FirExpression, FirFunctionCall, FirStatement, FirWhenBranch, FirWhenExpression,
    FirWhenSubjectExpression, FirWhileLoop, StringInterner,
};
use pretty_assertions::assert_eq;

/// Records every element kind in visiting order.
#[derive(Default)]
struct KindRecorder {
    kinds: Vec<ElementKind>,
}

impl FirVisitor<()> for KindRecorder {
    type Output = ();

    fn visit_element(&mut self, element: FirElementRef<'_>, data: ()) {
        self.kinds.push(element.kind());
        element.accept_children(self, data);
    }
}

/// Records only the constants it sees, by value.
#[derive(Default)]
struct ConstRecorder {
    values: Vec<i64>,
}

impl FirVisitor<()> for ConstRecorder {
    type Output = ();

    fn visit_element(&mut self, element: FirElementRef<'_>, data: ()) {
        element.accept_children(self, data);
    }

    fn visit_const_expression(&mut self, expression: &FirConstExpression, _: ()) {
        if let ConstValue::Int(value) = expression.value() {
            self.values.push(*value);
        }
    }
}

fn int(value: i64) -> FirExpression {
    FirExpression::Const(Box::new(FirConstExpression::new(ConstValue::Int(value))))
}

fn block(values: &[i64]) -> FirBlock {
    FirBlock::new(values.iter().map(|v| FirStatement::from(int(*v))).collect())
}

#[test]
fn when_visits_subject_before_branches() {
    let when = FirWhenExpression::new(
        Some(int(0)),
        vec![
            FirWhenBranch::new(
                FirExpression::WhenSubject(Box::new(FirWhenSubjectExpression::new())),
                block(&[1]),
            ),
            FirWhenBranch::new(
                FirExpression::ElseIfTrueCondition(Box::new(FirElseIfTrueCondition::new())),
                block(&[2]),
            ),
        ],
    );
    let mut recorder = ConstRecorder::default();
    FirExpression::When(Box::new(when)).accept(&mut recorder, ());
    assert_eq!(recorder.values, vec![0, 1, 2]);
}

#[test]
fn while_visits_condition_before_block() {
    let while_loop = FirWhileLoop::new(None, int(1), block(&[2, 3]));
    let mut recorder = ConstRecorder::default();
    FirStatement::WhileLoop(Box::new(while_loop)).accept(&mut recorder, ());
    assert_eq!(recorder.values, vec![1, 2, 3]);
}

#[test]
fn do_while_visits_block_before_condition() {
    let do_while = FirDoWhileLoop::new(None, block(&[2, 3]), int(1));
    let mut recorder = ConstRecorder::default();
    FirStatement::DoWhileLoop(Box::new(do_while)).accept(&mut recorder, ());
    assert_eq!(recorder.values, vec![2, 3, 1]);
}

#[test]
fn unoverridden_kinds_fall_back_to_visit_element() {
    let interner = StringInterner::new();
    let call = FirFunctionCall::new(
        FirExpression::NoReceiver,
        interner.intern("f"),
        Vec::new(),
        vec![int(1)],
    );
    let mut recorder = KindRecorder::default();
    FirExpression::FunctionCall(Box::new(call)).accept(&mut recorder, ());
    assert_eq!(
        recorder.kinds,
        vec![
            ElementKind::FunctionCall,
            ElementKind::NoReceiver,
            ElementKind::Reference,
            ElementKind::ConstExpression,
            ElementKind::TypeRef,
            ElementKind::TypeRef,
        ]
    );
}

#[test]
fn type_ref_children_cover_function_type_parts() {
    let interner = StringInterner::new();
    let a = FirTypeRef::user(interner.intern("A"), false);
    let function = FirTypeRef::Function(crate::FirFunctionTypeRef {
        receiver: Some(Box::new(a.clone())),
        parameters: vec![a.clone(), a.clone()],
        return_type: Box::new(a),
        nullable: false,
    });
    let mut recorder = KindRecorder::default();
    function.accept(&mut recorder, ());
    assert_eq!(recorder.kinds, vec![ElementKind::TypeRef; 5]);
}

#[test]
fn member_ids_reach_visit_member() {
    struct Members(Vec<DeclId>);
    impl FirVisitor<()> for Members {
        type Output = ();
        fn visit_element(&mut self, element: FirElementRef<'_>, data: ()) {
            element.accept_children(self, data);
        }
        fn visit_member(&mut self, member: DeclId, _: ()) {
            self.0.push(member);
        }
    }

    let interner = StringInterner::new();
    let mut file = crate::FirFile::new("a.kt", crate::FqName::parse(&interner, "a"));
    file.add_declaration(DeclId::from_raw(4));
    file.add_declaration(DeclId::from_raw(7));
    let mut members = Members(Vec::new());
    file.accept(&mut members, ());
    assert_eq!(members.0, vec![DeclId::from_raw(4), DeclId::from_raw(7)]);
}
