use super::*;
use crate::{
    ConeType, ConstValue, FirFunctionTypeRef, FirQualifierPart, FirUserTypeRef, StandardClassIds,
    StringInterner, Variance,
};
use pretty_assertions::assert_eq;

fn int(value: i64) -> FirExpression {
    FirExpression::Const(Box::new(FirConstExpression::new(ConstValue::Int(value))))
}

fn int_values(block: &FirBlock) -> Vec<i64> {
    block
        .statements()
        .iter()
        .filter_map(|s| match s.as_expression() {
            Some(FirExpression::Const(c)) => match c.value() {
                ConstValue::Int(v) => Some(*v),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

/// Adds one to every integer constant.
struct Increment;

impl FirTransformer<()> for Increment {
    fn transform_const_expression(
        &mut self,
        expression: Box<FirConstExpression>,
        _: (),
    ) -> FirExpression {
        match expression.value() {
            ConstValue::Int(v) => int(v + 1),
            _ => FirExpression::Const(expression),
        }
    }
}

/// Replaces every `when` by its first branch's first statement.
struct CollapseWhen;

impl FirTransformer<()> for CollapseWhen {
    fn transform_when_expression(&mut self, expression: Box<FirWhenExpression>, _: ()) -> FirExpression {
        expression
            .branches()
            .first()
            .and_then(|b| b.result().last_expression().cloned())
            .unwrap_or_default()
    }
}

/// Resolves every user type ref to `kotlin/Int`.
struct ResolveAllToInt(ConeType);

impl FirTransformer<()> for ResolveAllToInt {
    fn transform_type_ref(&mut self, type_ref: FirTypeRef, data: ()) -> FirTypeRef {
        match type_ref {
            FirTypeRef::User(_) => FirTypeRef::resolved(self.0.clone()),
            other => other.transform_children(self, data),
        }
    }
}

#[test]
fn default_methods_recurse_and_keep_list_order() {
    let block = FirBlock::new(vec![int(1).into(), int(2).into(), int(3).into()]);
    let block = Increment.transform_block(block, ());
    assert_eq!(int_values(&block), vec![2, 3, 4]);
}

#[test]
fn transformer_can_replace_node_with_another_kind() {
    let when = FirWhenExpression::new(
        None,
        vec![FirWhenBranch::new(int(0), FirBlock::new(vec![int(42).into()]))],
    );
    let block = FirBlock::new(vec![FirExpression::When(Box::new(when)).into()]);
    let block = CollapseWhen.transform_block(block, ());
    assert_eq!(block.last_expression(), Some(&int(42)));
}

#[test]
fn nested_children_are_rewritten_inside_control_flow() {
    let while_loop = FirWhileLoop::new(None, int(10), FirBlock::new(vec![int(20).into()]));
    let statement = Increment.transform_statement(FirStatement::WhileLoop(Box::new(while_loop)), ());
    let FirStatement::WhileLoop(while_loop) = statement else {
        panic!("loop kind changed");
    };
    assert_eq!(while_loop.condition(), &int(11));
    assert_eq!(int_values(while_loop.block()), vec![21]);
}

#[test]
fn default_type_ref_transform_descends_into_function_types() {
    let interner = StringInterner::new();
    let ids = StandardClassIds::new(&interner);
    let int_type = ConeType::simple(ids.int.clone());
    let user = FirTypeRef::User(FirUserTypeRef {
        qualifier: vec![FirQualifierPart {
            name: interner.intern("List"),
            type_arguments: vec![FirTypeProjection::Type {
                variance: Variance::Out,
                type_ref: FirTypeRef::user(interner.intern("A"), false),
            }],
        }],
        nullable: false,
    });
    let function = FirTypeRef::Function(FirFunctionTypeRef {
        receiver: None,
        parameters: vec![FirTypeRef::user(interner.intern("A"), false)],
        return_type: Box::new(FirTypeRef::user(interner.intern("B"), false)),
        nullable: false,
    });

    let mut transformer = ResolveAllToInt(int_type.clone());
    let function = transformer.transform_type_ref(function, ());
    let FirTypeRef::Function(function) = function else {
        panic!("function type ref should stay a function type ref");
    };
    assert_eq!(function.parameters[0].cone_type(), Some(&int_type));
    assert_eq!(function.return_type.cone_type(), Some(&int_type));

    // A user type itself is replaced whole.
    assert!(transformer.transform_type_ref(user, ()).is_resolved());
}

#[test]
fn transform_member_is_reached_for_file_declarations() {
    struct Members(Vec<DeclId>);
    impl FirTransformer<()> for Members {
        fn transform_member(&mut self, member: DeclId, _: ()) {
            self.0.push(member);
        }
    }

    let interner = StringInterner::new();
    let mut file = FirFile::new("a.kt", crate::FqName::parse(&interner, "a"));
    file.add_declaration(DeclId::from_raw(1));
    file.add_declaration(DeclId::from_raw(2));
    let mut members = Members(Vec::new());
    let file = members.transform_file(Box::new(file), ());
    assert_eq!(members.0, vec![DeclId::from_raw(1), DeclId::from_raw(2)]);
    assert_eq!(file.declarations().len(), 2);
}
