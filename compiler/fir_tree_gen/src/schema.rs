//! The FIR tree schema.
//!
//! Abstract kinds group the fields their children share; every leaf kind
//! here is one concrete element of the `fir_tree` crate.

use crate::model::{Field, FieldSet, TreeBuilder, TreeSchema};
use crate::SchemaError;

/// Build the FIR element schema.
pub fn fir_tree_schema() -> Result<TreeSchema, SchemaError> {
    let mut tree = TreeBuilder::new();

    // === Types ===

    let boolean = tree.ty("bool", true);
    let string = tree.ty("String", false);
    let name = tree.ty("Name", true);
    let fq_name = tree.ty("FqName", false);
    let class_id = tree.ty("ClassId", false);
    let class_symbol = tree.ty("ClassLikeSymbol", false);
    let function_symbol = tree.ty("FunctionSymbol", true);
    let variable_symbol = tree.ty("VariableSymbol", true);
    let type_parameter_symbol = tree.ty("TypeParameterSymbol", false);
    let local_symbol = tree.ty("LocalSymbolId", true);
    let resolve_phase = tree.ty("ResolvePhase", true);
    let status = tree.ty("FirDeclarationStatus", false);
    let origin = tree.ty("DeclarationOrigin", true);
    let class_kind = tree.ty("ClassKind", true);
    let variance = tree.ty("Variance", true);
    let const_value = tree.ty("ConstValue", false);
    let operation = tree.ty("Operation", true);
    let type_operation = tree.ty("TypeOperation", true);
    let logic_operation = tree.ty("LogicOperation", true);
    let jump_kind = tree.ty("LoopJumpKind", true);
    let resolved_import = tree.ty("FirResolvedImport", false);
    let member = tree.member_ref_ty("DeclId");

    // === Abstract kinds ===

    let statement = tree.element("Statement", &[]);
    let expression = tree.element("Expression", &[statement]);
    let declaration = tree.element("Declaration", &[]);
    let resolvable = tree.element("ResolvableDeclaration", &[declaration]);
    let member_declaration = tree.element("MemberDeclaration", &[resolvable]);
    let callable = tree.element("CallableDeclaration", &[member_declaration]);
    let function = tree.element("Function", &[callable]);
    let qualified_access = tree.element("QualifiedAccess", &[]);
    let call = tree.element("Call", &[]);
    let r#loop = tree.element("Loop", &[statement]);
    let jump = tree.element("Jump", &[expression]);

    // === Leaf kinds ===

    let type_ref = tree.element("TypeRef", &[]);
    let reference = tree.element("Reference", &[]);
    let file = tree.element("File", &[resolvable]);
    let import = tree.element("Import", &[]);
    let regular_class = tree.element("RegularClass", &[member_declaration]);
    let type_parameter = tree.element("TypeParameter", &[declaration]);
    let simple_function = tree.element("SimpleFunction", &[function]);
    let property = tree.element("Property", &[callable, statement]);
    let constructor = tree.element("Constructor", &[function]);
    let value_parameter = tree.element("ValueParameter", &[declaration]);
    let const_expression = tree.element("ConstExpression", &[expression]);
    tree.element("QualifiedAccessExpression", &[expression, qualified_access]);
    let function_call = tree.element("FunctionCall", &[expression, qualified_access, call]);
    let block = tree.element("Block", &[expression]);
    let when_expression = tree.element("WhenExpression", &[expression]);
    let when_branch = tree.element("WhenBranch", &[]);
    tree.element("WhenSubjectExpression", &[expression]);
    tree.element("ElseIfTrueCondition", &[expression]);
    let try_expression = tree.element("TryExpression", &[expression]);
    let catch = tree.element("Catch", &[]);
    tree.element("WhileLoop", &[r#loop]);
    let do_while_loop = tree.element("DoWhileLoop", &[r#loop]);
    let loop_jump = tree.element("LoopJump", &[jump]);
    let return_expression = tree.element("ReturnExpression", &[jump]);
    let throw_expression = tree.element("ThrowExpression", &[expression]);
    let anonymous_function = tree.element("AnonymousFunction", &[declaration, expression]);
    let this_receiver = tree.element("ThisReceiverExpression", &[expression]);
    let operator_call = tree.element("OperatorCall", &[expression, call]);
    let type_operator_call = tree.element("TypeOperatorCall", &[expression]);
    let binary_logic = tree.element("BinaryLogicExpression", &[expression]);
    let variable_assignment = tree.element("VariableAssignment", &[statement]);
    tree.element("NoReceiverExpression", &[expression]);

    // === Field sets ===

    let type_ref_field = FieldSet::new([Field::element("typeRef", type_ref).with_replace()]);
    let callee_reference =
        FieldSet::new([Field::element("calleeReference", reference).with_replace()]);
    let receiver = FieldSet::new([Field::element("explicitReceiver", expression)]);
    let arguments = FieldSet::new([Field::list("arguments", expression)]);
    let return_type_ref =
        FieldSet::new([Field::element("returnTypeRef", type_ref).with_replace()]);
    let receiver_type_ref =
        FieldSet::new([Field::element("receiverTypeRef", type_ref).nullable()]);
    let value_parameters = FieldSet::new([Field::list("valueParameters", value_parameter)]);
    let type_parameters = FieldSet::new([Field::list("typeParameters", type_parameter)]);
    let body = FieldSet::new([Field::element("body", block).nullable()]);
    let label = FieldSet::new([Field::simple("label", name).nullable()]);
    let target_label = FieldSet::new([Field::simple("targetLabel", name).nullable()]);
    let members = FieldSet::new([Field::simple_list("declarations", member)]);
    let containing_class =
        FieldSet::new([Field::simple("containingClass", class_id).nullable()]);

    // === Abstract fields ===

    tree.fields(expression, &type_ref_field);
    tree.field(
        resolvable,
        Field::simple("resolvePhase", resolve_phase).with_replace(),
    );
    tree.fields(
        member_declaration,
        &FieldSet::new([
            Field::simple("status", status).with_replace(),
            Field::simple("origin", origin),
        ]),
    );
    tree.fields(callable, &receiver_type_ref.clone().with(&return_type_ref));
    tree.fields(function, &value_parameters.clone().with(&body));
    tree.fields(
        qualified_access,
        &receiver
            .clone()
            .with(&callee_reference)
            .with(&FieldSet::new([Field::simple("safe", boolean)])),
    );
    tree.fields(call, &arguments);
    tree.fields(
        r#loop,
        &label.clone().with(&FieldSet::new([
            Field::element("condition", expression),
            Field::element("block", block),
        ])),
    );
    tree.fields(jump, &target_label);

    // === Leaf fields ===

    tree.fields(
        file,
        &FieldSet::new([
            Field::simple("name", string),
            Field::simple("packageFqName", fq_name),
            Field::list("imports", import),
        ])
        .with(&members),
    );
    tree.fields(
        import,
        &FieldSet::new([
            Field::simple("importedFqName", fq_name),
            Field::simple("isAllUnder", boolean),
            Field::simple("alias", name).nullable(),
            Field::simple("resolved", resolved_import).nullable().with_replace(),
        ]),
    );
    tree.fields(
        regular_class,
        &FieldSet::new([
            Field::simple("symbol", class_symbol),
            Field::simple("classKind", class_kind),
        ])
        .with(&type_parameters)
        .with(&FieldSet::new([Field::list("superTypeRefs", type_ref).with_replace()]))
        .with(&members),
    );
    tree.fields(
        type_parameter,
        &FieldSet::new([
            Field::simple("symbol", type_parameter_symbol),
            Field::simple("variance", variance),
            Field::list("bounds", type_ref).with_replace(),
        ]),
    );
    tree.fields(
        simple_function,
        &FieldSet::new([
            Field::simple("symbol", function_symbol),
            Field::simple("name", name),
        ])
        .with(&containing_class)
        .with(&type_parameters)
        .with(&receiver_type_ref)
        .with(&value_parameters)
        .with(&return_type_ref)
        .with(&body),
    );
    tree.fields(
        property,
        &FieldSet::new([
            Field::simple("symbol", variable_symbol),
            Field::simple("name", name),
        ])
        .with(&containing_class)
        .with(&FieldSet::new([
            Field::simple("isVar", boolean),
            Field::element("initializer", expression).nullable(),
        ])),
    );
    tree.fields(
        constructor,
        &FieldSet::new([
            Field::simple("symbol", function_symbol),
            Field::simple("owner", class_id),
        ]),
    );
    tree.fields(
        value_parameter,
        &FieldSet::new([
            Field::simple("name", name),
            Field::simple("symbol", local_symbol),
        ])
        .with(&return_type_ref)
        .with(&FieldSet::new([
            Field::element("defaultValue", expression).nullable(),
            Field::simple("isVararg", boolean),
        ])),
    );
    tree.field(const_expression, Field::simple("value", const_value));
    tree.field(
        function_call,
        Field::list("typeArguments", type_ref).with_replace(),
    );
    // The value type trails the statements it is computed from.
    tree.fields(
        block,
        &FieldSet::new([Field::list("statements", statement)]).with(&type_ref_field),
    );
    tree.fields(
        when_expression,
        &FieldSet::new([
            Field::element("subject", expression).nullable(),
            Field::element("subjectVariable", property).nullable(),
            Field::list("branches", when_branch),
        ])
        .with(&callee_reference)
        .with(&FieldSet::new([
            Field::simple("isExhaustive", boolean).with_replace(),
        ])),
    );
    tree.fields(
        when_branch,
        &FieldSet::new([
            Field::element("condition", expression),
            Field::element("result", block),
        ]),
    );
    tree.fields(
        try_expression,
        &FieldSet::new([
            Field::element("tryBlock", block),
            Field::list("catches", catch),
            Field::element("finallyBlock", block).nullable(),
        ])
        .with(&callee_reference),
    );
    tree.fields(
        catch,
        &FieldSet::new([
            Field::element("parameter", value_parameter),
            Field::element("block", block),
        ]),
    );
    // Block first: the body runs before the condition is evaluated.
    tree.fields(
        do_while_loop,
        &FieldSet::new([
            Field::element("block", block),
            Field::element("condition", expression),
        ]),
    );
    tree.field(loop_jump, Field::simple("kind", jump_kind));
    tree.field(return_expression, Field::element("result", expression));
    tree.field(throw_expression, Field::element("exception", expression));
    tree.fields(
        anonymous_function,
        &label
            .with(&receiver_type_ref)
            .with(&value_parameters)
            .with(&return_type_ref)
            .with(&body)
            .with(&FieldSet::new([Field::simple("hasExplicitParameters", boolean)])),
    );
    tree.fields(this_receiver, &callee_reference);
    tree.field(operator_call, Field::simple("operation", operation));
    tree.fields(
        type_operator_call,
        &FieldSet::new([
            Field::simple("operation", type_operation),
            Field::element("argument", expression),
            Field::element("conversionTypeRef", type_ref).with_replace(),
        ]),
    );
    tree.fields(
        binary_logic,
        &FieldSet::new([
            Field::simple("kind", logic_operation),
            Field::element("left", expression),
            Field::element("right", expression),
        ]),
    );
    tree.fields(
        variable_assignment,
        &receiver
            .with(&callee_reference)
            .with(&FieldSet::new([Field::element("rvalue", expression)])),
    );

    tree.build()
}
