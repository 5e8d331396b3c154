//! Text dump of a tree, for tests and debugging.
//!
//! The output is Kotlin-shaped pseudo source. With `with_types` every
//! expression that has a resolved type is suffixed with `: <type>`.

use std::fmt::Write;

use crate::nodes::{
    ConstValue, FirAnonymousFunction, FirBinaryLogicExpression, FirBlock, FirCatch,
    FirConstExpression, FirConstructor, FirDeclaration, FirDoWhileLoop, FirElseIfTrueCondition,
    FirFile, FirFunctionCall, FirImport, FirLoopJump, FirOperatorCall, FirProperty,
    FirQualifiedAccessExpression, FirRegularClass, FirReturnExpression, FirSimpleFunction,
    FirStatement, FirThisReceiverExpression, FirThrowExpression, FirTryExpression,
    FirTypeOperatorCall, FirTypeParameter, FirValueParameter, FirVariableAssignment,
    FirWhenBranch, FirWhenExpression, FirWhenSubjectExpression, FirWhileLoop, LogicOperation,
    LoopJumpKind, Operation, TypeOperation,
};
use crate::{
    ClassKind, DeclId, FirElementRef, FirExpression, FirReference, FirTypeRef, FirVisitor, Name,
    StringLookup, Variance,
};

/// Looks up members of files and classes while rendering.
pub type MemberLookup<'a> = &'a dyn Fn(DeclId) -> Option<FirDeclaration>;

pub struct FirRenderer<'a> {
    names: &'a dyn StringLookup,
    members: Option<MemberLookup<'a>>,
    with_types: bool,
    out: String,
    indent: usize,
}

impl<'a> FirRenderer<'a> {
    pub fn new(names: &'a dyn StringLookup) -> Self {
        FirRenderer {
            names,
            members: None,
            with_types: false,
            out: String::new(),
            indent: 0,
        }
    }

    #[must_use]
    pub fn with_members(mut self, members: MemberLookup<'a>) -> Self {
        self.members = Some(members);
        self
    }

    #[must_use]
    pub fn with_types(mut self, with_types: bool) -> Self {
        self.with_types = with_types;
        self
    }

    pub fn finish(self) -> String {
        self.out
    }

    /// Render one expression into a fresh string.
    pub fn render_expression(names: &dyn StringLookup, expression: &FirExpression) -> String {
        let mut renderer = FirRenderer::new(names);
        expression.accept(&mut renderer, ());
        renderer.finish()
    }

    // === Output helpers ===

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn name(&self, name: Name) -> &'a str {
        self.names.lookup(name)
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
    }

    fn type_ref(&mut self, type_ref: &FirTypeRef) {
        let rendered = type_ref.render(self.names);
        self.push(&rendered);
    }

    fn type_suffix(&mut self, type_ref: &FirTypeRef) {
        if self.with_types && !type_ref.is_implicit() {
            self.push(": ");
            self.type_ref(type_ref);
        }
    }

    fn comma_separated<T>(&mut self, items: &[T], mut each: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            each(self, item);
        }
    }

    fn type_parameters(&mut self, parameters: &[FirTypeParameter]) {
        if parameters.is_empty() {
            return;
        }
        self.push("<");
        self.comma_separated(parameters, |r, p| p.accept(r, ()));
        self.push("> ");
    }

    fn value_parameters(&mut self, parameters: &[FirValueParameter]) {
        self.push("(");
        self.comma_separated(parameters, |r, p| p.accept(r, ()));
        self.push(")");
    }

    fn members(&mut self, members: &[DeclId]) {
        let Some(lookup) = self.members else {
            for member in members {
                self.newline();
                let _ = write!(self.out, "<member #{}>", member.raw());
            }
            return;
        };
        for member in members {
            self.newline();
            match lookup(*member) {
                Some(declaration) => declaration.accept(self, ()),
                None => {
                    let _ = write!(self.out, "<missing member #{}>", member.raw());
                }
            }
        }
    }

    fn block_body(&mut self, block: &FirBlock) {
        self.push("{");
        self.indent += 1;
        for statement in block.statements() {
            self.newline();
            statement.accept(self, ());
        }
        self.indent -= 1;
        self.newline();
        self.push("}");
    }

    fn label_suffix(&mut self, label: Option<Name>) {
        if let Some(label) = label {
            let text = format!("@{}", self.name(label));
            self.push(&text);
        }
    }

    fn receiver_prefix(&mut self, receiver: &FirExpression, safe: bool) {
        if !receiver.is_no_receiver() {
            receiver.accept(self, ());
            self.push(if safe { "?." } else { "." });
        }
    }
}

impl FirVisitor<()> for FirRenderer<'_> {
    type Output = ();

    fn visit_element(&mut self, element: FirElementRef<'_>, data: ()) {
        element.accept_children(self, data);
    }

    fn visit_member(&mut self, member: DeclId, _: ()) {
        self.members(&[member]);
    }

    fn visit_file(&mut self, file: &FirFile, _: ()) {
        let _ = write!(self.out, "FILE: {}", file.name());
        if !file.package_fq_name().is_root() {
            let package = file.package_fq_name().render(self.names);
            self.newline();
            let _ = write!(self.out, "package {package}");
        }
        for import in file.imports() {
            self.newline();
            import.accept(self, ());
        }
        self.members(file.declarations());
    }

    fn visit_import(&mut self, import: &FirImport, _: ()) {
        let path = import.imported_fq_name().render(self.names);
        let _ = write!(self.out, "import {path}");
        if import.is_all_under() {
            self.push(".*");
        }
        if let Some(alias) = import.alias() {
            let alias = self.name(alias);
            let _ = write!(self.out, " as {alias}");
        }
    }

    fn visit_regular_class(&mut self, class: &FirRegularClass, _: ()) {
        self.push(match class.class_kind() {
            ClassKind::Class => "class ",
            ClassKind::Interface => "interface ",
            ClassKind::Object => "object ",
        });
        let name = self.name(class.name());
        self.push(name);
        if !class.type_parameters().is_empty() {
            self.push("<");
            self.comma_separated(class.type_parameters(), |r, p| p.accept(r, ()));
            self.push(">");
        }
        if !class.super_type_refs().is_empty() {
            self.push(" : ");
            self.comma_separated(class.super_type_refs(), |r, t| r.type_ref(t));
        }
        self.push(" {");
        self.indent += 1;
        self.members(class.declarations());
        self.indent -= 1;
        self.newline();
        self.push("}");
    }

    fn visit_type_parameter(&mut self, parameter: &FirTypeParameter, _: ()) {
        match parameter.variance() {
            Variance::Invariant => {}
            Variance::In => self.push("in "),
            Variance::Out => self.push("out "),
        }
        let name = self.name(parameter.name());
        self.push(name);
        if !parameter.bounds().is_empty() {
            self.push(" : ");
            self.comma_separated(parameter.bounds(), |r, t| r.type_ref(t));
        }
    }

    fn visit_simple_function(&mut self, function: &FirSimpleFunction, _: ()) {
        self.push("fun ");
        self.type_parameters(function.type_parameters());
        if let Some(receiver) = function.receiver_type_ref() {
            self.type_ref(receiver);
            self.push(".");
        }
        let name = self.name(function.name());
        self.push(name);
        self.value_parameters(function.value_parameters());
        self.push(": ");
        self.type_ref(function.return_type_ref());
        if let Some(body) = function.body() {
            self.push(" ");
            self.block_body(body);
        }
    }

    fn visit_property(&mut self, property: &FirProperty, _: ()) {
        self.push(if property.is_var() { "var " } else { "val " });
        if let Some(receiver) = property.receiver_type_ref() {
            self.type_ref(receiver);
            self.push(".");
        }
        let name = self.name(property.name());
        self.push(name);
        self.push(": ");
        self.type_ref(property.return_type_ref());
        if let Some(initializer) = property.initializer() {
            self.push(" = ");
            initializer.accept(self, ());
        }
    }

    fn visit_constructor(&mut self, constructor: &FirConstructor, _: ()) {
        self.push("constructor");
        self.value_parameters(constructor.value_parameters());
        self.push(": ");
        self.type_ref(constructor.return_type_ref());
        if let Some(body) = constructor.body() {
            self.push(" ");
            self.block_body(body);
        }
    }

    fn visit_value_parameter(&mut self, parameter: &FirValueParameter, _: ()) {
        if parameter.is_vararg() {
            self.push("vararg ");
        }
        let name = self.name(parameter.name());
        self.push(name);
        self.push(": ");
        self.type_ref(parameter.return_type_ref());
        if let Some(default_value) = parameter.default_value() {
            self.push(" = ");
            default_value.accept(self, ());
        }
    }

    fn visit_type_ref(&mut self, type_ref: &FirTypeRef, _: ()) {
        self.type_ref(type_ref);
    }

    fn visit_reference(&mut self, reference: &FirReference, _: ()) {
        match reference {
            FirReference::Simple(name) | FirReference::Resolved { name, .. } => {
                let name = self.name(*name);
                self.push(name);
            }
            FirReference::Error { name, reason } => {
                let name = self.name(*name);
                let _ = write!(self.out, "<Unresolved name: {name}> /* {reason} */");
            }
            FirReference::This { label } => {
                self.push("this");
                self.label_suffix(*label);
            }
            FirReference::Stub => self.push("<stub>"),
        }
    }

    fn visit_const_expression(&mut self, expression: &FirConstExpression, _: ()) {
        let _ = match expression.value() {
            ConstValue::Null => write!(self.out, "null"),
            ConstValue::Boolean(b) => write!(self.out, "{b}"),
            ConstValue::Char(c) => write!(self.out, "'{c}'"),
            ConstValue::Int(i) => write!(self.out, "{i}"),
            ConstValue::Long(l) => write!(self.out, "{l}L"),
            ConstValue::Double(d) => write!(self.out, "{d:?}"),
            ConstValue::String(s) => write!(self.out, "{s:?}"),
        };
    }

    fn visit_qualified_access_expression(
        &mut self,
        expression: &FirQualifiedAccessExpression,
        _: (),
    ) {
        self.receiver_prefix(expression.explicit_receiver(), expression.safe());
        expression.callee_reference().accept(self, ());
        self.type_suffix(expression.type_ref());
    }

    fn visit_function_call(&mut self, call: &FirFunctionCall, _: ()) {
        self.receiver_prefix(call.explicit_receiver(), call.safe());
        call.callee_reference().accept(self, ());
        if !call.type_arguments().is_empty() {
            self.push("<");
            self.comma_separated(call.type_arguments(), |r, t| r.type_ref(t));
            self.push(">");
        }
        self.push("(");
        self.comma_separated(call.arguments(), |r, a| a.accept(r, ()));
        self.push(")");
        self.type_suffix(call.type_ref());
    }

    fn visit_block(&mut self, block: &FirBlock, _: ()) {
        self.block_body(block);
    }

    fn visit_when_expression(&mut self, expression: &FirWhenExpression, _: ()) {
        self.push("when ");
        if let Some(variable) = expression.subject_variable() {
            self.push("(");
            variable.accept(self, ());
            self.push(") ");
        } else if let Some(subject) = expression.subject() {
            self.push("(");
            subject.accept(self, ());
            self.push(") ");
        }
        self.push("{");
        self.indent += 1;
        for branch in expression.branches() {
            self.newline();
            branch.accept(self, ());
        }
        self.indent -= 1;
        self.newline();
        self.push("}");
        self.type_suffix(expression.type_ref());
    }

    fn visit_when_branch(&mut self, branch: &FirWhenBranch, _: ()) {
        branch.condition().accept(self, ());
        self.push(" -> ");
        self.block_body(branch.result());
    }

    fn visit_when_subject_expression(&mut self, _: &FirWhenSubjectExpression, _: ()) {
        self.push("$subj$");
    }

    fn visit_else_if_true_condition(&mut self, _: &FirElseIfTrueCondition, _: ()) {
        self.push("else");
    }

    fn visit_try_expression(&mut self, expression: &FirTryExpression, _: ()) {
        self.push("try ");
        self.block_body(expression.try_block());
        for catch in expression.catches() {
            catch.accept(self, ());
        }
        if let Some(finally_block) = expression.finally_block() {
            self.push(" finally ");
            self.block_body(finally_block);
        }
        self.type_suffix(expression.type_ref());
    }

    fn visit_catch(&mut self, catch: &FirCatch, _: ()) {
        self.push(" catch (");
        catch.parameter().accept(self, ());
        self.push(") ");
        self.block_body(catch.block());
    }

    fn visit_while_loop(&mut self, r#loop: &FirWhileLoop, _: ()) {
        if let Some(label) = r#loop.label() {
            let label = self.name(label);
            let _ = write!(self.out, "{label}@ ");
        }
        self.push("while (");
        r#loop.condition().accept(self, ());
        self.push(") ");
        self.block_body(r#loop.block());
    }

    fn visit_do_while_loop(&mut self, r#loop: &FirDoWhileLoop, _: ()) {
        if let Some(label) = r#loop.label() {
            let label = self.name(label);
            let _ = write!(self.out, "{label}@ ");
        }
        self.push("do ");
        self.block_body(r#loop.block());
        self.push(" while (");
        r#loop.condition().accept(self, ());
        self.push(")");
    }

    fn visit_loop_jump(&mut self, jump: &FirLoopJump, _: ()) {
        self.push(match jump.kind() {
            LoopJumpKind::Break => "break",
            LoopJumpKind::Continue => "continue",
        });
        self.label_suffix(jump.target_label());
    }

    fn visit_return_expression(&mut self, expression: &FirReturnExpression, _: ()) {
        self.push("return");
        self.label_suffix(expression.target_label());
        if !expression.result().is_no_receiver() {
            self.push(" ");
            expression.result().accept(self, ());
        }
    }

    fn visit_throw_expression(&mut self, expression: &FirThrowExpression, _: ()) {
        self.push("throw ");
        expression.exception().accept(self, ());
    }

    fn visit_anonymous_function(&mut self, function: &FirAnonymousFunction, _: ()) {
        self.push("fun ");
        if let Some(receiver) = function.receiver_type_ref() {
            self.type_ref(receiver);
            self.push(".");
        }
        self.push("<anonymous>");
        self.value_parameters(function.value_parameters());
        self.push(": ");
        self.type_ref(function.return_type_ref());
        if let Some(body) = function.body() {
            self.push(" ");
            self.block_body(body);
        }
    }

    fn visit_this_receiver_expression(&mut self, expression: &FirThisReceiverExpression, _: ()) {
        expression.callee_reference().accept(self, ());
        self.type_suffix(expression.type_ref());
    }

    fn visit_operator_call(&mut self, call: &FirOperatorCall, _: ()) {
        match (call.operation(), call.arguments()) {
            (Operation::Not, [operand]) => {
                self.push("!");
                operand.accept(self, ());
            }
            (operation, [left, right]) => {
                self.push("(");
                left.accept(self, ());
                let _ = write!(self.out, " {} ", operation.symbol());
                right.accept(self, ());
                self.push(")");
            }
            (operation, arguments) => {
                let _ = write!(self.out, "{}(", operation.symbol());
                self.comma_separated(arguments, |r, a| a.accept(r, ()));
                self.push(")");
            }
        }
    }

    fn visit_type_operator_call(&mut self, call: &FirTypeOperatorCall, _: ()) {
        self.push("(");
        call.argument().accept(self, ());
        self.push(match call.operation() {
            TypeOperation::Is => " is ",
            TypeOperation::NotIs => " !is ",
            TypeOperation::As => " as ",
            TypeOperation::SafeAs => " as? ",
        });
        self.type_ref(call.conversion_type_ref());
        self.push(")");
    }

    fn visit_binary_logic_expression(&mut self, expression: &FirBinaryLogicExpression, _: ()) {
        self.push("(");
        expression.left().accept(self, ());
        self.push(match expression.kind() {
            LogicOperation::And => " && ",
            LogicOperation::Or => " || ",
        });
        expression.right().accept(self, ());
        self.push(")");
    }

    fn visit_variable_assignment(&mut self, assignment: &FirVariableAssignment, _: ()) {
        self.receiver_prefix(assignment.explicit_receiver(), false);
        assignment.callee_reference().accept(self, ());
        self.push(" = ");
        assignment.rvalue().accept(self, ());
    }

    fn visit_no_receiver(&mut self, _: ()) {}
}

impl FirStatement {
    /// Convenience wrapper around `FirRenderer`.
    pub fn render(&self, names: &dyn StringLookup) -> String {
        let mut renderer = FirRenderer::new(names);
        self.accept(&mut renderer, ());
        renderer.finish()
    }
}

#[cfg(test)]
mod tests;
