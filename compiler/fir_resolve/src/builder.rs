//! Tree builder.
//!
//! Stands in for a parser front end: creates files, classes and callables,
//! registers them in the session's declaration table and symbol provider,
//! and offers helpers for the expression shapes raw trees contain.
//!
//! ```text
//! let b = FirBuilder::new(&session);
//! let file = b.file("main.kt", "app");
//! let class = b.class(file, "Box").type_parameter("T", Variance::Out, vec![]).build();
//! b.function(class, "get").returns(b.user_type("T")).build();
//! ```
//!
//! Misusing the builder (a member owner that is neither a file nor a class)
//! is a programming error and panics.

use fir_tree::{
    ClassId, ClassKind, ConstValue, DeclarationFlags, DeclarationOrigin, DeclId, FirAnonymousFunction,
    FirBinaryLogicExpression, FirBlock, FirCatch, FirConstExpression, FirConstructor,
    FirDeclaration, FirDeclarationStatus, FirDoWhileLoop, FirElseIfTrueCondition, FirExpression,
    FirFile, FirFunctionCall, FirFunctionTypeRef, FirImport, FirLoopJump, FirOperatorCall,
    FirProperty, FirQualifiedAccessExpression, FirQualifierPart, FirRegularClass,
    FirReturnExpression, FirSimpleFunction, FirStatement, FirThisReceiverExpression,
    FirThrowExpression, FirTryExpression, FirTypeOperatorCall, FirTypeParameter,
    FirTypeProjection, FirTypeRef, FirUserTypeRef, FirValueParameter, FirVariableAssignment,
    FirWhenBranch, FirWhenExpression, FirWhenSubjectExpression, FirWhileLoop, FqName,
    FunctionSymbol, LogicOperation, LoopJumpKind, Modality, Name, Operation, TypeOperation,
    TypeParameterOwner, TypeParameterSymbol, VariableSymbol, Variance, Visibility,
};

use crate::declarations::Designation;
use crate::FirSession;

/// Where a new member goes.
struct Owner {
    id: DeclId,
    designation: Designation,
    package: FqName,
    class: Option<ClassId>,
}

pub struct FirBuilder<'s> {
    session: &'s FirSession,
}

impl<'s> FirBuilder<'s> {
    pub fn new(session: &'s FirSession) -> Self {
        FirBuilder { session }
    }

    pub fn session(&self) -> &'s FirSession {
        self.session
    }

    pub fn name(&self, text: &str) -> Name {
        self.session.name(text)
    }

    pub fn fq_name(&self, dotted: &str) -> FqName {
        FqName::parse(self.session.interner(), dotted)
    }

    /// Parse `pkg/path/Outer.Inner`.
    pub fn class_id(&self, rendered: &str) -> ClassId {
        ClassId::parse(self.session.interner(), rendered)
    }

    // === Type refs ===

    /// `a.b.C` or `C?` as written in source.
    pub fn user_type(&self, text: &str) -> FirTypeRef {
        self.generic_type(text, Vec::new())
    }

    /// A user type whose last segment carries invariant `arguments`.
    pub fn generic_type(&self, text: &str, arguments: Vec<FirTypeRef>) -> FirTypeRef {
        self.projected_type(
            text,
            arguments
                .into_iter()
                .map(|type_ref| FirTypeProjection::Type {
                    variance: Variance::Invariant,
                    type_ref,
                })
                .collect(),
        )
    }

    pub fn projected_type(&self, text: &str, arguments: Vec<FirTypeProjection>) -> FirTypeRef {
        let (path, nullable) = match text.strip_suffix('?') {
            Some(path) => (path, true),
            None => (text, false),
        };
        let mut qualifier: Vec<FirQualifierPart> = path
            .split('.')
            .map(|segment| FirQualifierPart::simple(self.name(segment)))
            .collect();
        if let Some(last) = qualifier.last_mut() {
            last.type_arguments = arguments;
        }
        FirTypeRef::User(FirUserTypeRef { qualifier, nullable })
    }

    pub fn function_type(
        &self,
        receiver: Option<FirTypeRef>,
        parameters: Vec<FirTypeRef>,
        return_type: FirTypeRef,
    ) -> FirTypeRef {
        FirTypeRef::Function(FirFunctionTypeRef {
            receiver: receiver.map(Box::new),
            parameters,
            return_type: Box::new(return_type),
            nullable: false,
        })
    }

    pub fn builtin_type(&self, class_id: &ClassId) -> FirTypeRef {
        FirTypeRef::ImplicitBuiltin(class_id.clone())
    }

    // === Files ===

    /// A source file; [`resolve_files`](crate::resolve_files) resolves it.
    pub fn file(&self, name: &str, package: &str) -> DeclId {
        let id = self.library_file(name, package);
        self.session.register_file(id);
        id
    }

    /// A file whose declarations are visible but that the pipeline skips.
    pub fn library_file(&self, name: &str, package: &str) -> DeclId {
        let package = self.fq_name(package);
        self.session.provider().register_package(&package);
        self.session.declarations().register(
            FirDeclaration::File(Box::new(FirFile::new(name, package))),
            Designation::default(),
        )
    }

    pub fn import(&self, file: DeclId, fq_name: &str) {
        self.add_import(file, FirImport::new(self.fq_name(fq_name), false, None));
    }

    pub fn import_as(&self, file: DeclId, fq_name: &str, alias: &str) {
        let alias = self.name(alias);
        self.add_import(file, FirImport::new(self.fq_name(fq_name), false, Some(alias)));
    }

    pub fn star_import(&self, file: DeclId, fq_name: &str) {
        self.add_import(file, FirImport::new(self.fq_name(fq_name), true, None));
    }

    fn add_import(&self, file: DeclId, import: FirImport) {
        let added = self.session.declarations().update(file, |d| match d {
            FirDeclaration::File(f) => f.add_import(import),
            _ => panic!("imports go into files"),
        });
        if let Err(error) = added {
            panic!("cannot add import: {error}");
        }
    }

    // === Declarations ===

    pub fn class(&self, owner: DeclId, name: &str) -> ClassBuilder<'_, 's> {
        ClassBuilder {
            builder: self,
            owner,
            name: self.name(name),
            kind: ClassKind::Class,
            origin: DeclarationOrigin::Source,
            status: FirDeclarationStatus::default(),
            type_parameters: Vec::new(),
            super_types: Vec::new(),
        }
    }

    pub fn function(&self, owner: DeclId, name: &str) -> FunctionBuilder<'_, 's> {
        FunctionBuilder {
            builder: self,
            owner,
            name: self.name(name),
            origin: DeclarationOrigin::Source,
            status: FirDeclarationStatus::default(),
            type_parameters: Vec::new(),
            receiver: None,
            parameters: Vec::new(),
            return_type: None,
            body: None,
            expression_body: false,
        }
    }

    pub fn property(&self, owner: DeclId, name: &str) -> PropertyBuilder<'_, 's> {
        PropertyBuilder {
            builder: self,
            owner,
            name: self.name(name),
            origin: DeclarationOrigin::Source,
            status: FirDeclarationStatus::default(),
            is_var: false,
            receiver: None,
            return_type: FirTypeRef::Implicit,
            initializer: None,
        }
    }

    pub fn constructor(&self, class: DeclId) -> ConstructorBuilder<'_, 's> {
        ConstructorBuilder {
            builder: self,
            class,
            origin: DeclarationOrigin::Source,
            parameters: Vec::new(),
            body: None,
        }
    }

    fn owner(&self, id: DeclId) -> Owner {
        let table = self.session.declarations();
        let designation = table.designation(id);
        let found = table.with(id, |d| match d {
            FirDeclaration::File(file) => Some((file.package_fq_name().clone(), None)),
            FirDeclaration::RegularClass(class) => Some((
                class.class_id().package_fq_name().clone(),
                Some(class.class_id().clone()),
            )),
            _ => None,
        });
        let (Some(designation), Some(Some((package, class)))) = (designation, found) else {
            panic!("declaration #{} cannot own members", id.raw());
        };
        let designation = if class.is_some() {
            designation.nested(id)
        } else {
            Designation::in_file(id)
        };
        Owner {
            id,
            designation,
            package,
            class,
        }
    }

    fn attach(&self, owner: &Owner, member: DeclId) {
        let attached = self.session.declarations().update(owner.id, |d| match d {
            FirDeclaration::File(file) => file.add_declaration(member),
            FirDeclaration::RegularClass(class) => class.add_declaration(member),
            _ => {}
        });
        if let Err(error) = attached {
            panic!("cannot attach member: {error}");
        }
    }

    fn value_parameter(&self, name: &str, type_ref: FirTypeRef) -> FirValueParameter {
        FirValueParameter::new(self.name(name), self.session.new_local_symbol(), type_ref)
    }

    // === Expressions ===

    pub fn constant(&self, value: ConstValue) -> FirExpression {
        FirExpression::Const(Box::new(FirConstExpression::new(value)))
    }

    pub fn int(&self, value: i64) -> FirExpression {
        self.constant(ConstValue::Int(value))
    }

    pub fn long(&self, value: i64) -> FirExpression {
        self.constant(ConstValue::Long(value))
    }

    pub fn double(&self, value: f64) -> FirExpression {
        self.constant(ConstValue::Double(value))
    }

    pub fn boolean(&self, value: bool) -> FirExpression {
        self.constant(ConstValue::Boolean(value))
    }

    pub fn char(&self, value: char) -> FirExpression {
        self.constant(ConstValue::Char(value))
    }

    pub fn string(&self, value: &str) -> FirExpression {
        self.constant(ConstValue::String(value.to_owned()))
    }

    pub fn null(&self) -> FirExpression {
        self.constant(ConstValue::Null)
    }

    pub fn access(&self, name: &str) -> FirExpression {
        self.access_on(FirExpression::NoReceiver, name)
    }

    pub fn access_on(&self, receiver: FirExpression, name: &str) -> FirExpression {
        FirExpression::QualifiedAccess(Box::new(FirQualifiedAccessExpression::new(
            receiver,
            self.name(name),
            false,
        )))
    }

    pub fn safe_access_on(&self, receiver: FirExpression, name: &str) -> FirExpression {
        FirExpression::QualifiedAccess(Box::new(FirQualifiedAccessExpression::new(
            receiver,
            self.name(name),
            true,
        )))
    }

    pub fn call(&self, name: &str, arguments: Vec<FirExpression>) -> FirExpression {
        self.call_on(FirExpression::NoReceiver, name, arguments)
    }

    pub fn call_on(
        &self,
        receiver: FirExpression,
        name: &str,
        arguments: Vec<FirExpression>,
    ) -> FirExpression {
        FirExpression::FunctionCall(Box::new(FirFunctionCall::new(
            receiver,
            self.name(name),
            Vec::new(),
            arguments,
        )))
    }

    pub fn safe_call_on(
        &self,
        receiver: FirExpression,
        name: &str,
        arguments: Vec<FirExpression>,
    ) -> FirExpression {
        FirExpression::FunctionCall(Box::new(
            FirFunctionCall::new(receiver, self.name(name), Vec::new(), arguments).with_safe(true),
        ))
    }

    pub fn call_with_type_arguments(
        &self,
        name: &str,
        type_arguments: Vec<FirTypeRef>,
        arguments: Vec<FirExpression>,
    ) -> FirExpression {
        FirExpression::FunctionCall(Box::new(FirFunctionCall::new(
            FirExpression::NoReceiver,
            self.name(name),
            type_arguments,
            arguments,
        )))
    }

    pub fn this(&self) -> FirExpression {
        FirExpression::ThisReceiver(Box::new(FirThisReceiverExpression::new(None)))
    }

    pub fn this_at(&self, label: &str) -> FirExpression {
        FirExpression::ThisReceiver(Box::new(FirThisReceiverExpression::new(Some(
            self.name(label),
        ))))
    }

    pub fn operator(&self, operation: Operation, arguments: Vec<FirExpression>) -> FirExpression {
        FirExpression::OperatorCall(Box::new(FirOperatorCall::new(operation, arguments)))
    }

    pub fn equals(&self, left: FirExpression, right: FirExpression) -> FirExpression {
        self.operator(Operation::Equal, vec![left, right])
    }

    pub fn not(&self, argument: FirExpression) -> FirExpression {
        self.operator(Operation::Not, vec![argument])
    }

    pub fn type_operator(
        &self,
        operation: TypeOperation,
        argument: FirExpression,
        type_ref: FirTypeRef,
    ) -> FirExpression {
        FirExpression::TypeOperatorCall(Box::new(FirTypeOperatorCall::new(
            operation, argument, type_ref,
        )))
    }

    pub fn is(&self, argument: FirExpression, type_ref: FirTypeRef) -> FirExpression {
        self.type_operator(TypeOperation::Is, argument, type_ref)
    }

    pub fn cast(&self, argument: FirExpression, type_ref: FirTypeRef) -> FirExpression {
        self.type_operator(TypeOperation::As, argument, type_ref)
    }

    pub fn logic(&self, kind: LogicOperation, left: FirExpression, right: FirExpression) -> FirExpression {
        FirExpression::BinaryLogic(Box::new(FirBinaryLogicExpression::new(kind, left, right)))
    }

    pub fn block(&self, statements: Vec<FirStatement>) -> FirBlock {
        FirBlock::new(statements)
    }

    /// A block holding one expression.
    pub fn block_of(&self, expression: FirExpression) -> FirBlock {
        FirBlock::new(vec![FirStatement::Expression(expression)])
    }

    pub fn block_expression(&self, statements: Vec<FirStatement>) -> FirExpression {
        FirExpression::Block(Box::new(FirBlock::new(statements)))
    }

    pub fn when(&self, subject: Option<FirExpression>, branches: Vec<FirWhenBranch>) -> FirExpression {
        FirExpression::When(Box::new(FirWhenExpression::new(subject, branches)))
    }

    /// `when (val name = initializer) { ... }`
    pub fn when_with_variable(
        &self,
        name: &str,
        initializer: FirExpression,
        branches: Vec<FirWhenBranch>,
    ) -> FirExpression {
        let variable = FirProperty::local(
            self.session.new_local_symbol(),
            self.name(name),
            false,
            FirTypeRef::Implicit,
            Some(initializer),
        );
        FirExpression::When(Box::new(FirWhenExpression::with_subject_variable(variable, branches)))
    }

    pub fn branch(&self, condition: FirExpression, result: FirBlock) -> FirWhenBranch {
        FirWhenBranch::new(condition, result)
    }

    pub fn else_branch(&self, result: FirBlock) -> FirWhenBranch {
        FirWhenBranch::new(
            FirExpression::ElseIfTrueCondition(Box::new(FirElseIfTrueCondition::new())),
            result,
        )
    }

    pub fn subject(&self) -> FirExpression {
        FirExpression::WhenSubject(Box::new(FirWhenSubjectExpression::new()))
    }

    pub fn try_expression(
        &self,
        try_block: FirBlock,
        catches: Vec<FirCatch>,
        finally_block: Option<FirBlock>,
    ) -> FirExpression {
        FirExpression::Try(Box::new(FirTryExpression::new(try_block, catches, finally_block)))
    }

    pub fn catch(&self, name: &str, type_ref: FirTypeRef, block: FirBlock) -> FirCatch {
        FirCatch::new(self.value_parameter(name, type_ref), block)
    }

    pub fn while_loop(&self, label: Option<&str>, condition: FirExpression, block: FirBlock) -> FirStatement {
        let label = label.map(|l| self.name(l));
        FirStatement::WhileLoop(Box::new(FirWhileLoop::new(label, condition, block)))
    }

    pub fn do_while_loop(&self, label: Option<&str>, block: FirBlock, condition: FirExpression) -> FirStatement {
        let label = label.map(|l| self.name(l));
        FirStatement::DoWhileLoop(Box::new(FirDoWhileLoop::new(label, block, condition)))
    }

    pub fn jump(&self, kind: LoopJumpKind, label: Option<&str>) -> FirExpression {
        let label = label.map(|l| self.name(l));
        FirExpression::LoopJump(Box::new(FirLoopJump::new(kind, label)))
    }

    pub fn return_value(&self, result: FirExpression) -> FirExpression {
        FirExpression::Return(Box::new(FirReturnExpression::new(result, None)))
    }

    pub fn return_at(&self, label: &str, result: FirExpression) -> FirExpression {
        FirExpression::Return(Box::new(FirReturnExpression::new(result, Some(self.name(label)))))
    }

    pub fn throw(&self, exception: FirExpression) -> FirExpression {
        FirExpression::Throw(Box::new(FirThrowExpression::new(exception)))
    }

    /// `{ a, b: T -> body }`; `None` parameters means none were written.
    pub fn lambda(&self, parameters: Option<Vec<(&str, FirTypeRef)>>, body: FirBlock) -> FirExpression {
        let parameters = parameters.map(|ps| {
            ps.into_iter()
                .map(|(name, type_ref)| self.value_parameter(name, type_ref))
                .collect()
        });
        FirExpression::AnonymousFunction(Box::new(FirAnonymousFunction::new(None, parameters, body)))
    }

    pub fn labeled_lambda(
        &self,
        label: &str,
        parameters: Option<Vec<(&str, FirTypeRef)>>,
        body: FirBlock,
    ) -> FirExpression {
        let mut lambda = self.lambda(parameters, body);
        if let FirExpression::AnonymousFunction(function) = &mut lambda {
            function.replace_label(Some(self.name(label)));
        }
        lambda
    }

    /// Local `val`; `var` with `is_var`.
    pub fn local(
        &self,
        name: &str,
        is_var: bool,
        type_ref: Option<FirTypeRef>,
        initializer: Option<FirExpression>,
    ) -> FirStatement {
        FirStatement::Property(Box::new(FirProperty::local(
            self.session.new_local_symbol(),
            self.name(name),
            is_var,
            type_ref.unwrap_or_default(),
            initializer,
        )))
    }

    pub fn assign(&self, name: &str, value: FirExpression) -> FirStatement {
        FirStatement::VariableAssignment(Box::new(FirVariableAssignment::new(
            FirExpression::NoReceiver,
            self.name(name),
            value,
        )))
    }
}

struct TypeParameterSpec {
    name: Name,
    variance: Variance,
    bounds: Vec<FirTypeRef>,
}

fn build_type_parameters(
    specs: Vec<TypeParameterSpec>,
    owner: &TypeParameterOwner,
) -> Vec<FirTypeParameter> {
    specs
        .into_iter()
        .zip(0u32..)
        .map(|(parameter, index)| {
            let symbol = TypeParameterSymbol {
                owner: owner.clone(),
                index,
                name: parameter.name,
            };
            FirTypeParameter::new(symbol, parameter.variance, parameter.bounds)
        })
        .collect()
}

pub struct ClassBuilder<'b, 's> {
    builder: &'b FirBuilder<'s>,
    owner: DeclId,
    name: Name,
    kind: ClassKind,
    origin: DeclarationOrigin,
    status: FirDeclarationStatus,
    type_parameters: Vec<TypeParameterSpec>,
    super_types: Vec<FirTypeRef>,
}

impl ClassBuilder<'_, '_> {
    #[must_use]
    pub fn kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn origin(mut self, origin: DeclarationOrigin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn modality(mut self, modality: Modality) -> Self {
        self.status.modality = Some(modality);
        self
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.status.visibility = visibility;
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: DeclarationFlags) -> Self {
        self.status.flags |= flags;
        self
    }

    #[must_use]
    pub fn type_parameter(mut self, name: &str, variance: Variance, bounds: Vec<FirTypeRef>) -> Self {
        self.type_parameters.push(TypeParameterSpec {
            name: self.builder.name(name),
            variance,
            bounds,
        });
        self
    }

    #[must_use]
    pub fn super_type(mut self, type_ref: FirTypeRef) -> Self {
        self.super_types.push(type_ref);
        self
    }

    pub fn build(self) -> DeclId {
        let session = self.builder.session;
        let owner = self.builder.owner(self.owner);
        let class_id = match &owner.class {
            Some(outer) => outer.create_nested(self.name),
            None => ClassId::top_level(owner.package.clone(), self.name),
        };
        let mut class = FirRegularClass::new(class_id.clone(), self.kind, self.origin);
        for parameter in build_type_parameters(
            self.type_parameters,
            &TypeParameterOwner::Class(class_id.clone()),
        ) {
            class.add_type_parameter(parameter);
        }
        class.replace_super_type_refs(self.super_types);
        class.replace_status(self.status);
        let id = session.declarations().register(
            FirDeclaration::RegularClass(Box::new(class)),
            owner.designation.clone(),
        );
        session.provider().register_class(class_id, id);
        self.builder.attach(&owner, id);
        id
    }
}

pub struct FunctionBuilder<'b, 's> {
    builder: &'b FirBuilder<'s>,
    owner: DeclId,
    name: Name,
    origin: DeclarationOrigin,
    status: FirDeclarationStatus,
    type_parameters: Vec<TypeParameterSpec>,
    receiver: Option<FirTypeRef>,
    parameters: Vec<FirValueParameter>,
    return_type: Option<FirTypeRef>,
    body: Option<FirBlock>,
    expression_body: bool,
}

impl FunctionBuilder<'_, '_> {
    #[must_use]
    pub fn origin(mut self, origin: DeclarationOrigin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn modality(mut self, modality: Modality) -> Self {
        self.status.modality = Some(modality);
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: DeclarationFlags) -> Self {
        self.status.flags |= flags;
        self
    }

    #[must_use]
    pub fn type_parameter(mut self, name: &str, bounds: Vec<FirTypeRef>) -> Self {
        self.type_parameters.push(TypeParameterSpec {
            name: self.builder.name(name),
            variance: Variance::Invariant,
            bounds,
        });
        self
    }

    #[must_use]
    pub fn receiver(mut self, type_ref: FirTypeRef) -> Self {
        self.receiver = Some(type_ref);
        self
    }

    #[must_use]
    pub fn parameter(mut self, name: &str, type_ref: FirTypeRef) -> Self {
        let parameter = self.builder.value_parameter(name, type_ref);
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn parameter_with_default(mut self, name: &str, type_ref: FirTypeRef, default: FirExpression) -> Self {
        let parameter = self.builder.value_parameter(name, type_ref).with_default_value(default);
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn vararg_parameter(mut self, name: &str, type_ref: FirTypeRef) -> Self {
        let parameter = self.builder.value_parameter(name, type_ref).with_vararg(true);
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn returns(mut self, type_ref: FirTypeRef) -> Self {
        self.return_type = Some(type_ref);
        self
    }

    /// Block body; without `returns` the return type is `Unit`.
    #[must_use]
    pub fn body(mut self, body: FirBlock) -> Self {
        self.body = Some(body);
        self.expression_body = false;
        self
    }

    /// `= expression`; without `returns` the return type is inferred.
    #[must_use]
    pub fn expression_body(mut self, expression: FirExpression) -> Self {
        let ret = FirExpression::Return(Box::new(FirReturnExpression::new(expression, None)));
        self.body = Some(FirBlock::new(vec![FirStatement::Expression(ret)]));
        self.expression_body = true;
        self
    }

    pub fn build(self) -> DeclId {
        let session = self.builder.session;
        let owner = self.builder.owner(self.owner);
        let return_type = match self.return_type {
            Some(type_ref) => type_ref,
            None if self.expression_body => FirTypeRef::Implicit,
            None => FirTypeRef::ImplicitBuiltin(session.standard().unit.clone()),
        };
        let name = self.name;
        let (origin, status, receiver) = (self.origin, self.status, self.receiver);
        let (parameters, body, specs) = (self.parameters, self.body, self.type_parameters);
        let containing_class = owner.class.clone();
        let id = session.declarations().register_with(owner.designation.clone(), |id| {
            let type_parameters = build_type_parameters(specs, &TypeParameterOwner::Callable(id));
            let mut function = FirSimpleFunction::new(
                FunctionSymbol(id),
                name,
                origin,
                containing_class,
                type_parameters,
                receiver,
                parameters,
                return_type,
                body,
            );
            function.replace_status(status);
            FirDeclaration::SimpleFunction(Box::new(function))
        });
        if owner.class.is_none() {
            session.provider().register_callable(&owner.package, name, id);
        }
        self.builder.attach(&owner, id);
        id
    }
}

pub struct PropertyBuilder<'b, 's> {
    builder: &'b FirBuilder<'s>,
    owner: DeclId,
    name: Name,
    origin: DeclarationOrigin,
    status: FirDeclarationStatus,
    is_var: bool,
    receiver: Option<FirTypeRef>,
    return_type: FirTypeRef,
    initializer: Option<FirExpression>,
}

impl PropertyBuilder<'_, '_> {
    #[must_use]
    pub fn origin(mut self, origin: DeclarationOrigin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn mutable(mut self, is_var: bool) -> Self {
        self.is_var = is_var;
        self
    }

    #[must_use]
    pub fn receiver(mut self, type_ref: FirTypeRef) -> Self {
        self.receiver = Some(type_ref);
        self
    }

    #[must_use]
    pub fn returns(mut self, type_ref: FirTypeRef) -> Self {
        self.return_type = type_ref;
        self
    }

    #[must_use]
    pub fn initializer(mut self, initializer: FirExpression) -> Self {
        self.initializer = Some(initializer);
        self
    }

    pub fn build(self) -> DeclId {
        let session = self.builder.session;
        let owner = self.builder.owner(self.owner);
        let name = self.name;
        let containing_class = owner.class.clone();
        let (origin, status, is_var) = (self.origin, self.status, self.is_var);
        let (receiver, return_type, initializer) = (self.receiver, self.return_type, self.initializer);
        let id = session.declarations().register_with(owner.designation.clone(), |id| {
            let mut property = FirProperty::new(
                VariableSymbol::Property(id),
                name,
                origin,
                containing_class,
                is_var,
                receiver,
                return_type,
                initializer,
            );
            property.replace_status(status);
            FirDeclaration::Property(Box::new(property))
        });
        if owner.class.is_none() {
            session.provider().register_callable(&owner.package, name, id);
        }
        self.builder.attach(&owner, id);
        id
    }
}

pub struct ConstructorBuilder<'b, 's> {
    builder: &'b FirBuilder<'s>,
    class: DeclId,
    origin: DeclarationOrigin,
    parameters: Vec<FirValueParameter>,
    body: Option<FirBlock>,
}

impl ConstructorBuilder<'_, '_> {
    #[must_use]
    pub fn origin(mut self, origin: DeclarationOrigin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn parameter(mut self, name: &str, type_ref: FirTypeRef) -> Self {
        let parameter = self.builder.value_parameter(name, type_ref);
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn body(mut self, body: FirBlock) -> Self {
        self.body = Some(body);
        self
    }

    pub fn build(self) -> DeclId {
        let session = self.builder.session;
        let owner = self.builder.owner(self.class);
        let Some(class_id) = owner.class.clone() else {
            panic!("constructors go into classes");
        };
        let return_type = session
            .declarations()
            .with(self.class, |d| d.as_class().map(FirRegularClass::default_type))
            .flatten()
            .map_or(FirTypeRef::Implicit, FirTypeRef::resolved);
        let (origin, parameters, body) = (self.origin, self.parameters, self.body);
        let id = session.declarations().register_with(owner.designation.clone(), |id| {
            FirDeclaration::Constructor(Box::new(FirConstructor::new(
                FunctionSymbol(id),
                class_id,
                origin,
                parameters,
                return_type,
                body,
            )))
        });
        self.builder.attach(&owner, id);
        id
    }
}

#[cfg(test)]
mod tests;
