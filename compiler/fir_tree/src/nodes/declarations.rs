//! Declaration nodes.
//!
//! Files and classes list their members by `DeclId`; the members themselves
//! live in the session's declaration table. Transformers reach them through
//! `FirTransformer::transform_member`, which a pass overrides to check a
//! member out of the table, transform it and check it back in.

use bitflags::bitflags;

use super::{getters, impl_accept, transform_inplace, transform_opt, transform_slot};
use super::{FirBlock, FirExpression};
use crate::{
    ClassId, ClassLikeSymbol, ConeType, ConeTypeProjection, DeclId, FirTransformer, FirTypeRef,
    FirVisitor, FqName, FunctionSymbol, LocalSymbolId, Name, ResolvePhase, TypeParameterSymbol,
    VariableSymbol, Variance,
};

// === Status ===

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Not resolved yet; the status phase picks the default.
    #[default]
    Unknown,
    Public,
    Internal,
    Protected,
    Private,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Modality {
    Final,
    Open,
    Abstract,
    Sealed,
}

bitflags! {
    /// Modifiers that do not affect visibility or modality.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct DeclarationFlags: u16 {
        const OVERRIDE = 1 << 0;
        const OPERATOR = 1 << 1;
        const INFIX = 1 << 2;
        const INLINE = 1 << 3;
        const DATA = 1 << 4;
        const INNER = 1 << 5;
        const COMPANION = 1 << 6;
        const EXTERNAL = 1 << 7;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FirDeclarationStatus {
    pub visibility: Visibility,
    pub modality: Option<Modality>,
    pub flags: DeclarationFlags,
}

impl FirDeclarationStatus {
    pub fn is_resolved(&self) -> bool {
        self.visibility != Visibility::Unknown && self.modality.is_some()
    }

    pub fn with_modality(modality: Modality) -> Self {
        FirDeclarationStatus {
            modality: Some(modality),
            ..Self::default()
        }
    }

    pub fn is_override(&self) -> bool {
        self.flags.contains(DeclarationFlags::OVERRIDE)
    }
}

/// Where a declaration came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum DeclarationOrigin {
    #[default]
    Source,
    /// Compiler builtins (`kotlin.Any`, `kotlin.Int`, ...).
    Library,
    /// Loaded from a compiled Java class.
    Java,
    Synthetic,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Object,
}

// === Files and imports ===

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirResolvedImport {
    pub package_fq_name: FqName,
    /// Class part of the import, if it names a class (or a class member).
    pub relative_class_name: Option<FqName>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FirImport {
    imported_fq_name: FqName,
    is_all_under: bool,
    alias: Option<Name>,
    resolved: Option<FirResolvedImport>,
}

getters!(FirImport {
    val imported_fq_name: FqName,
    copy is_all_under: bool,
    opt resolved: FirResolvedImport,
});
impl_accept!(FirImport => visit_import);

impl FirImport {
    pub fn new(imported_fq_name: FqName, is_all_under: bool, alias: Option<Name>) -> Self {
        FirImport {
            imported_fq_name,
            is_all_under,
            alias,
            resolved: None,
        }
    }

    pub fn alias(&self) -> Option<Name> {
        self.alias
    }

    /// Name the import makes visible: the alias, else the last segment.
    pub fn imported_name(&self) -> Option<Name> {
        self.alias.or_else(|| self.imported_fq_name.short_name())
    }

    pub fn replace_resolved(&mut self, resolved: Option<FirResolvedImport>) {
        self.resolved = resolved;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FirFile {
    name: String,
    package_fq_name: FqName,
    imports: Vec<FirImport>,
    declarations: Vec<DeclId>,
    resolve_phase: ResolvePhase,
}

getters!(FirFile {
    val name: String,
    val package_fq_name: FqName,
    list imports: FirImport,
    list declarations: DeclId,
    copy resolve_phase: ResolvePhase,
});
impl_accept!(FirFile => visit_file);

impl FirFile {
    pub fn new(name: impl Into<String>, package_fq_name: FqName) -> Self {
        FirFile {
            name: name.into(),
            package_fq_name,
            imports: Vec::new(),
            declarations: Vec::new(),
            resolve_phase: ResolvePhase::RawFir,
        }
    }

    pub fn add_import(&mut self, import: FirImport) {
        self.imports.push(import);
    }

    pub fn add_declaration(&mut self, declaration: DeclId) {
        self.declarations.push(declaration);
    }

    pub fn replace_resolve_phase(&mut self, phase: ResolvePhase) {
        debug_assert!(phase >= self.resolve_phase, "resolve phase moved backwards");
        self.resolve_phase = phase;
    }

    pub fn transform_imports<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_inplace(&mut self.imports, |i| transformer.transform_import(i, data.clone()));
    }

    pub fn transform_declarations<D: Clone, T: FirTransformer<D> + ?Sized>(
        &self,
        transformer: &mut T,
        data: D,
    ) {
        for member in &self.declarations {
            transformer.transform_member(*member, data.clone());
        }
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        for import in &self.imports {
            import.accept(visitor, data.clone());
        }
        for member in &self.declarations {
            visitor.visit_member(*member, data.clone());
        }
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        self.transform_imports(transformer, data.clone());
        self.transform_declarations(transformer, data);
        self
    }
}

// === Classes ===

#[derive(Clone, Debug, PartialEq)]
pub struct FirTypeParameter {
    symbol: TypeParameterSymbol,
    variance: Variance,
    bounds: Vec<FirTypeRef>,
}

getters!(FirTypeParameter {
    val symbol: TypeParameterSymbol,
    copy variance: Variance,
    list bounds: FirTypeRef,
});
impl_accept!(FirTypeParameter => visit_type_parameter);

impl FirTypeParameter {
    pub fn new(symbol: TypeParameterSymbol, variance: Variance, bounds: Vec<FirTypeRef>) -> Self {
        FirTypeParameter {
            symbol,
            variance,
            bounds,
        }
    }

    pub fn name(&self) -> Name {
        self.symbol.name
    }

    pub fn replace_bounds(&mut self, bounds: Vec<FirTypeRef>) {
        self.bounds = bounds;
    }

    pub fn transform_bounds<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_inplace(&mut self.bounds, |t| transformer.transform_type_ref(t, data.clone()));
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        for bound in &self.bounds {
            bound.accept(visitor, data.clone());
        }
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self,
        transformer: &mut T,
        data: D,
    ) -> Self {
        self.transform_bounds(transformer, data);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FirRegularClass {
    symbol: ClassLikeSymbol,
    class_kind: ClassKind,
    status: FirDeclarationStatus,
    origin: DeclarationOrigin,
    type_parameters: Vec<FirTypeParameter>,
    super_type_refs: Vec<FirTypeRef>,
    declarations: Vec<DeclId>,
    resolve_phase: ResolvePhase,
}

getters!(FirRegularClass {
    val symbol: ClassLikeSymbol,
    copy class_kind: ClassKind,
    val status: FirDeclarationStatus,
    copy origin: DeclarationOrigin,
    list type_parameters: FirTypeParameter,
    list super_type_refs: FirTypeRef,
    list declarations: DeclId,
    copy resolve_phase: ResolvePhase,
});
impl_accept!(FirRegularClass => visit_regular_class);

impl FirRegularClass {
    pub fn new(class_id: ClassId, class_kind: ClassKind, origin: DeclarationOrigin) -> Self {
        FirRegularClass {
            symbol: ClassLikeSymbol(class_id),
            class_kind,
            status: FirDeclarationStatus::default(),
            origin,
            type_parameters: Vec::new(),
            super_type_refs: Vec::new(),
            declarations: Vec::new(),
            resolve_phase: ResolvePhase::RawFir,
        }
    }

    pub fn class_id(&self) -> &ClassId {
        &self.symbol.0
    }

    pub fn name(&self) -> Name {
        self.symbol.0.short_class_name()
    }

    /// The class applied to its own type parameters: `List<E>` inside `List`.
    pub fn default_type(&self) -> ConeType {
        let arguments = self
            .type_parameters
            .iter()
            .map(|p| ConeTypeProjection::invariant(ConeType::type_parameter(p.symbol.clone())))
            .collect();
        ConeType::class(self.class_id().clone(), arguments, false)
    }

    /// Supertypes that are already resolved.
    pub fn resolved_super_types(&self) -> impl Iterator<Item = &ConeType> {
        self.super_type_refs.iter().filter_map(FirTypeRef::cone_type)
    }

    pub fn add_declaration(&mut self, declaration: DeclId) {
        self.declarations.push(declaration);
    }

    pub fn add_type_parameter(&mut self, parameter: FirTypeParameter) {
        self.type_parameters.push(parameter);
    }

    pub fn replace_super_type_refs(&mut self, super_type_refs: Vec<FirTypeRef>) {
        self.super_type_refs = super_type_refs;
    }

    pub fn replace_status(&mut self, status: FirDeclarationStatus) {
        self.status = status;
    }

    pub fn replace_resolve_phase(&mut self, phase: ResolvePhase) {
        debug_assert!(phase >= self.resolve_phase, "resolve phase moved backwards");
        self.resolve_phase = phase;
    }

    pub fn transform_type_parameters<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_inplace(&mut self.type_parameters, |p| {
            transformer.transform_type_parameter(p, data.clone())
        });
    }

    pub fn transform_super_type_refs<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_inplace(&mut self.super_type_refs, |t| {
            transformer.transform_type_ref(t, data.clone())
        });
    }

    pub fn transform_declarations<D: Clone, T: FirTransformer<D> + ?Sized>(
        &self,
        transformer: &mut T,
        data: D,
    ) {
        for member in &self.declarations {
            transformer.transform_member(*member, data.clone());
        }
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        for parameter in &self.type_parameters {
            parameter.accept(visitor, data.clone());
        }
        for super_type in &self.super_type_refs {
            super_type.accept(visitor, data.clone());
        }
        for member in &self.declarations {
            visitor.visit_member(*member, data.clone());
        }
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        self.transform_type_parameters(transformer, data.clone());
        self.transform_super_type_refs(transformer, data.clone());
        self.transform_declarations(transformer, data);
        self
    }
}

// === Callables ===

#[derive(Clone, Debug, PartialEq, Default)]
pub struct FirValueParameter {
    name: Name,
    symbol: LocalSymbolId,
    return_type_ref: FirTypeRef,
    default_value: Option<FirExpression>,
    is_vararg: bool,
}

getters!(FirValueParameter {
    val return_type_ref: FirTypeRef,
    opt default_value: FirExpression,
    copy is_vararg: bool,
});
impl_accept!(FirValueParameter => visit_value_parameter);

impl FirValueParameter {
    pub fn new(name: Name, symbol: LocalSymbolId, return_type_ref: FirTypeRef) -> Self {
        FirValueParameter {
            name,
            symbol,
            return_type_ref,
            default_value: None,
            is_vararg: false,
        }
    }

    #[must_use]
    pub fn with_default_value(mut self, default_value: FirExpression) -> Self {
        self.default_value = Some(default_value);
        self
    }

    #[must_use]
    pub fn with_vararg(mut self, is_vararg: bool) -> Self {
        self.is_vararg = is_vararg;
        self
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn symbol(&self) -> LocalSymbolId {
        self.symbol
    }

    pub fn replace_return_type_ref(&mut self, return_type_ref: FirTypeRef) {
        self.return_type_ref = return_type_ref;
    }

    pub fn transform_return_type_ref<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.return_type_ref, |t| transformer.transform_type_ref(t, data));
    }

    /// Default value.
    pub fn transform_other_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_opt(&mut self.default_value, |e| transformer.transform_expression(e, data));
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        self.return_type_ref.accept(visitor, data.clone());
        if let Some(default_value) = &self.default_value {
            default_value.accept(visitor, data);
        }
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self,
        transformer: &mut T,
        data: D,
    ) -> Self {
        self.transform_return_type_ref(transformer, data.clone());
        self.transform_other_children(transformer, data);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FirSimpleFunction {
    symbol: FunctionSymbol,
    name: Name,
    status: FirDeclarationStatus,
    origin: DeclarationOrigin,
    containing_class: Option<ClassId>,
    type_parameters: Vec<FirTypeParameter>,
    receiver_type_ref: Option<FirTypeRef>,
    value_parameters: Vec<FirValueParameter>,
    return_type_ref: FirTypeRef,
    body: Option<FirBlock>,
    resolve_phase: ResolvePhase,
}

getters!(FirSimpleFunction {
    copy symbol: FunctionSymbol,
    copy name: Name,
    val status: FirDeclarationStatus,
    copy origin: DeclarationOrigin,
    opt containing_class: ClassId,
    list type_parameters: FirTypeParameter,
    opt receiver_type_ref: FirTypeRef,
    list value_parameters: FirValueParameter,
    val return_type_ref: FirTypeRef,
    opt body: FirBlock,
    copy resolve_phase: ResolvePhase,
});
impl_accept!(FirSimpleFunction => visit_simple_function);

impl FirSimpleFunction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: FunctionSymbol,
        name: Name,
        origin: DeclarationOrigin,
        containing_class: Option<ClassId>,
        type_parameters: Vec<FirTypeParameter>,
        receiver_type_ref: Option<FirTypeRef>,
        value_parameters: Vec<FirValueParameter>,
        return_type_ref: FirTypeRef,
        body: Option<FirBlock>,
    ) -> Self {
        FirSimpleFunction {
            symbol,
            name,
            status: FirDeclarationStatus::default(),
            origin,
            containing_class,
            type_parameters,
            receiver_type_ref,
            value_parameters,
            return_type_ref,
            body,
            resolve_phase: ResolvePhase::RawFir,
        }
    }

    pub fn replace_status(&mut self, status: FirDeclarationStatus) {
        self.status = status;
    }

    pub fn replace_return_type_ref(&mut self, return_type_ref: FirTypeRef) {
        self.return_type_ref = return_type_ref;
    }

    pub fn replace_resolve_phase(&mut self, phase: ResolvePhase) {
        debug_assert!(phase >= self.resolve_phase, "resolve phase moved backwards");
        self.resolve_phase = phase;
    }

    pub fn transform_type_parameters<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_inplace(&mut self.type_parameters, |p| {
            transformer.transform_type_parameter(p, data.clone())
        });
    }

    pub fn transform_receiver_type_ref<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_opt(&mut self.receiver_type_ref, |t| transformer.transform_type_ref(t, data));
    }

    pub fn transform_value_parameters<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_inplace(&mut self.value_parameters, |p| {
            transformer.transform_value_parameter(p, data.clone())
        });
    }

    pub fn transform_return_type_ref<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.return_type_ref, |t| transformer.transform_type_ref(t, data));
    }

    pub fn transform_body<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_opt(&mut self.body, |b| transformer.transform_block(b, data));
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        for parameter in &self.type_parameters {
            parameter.accept(visitor, data.clone());
        }
        if let Some(receiver) = &self.receiver_type_ref {
            receiver.accept(visitor, data.clone());
        }
        for parameter in &self.value_parameters {
            parameter.accept(visitor, data.clone());
        }
        self.return_type_ref.accept(visitor, data.clone());
        if let Some(body) = &self.body {
            body.accept(visitor, data);
        }
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        self.transform_type_parameters(transformer, data.clone());
        self.transform_receiver_type_ref(transformer, data.clone());
        self.transform_value_parameters(transformer, data.clone());
        self.transform_return_type_ref(transformer, data.clone());
        self.transform_body(transformer, data);
        self
    }
}

/// Member, top-level or local property.
#[derive(Clone, Debug, PartialEq)]
pub struct FirProperty {
    symbol: VariableSymbol,
    name: Name,
    status: FirDeclarationStatus,
    origin: DeclarationOrigin,
    containing_class: Option<ClassId>,
    is_var: bool,
    receiver_type_ref: Option<FirTypeRef>,
    return_type_ref: FirTypeRef,
    initializer: Option<FirExpression>,
    resolve_phase: ResolvePhase,
}

getters!(FirProperty {
    copy symbol: VariableSymbol,
    copy name: Name,
    val status: FirDeclarationStatus,
    copy origin: DeclarationOrigin,
    opt containing_class: ClassId,
    copy is_var: bool,
    opt receiver_type_ref: FirTypeRef,
    val return_type_ref: FirTypeRef,
    opt initializer: FirExpression,
    copy resolve_phase: ResolvePhase,
});
impl_accept!(FirProperty => visit_property);

impl FirProperty {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: VariableSymbol,
        name: Name,
        origin: DeclarationOrigin,
        containing_class: Option<ClassId>,
        is_var: bool,
        receiver_type_ref: Option<FirTypeRef>,
        return_type_ref: FirTypeRef,
        initializer: Option<FirExpression>,
    ) -> Self {
        FirProperty {
            symbol,
            name,
            status: FirDeclarationStatus::default(),
            origin,
            containing_class,
            is_var,
            receiver_type_ref,
            return_type_ref,
            initializer,
            resolve_phase: ResolvePhase::RawFir,
        }
    }

    /// A local `val`/`var` inside a body.
    pub fn local(symbol: LocalSymbolId, name: Name, is_var: bool, return_type_ref: FirTypeRef, initializer: Option<FirExpression>) -> Self {
        Self::new(
            VariableSymbol::Local(symbol),
            name,
            DeclarationOrigin::Source,
            None,
            is_var,
            None,
            return_type_ref,
            initializer,
        )
    }

    pub fn is_local(&self) -> bool {
        matches!(self.symbol, VariableSymbol::Local(_))
    }

    pub fn replace_status(&mut self, status: FirDeclarationStatus) {
        self.status = status;
    }

    pub fn replace_return_type_ref(&mut self, return_type_ref: FirTypeRef) {
        self.return_type_ref = return_type_ref;
    }

    pub fn replace_resolve_phase(&mut self, phase: ResolvePhase) {
        debug_assert!(phase >= self.resolve_phase, "resolve phase moved backwards");
        self.resolve_phase = phase;
    }

    pub fn transform_receiver_type_ref<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_opt(&mut self.receiver_type_ref, |t| transformer.transform_type_ref(t, data));
    }

    pub fn transform_return_type_ref<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.return_type_ref, |t| transformer.transform_type_ref(t, data));
    }

    pub fn transform_initializer<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_opt(&mut self.initializer, |e| transformer.transform_expression(e, data));
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        if let Some(receiver) = &self.receiver_type_ref {
            receiver.accept(visitor, data.clone());
        }
        self.return_type_ref.accept(visitor, data.clone());
        if let Some(initializer) = &self.initializer {
            initializer.accept(visitor, data);
        }
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        self.transform_receiver_type_ref(transformer, data.clone());
        self.transform_return_type_ref(transformer, data.clone());
        self.transform_initializer(transformer, data);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FirConstructor {
    symbol: FunctionSymbol,
    owner: ClassId,
    status: FirDeclarationStatus,
    origin: DeclarationOrigin,
    value_parameters: Vec<FirValueParameter>,
    return_type_ref: FirTypeRef,
    body: Option<FirBlock>,
    resolve_phase: ResolvePhase,
}

getters!(FirConstructor {
    copy symbol: FunctionSymbol,
    val owner: ClassId,
    val status: FirDeclarationStatus,
    copy origin: DeclarationOrigin,
    list value_parameters: FirValueParameter,
    val return_type_ref: FirTypeRef,
    opt body: FirBlock,
    copy resolve_phase: ResolvePhase,
});
impl_accept!(FirConstructor => visit_constructor);

impl FirConstructor {
    /// `return_type_ref` is the owning class applied to its type parameters.
    pub fn new(
        symbol: FunctionSymbol,
        owner: ClassId,
        origin: DeclarationOrigin,
        value_parameters: Vec<FirValueParameter>,
        return_type_ref: FirTypeRef,
        body: Option<FirBlock>,
    ) -> Self {
        FirConstructor {
            symbol,
            owner,
            status: FirDeclarationStatus::default(),
            origin,
            value_parameters,
            return_type_ref,
            body,
            resolve_phase: ResolvePhase::RawFir,
        }
    }

    pub fn replace_status(&mut self, status: FirDeclarationStatus) {
        self.status = status;
    }

    pub fn replace_return_type_ref(&mut self, return_type_ref: FirTypeRef) {
        self.return_type_ref = return_type_ref;
    }

    pub fn replace_resolve_phase(&mut self, phase: ResolvePhase) {
        debug_assert!(phase >= self.resolve_phase, "resolve phase moved backwards");
        self.resolve_phase = phase;
    }

    pub fn transform_value_parameters<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_inplace(&mut self.value_parameters, |p| {
            transformer.transform_value_parameter(p, data.clone())
        });
    }

    pub fn transform_return_type_ref<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.return_type_ref, |t| transformer.transform_type_ref(t, data));
    }

    pub fn transform_body<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_opt(&mut self.body, |b| transformer.transform_block(b, data));
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        for parameter in &self.value_parameters {
            parameter.accept(visitor, data.clone());
        }
        self.return_type_ref.accept(visitor, data.clone());
        if let Some(body) = &self.body {
            body.accept(visitor, data);
        }
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        self.transform_value_parameters(transformer, data.clone());
        self.transform_return_type_ref(transformer, data.clone());
        self.transform_body(transformer, data);
        self
    }
}

// === Named declarations ===

/// Anything stored in the declaration table.
#[derive(Clone, Debug, PartialEq)]
pub enum FirDeclaration {
    File(Box<FirFile>),
    RegularClass(Box<FirRegularClass>),
    SimpleFunction(Box<FirSimpleFunction>),
    Property(Box<FirProperty>),
    Constructor(Box<FirConstructor>),
}

impl FirDeclaration {
    pub fn resolve_phase(&self) -> ResolvePhase {
        match self {
            FirDeclaration::File(d) => d.resolve_phase(),
            FirDeclaration::RegularClass(d) => d.resolve_phase(),
            FirDeclaration::SimpleFunction(d) => d.resolve_phase(),
            FirDeclaration::Property(d) => d.resolve_phase(),
            FirDeclaration::Constructor(d) => d.resolve_phase(),
        }
    }

    pub fn replace_resolve_phase(&mut self, phase: ResolvePhase) {
        match self {
            FirDeclaration::File(d) => d.replace_resolve_phase(phase),
            FirDeclaration::RegularClass(d) => d.replace_resolve_phase(phase),
            FirDeclaration::SimpleFunction(d) => d.replace_resolve_phase(phase),
            FirDeclaration::Property(d) => d.replace_resolve_phase(phase),
            FirDeclaration::Constructor(d) => d.replace_resolve_phase(phase),
        }
    }

    /// Simple name; constructors are named after their class.
    pub fn name(&self) -> Name {
        match self {
            FirDeclaration::File(_) => Name::EMPTY,
            FirDeclaration::RegularClass(d) => d.name(),
            FirDeclaration::SimpleFunction(d) => d.name(),
            FirDeclaration::Property(d) => d.name(),
            FirDeclaration::Constructor(d) => d.owner().short_class_name(),
        }
    }

    pub fn origin(&self) -> DeclarationOrigin {
        match self {
            FirDeclaration::File(_) => DeclarationOrigin::Source,
            FirDeclaration::RegularClass(d) => d.origin(),
            FirDeclaration::SimpleFunction(d) => d.origin(),
            FirDeclaration::Property(d) => d.origin(),
            FirDeclaration::Constructor(d) => d.origin(),
        }
    }

    /// Copy without bodies or initializers.
    ///
    /// This is what other code sees while the declaration itself is checked
    /// out for transformation.
    #[must_use]
    pub fn signature_only(&self) -> FirDeclaration {
        match self {
            FirDeclaration::SimpleFunction(d) => {
                FirDeclaration::SimpleFunction(Box::new(FirSimpleFunction {
                    body: None,
                    ..(**d).clone()
                }))
            }
            FirDeclaration::Property(d) => FirDeclaration::Property(Box::new(FirProperty {
                initializer: None,
                ..(**d).clone()
            })),
            FirDeclaration::Constructor(d) => {
                FirDeclaration::Constructor(Box::new(FirConstructor {
                    body: None,
                    ..(**d).clone()
                }))
            }
            FirDeclaration::File(_) | FirDeclaration::RegularClass(_) => self.clone(),
        }
    }

    pub fn as_file(&self) -> Option<&FirFile> {
        match self {
            FirDeclaration::File(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&FirRegularClass> {
        match self {
            FirDeclaration::RegularClass(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FirSimpleFunction> {
        match self {
            FirDeclaration::SimpleFunction(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&FirProperty> {
        match self {
            FirDeclaration::Property(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_constructor(&self) -> Option<&FirConstructor> {
        match self {
            FirDeclaration::Constructor(d) => Some(d),
            _ => None,
        }
    }

    pub fn transform<D, T>(self, transformer: &mut T, data: D) -> FirDeclaration
    where
        D: Clone,
        T: FirTransformer<D> + ?Sized,
    {
        match self {
            FirDeclaration::File(d) => FirDeclaration::File(transformer.transform_file(d, data)),
            FirDeclaration::RegularClass(d) => {
                FirDeclaration::RegularClass(transformer.transform_regular_class(d, data))
            }
            FirDeclaration::SimpleFunction(d) => {
                FirDeclaration::SimpleFunction(transformer.transform_simple_function(d, data))
            }
            FirDeclaration::Property(d) => {
                FirDeclaration::Property(transformer.transform_property(d, data))
            }
            FirDeclaration::Constructor(d) => {
                FirDeclaration::Constructor(transformer.transform_constructor(d, data))
            }
        }
    }

    pub fn accept<V, D>(&self, visitor: &mut V, data: D) -> V::Output
    where
        V: FirVisitor<D> + ?Sized,
    {
        match self {
            FirDeclaration::File(d) => d.accept(visitor, data),
            FirDeclaration::RegularClass(d) => d.accept(visitor, data),
            FirDeclaration::SimpleFunction(d) => d.accept(visitor, data),
            FirDeclaration::Property(d) => d.accept(visitor, data),
            FirDeclaration::Constructor(d) => d.accept(visitor, data),
        }
    }
}
