//! FIR tree - the typed tree the resolver works on
//!
//! This crate contains the data the resolution pipeline reads and rewrites:
//! - Names and the sharded string interner
//! - Package, class and callable ids
//! - Symbols and cone types
//! - Resolve phases
//! - Tree nodes (statements, expressions, declarations, type refs, references)
//! - The read-only `FirVisitor` and the rewriting `FirTransformer`
//!
//! # Design Philosophy
//!
//! - **Intern names**: strings become `Name(u32)`, compared in O(1)
//! - **Refer by symbol**: trees point at each other through ids, never
//!   through shared pointers; a session turns ids back into declarations
//! - **Narrow mutation**: fields change only through `replace_*` and the
//!   transform protocol

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod flags;
mod ids;
mod interner;
mod name;
pub mod nodes;
mod phase;
mod reference;
mod render;
mod standard_ids;
mod symbols;
mod transformer;
mod type_ref;
mod types;
mod visitor;

pub use flags::{ElementCategory, ElementKind};
pub use ids::{CallableId, ClassId, FqName};
pub use interner::{InternOverflow, SharedInterner, StringInterner, StringLookup};
pub use name::Name;
pub use nodes::{
    transform_inplace, ClassKind, ConstValue, DeclarationFlags, DeclarationOrigin,
    FirAnonymousFunction, FirBinaryLogicExpression, FirBlock, FirCatch, FirConstExpression,
    FirConstructor, FirDeclaration, FirDeclarationStatus, FirDoWhileLoop, FirElseIfTrueCondition,
    FirExpression, FirFile, FirFunctionCall, FirImport, FirLoopJump, FirOperatorCall,
    FirProperty, FirQualifiedAccessExpression, FirRegularClass, FirResolvedImport,
    FirReturnExpression, FirSimpleFunction, FirStatement, FirThisReceiverExpression,
    FirThrowExpression, FirTryExpression, FirTypeOperatorCall, FirTypeParameter,
    FirValueParameter, FirVariableAssignment, FirWhenBranch, FirWhenExpression,
    FirWhenSubjectExpression, FirWhileLoop, LogicOperation, LoopJumpKind, Modality, Operation,
    TypeOperation, Visibility,
};
pub use phase::ResolvePhase;
pub use reference::FirReference;
pub use render::{FirRenderer, MemberLookup};
pub use standard_ids::{StandardClassIds, MAX_FUNCTION_ARITY};
pub use symbols::{
    ClassLikeSymbol, ClassifierSymbol, DeclId, FirSymbol, FunctionSymbol, LocalSymbolId,
    SyntheticCallKind, TypeParameterOwner, TypeParameterSymbol, VariableSymbol,
};
pub use transformer::FirTransformer;
pub use type_ref::{
    FirFunctionTypeRef, FirQualifierPart, FirResolvedTypeRef, FirTypeProjection, FirTypeRef,
    FirUserTypeRef,
};
pub use types::{ConeClassType, ConeErrorKind, ConeErrorType, ConeType, ConeTypeProjection, Variance};
pub use visitor::{FirElementRef, FirVisitor};

// Size assertions to prevent accidental regressions
#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{FirExpression, Name};
    crate::static_assert_size!(Name, 4);
    // Every expression variant is boxed.
    crate::static_assert_size!(FirExpression, 16);
}
