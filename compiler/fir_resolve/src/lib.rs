//! FIR resolution
//!
//! Takes raw trees built by a front end (see [`FirBuilder`]) and resolves
//! them phase by phase:
//!
//! ```text
//! RawFir → Imports → SuperTypes → Types → Status → ImplicitTypesBodyResolve → BodyResolve
//! ```
//!
//! # Architecture
//!
//! - [`FirSession`] owns the declaration table, the symbol provider, the
//!   scope cache and the diagnostics of one compilation.
//! - Scopes answer name lookups through callbacks that can stop early.
//! - [`FirTypeResolver`] turns syntactic type refs into cone types.
//! - [`BodyResolveTransformer`] walks bodies, resolves calls and infers
//!   types, driving a pluggable [`InferenceEngine`] and
//!   [`DataFlowAnalyzer`].
//! - [`resolve_files`] runs every phase over every registered file.
//!
//! Declarations that refer to each other are resolved on demand: asking for
//! a declaration that has not reached a phase yet runs that phase for it
//! first.

pub mod body;
mod builder;
mod builtin_types;
mod builtins;
pub mod calls;
mod cancellation;
mod config;
mod declarations;
mod diagnostics;
pub mod dfa;
mod error;
pub mod phases;
mod pipeline;
mod provider;
mod qualifier;
mod receivers;
pub mod scopes;
mod session;
mod stack;
mod substitution;
mod subtyping;
mod tracing_setup;
mod type_resolver;

pub use body::{BodyResolveTransformer, ResolutionMode};
pub use builder::{ClassBuilder, ConstructorBuilder, FirBuilder, FunctionBuilder, PropertyBuilder};
pub use builtin_types::BuiltinTypeCache;
pub use calls::{
    CallArgument, CallCompletion, CallInfo, Candidate, CandidateParameter, CompletedCall,
    InferenceEngine, SimpleInferenceEngine,
};
pub use cancellation::{CancelAfter, CancellationCheck, CancellationFlag, NeverCancelled};
pub use config::ResolveConfig;
pub use declarations::{DeclarationTable, Designation};
pub use diagnostics::{DiagnosticKind, DiagnosticSink, FirDiagnostic};
pub use dfa::{
    DataFlowAnalyzer, DataFlowAnalyzerFactory, DataFlowEvent, JumpKind, NoopDataFlowAnalyzer,
    RecordingDataFlowAnalyzer, RecordingDataFlowFactory,
};
pub use error::ResolveError;
pub use pipeline::{resolve_files, ResolveSummary};
pub use provider::{CallableIds, SymbolProvider};
pub use qualifier::resolve_qualifier;
pub use receivers::{ImplicitReceiver, ImplicitReceiverKind, ImplicitReceiverStack};
pub use scopes::{ClassScopeProvider, FirScope, LookupPosition, ProcessorAction};
pub use session::{FirSession, SessionId, SpecialNames};
pub use stack::ensure_sufficient_stack;
pub use substitution::Substitutor;
pub use subtyping::{direct_supertypes, supertype_as, SessionTypeContext, TypeContext};
pub use tracing_setup::init_tracing;
pub use type_resolver::FirTypeResolver;
