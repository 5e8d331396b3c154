//! Call completion.
//!
//! The body resolver collects the candidates visible at one level of the
//! lookup, describes the call site in a [`CallInfo`] and hands both to the
//! session's [`InferenceEngine`]. The engine picks an applicable candidate
//! and infers its type arguments, or reports why it could not.
//!
//! Engines only see cone types. They never touch the tree, so a test can
//! swap in a stub without building any declarations.

mod candidates;
mod simple;

use fir_tree::{ConeType, FirSymbol, Name, TypeParameterSymbol};

pub(crate) use candidates::{
    function_candidate, invoke_candidate, property_type, synthetic_candidate,
};
pub use simple::SimpleInferenceEngine;

use crate::substitution::Substitutor;
use crate::subtyping::TypeContext;

#[derive(Clone, Debug, PartialEq)]
pub struct CandidateParameter {
    pub name: Name,
    /// Element type for a vararg parameter.
    pub ty: ConeType,
    pub has_default: bool,
    pub is_vararg: bool,
}

/// One callee as the engine sees it. Type parameters listed here are the
/// variables to infer; dispatch-receiver substitution is already applied.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub symbol: FirSymbol,
    pub type_parameters: Vec<TypeParameterSymbol>,
    /// Extension receiver, if the callee has one.
    pub receiver_type: Option<ConeType>,
    pub parameters: Vec<CandidateParameter>,
    pub return_type: ConeType,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CallArgument {
    Expression(ConeType),
    /// A lambda whose analysis waits for the input types. `None` when the
    /// lambda declares no parameter list and may take an implicit `it`.
    Lambda { parameter_count: Option<usize> },
}

impl CallArgument {
    pub fn is_lambda(&self) -> bool {
        matches!(self, CallArgument::Lambda { .. })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CallInfo {
    pub name: Name,
    pub candidates: Vec<Candidate>,
    /// Receiver the call is made on, explicit or implicit.
    pub receiver: Option<ConeType>,
    pub arguments: Vec<CallArgument>,
    pub explicit_type_arguments: Vec<ConeType>,
    pub expected_type: Option<ConeType>,
}

impl CallInfo {
    pub fn new(name: Name, candidates: Vec<Candidate>, arguments: Vec<CallArgument>) -> Self {
        CallInfo {
            name,
            candidates,
            receiver: None,
            arguments,
            explicit_type_arguments: Vec::new(),
            expected_type: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompletedCall {
    /// Index into [`CallInfo::candidates`].
    pub candidate: usize,
    pub substitutor: Substitutor,
    pub return_type: ConeType,
    /// Expected type of each argument, in argument order.
    pub argument_types: Vec<ConeType>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CallCompletion {
    Completed(CompletedCall),
    /// Several candidates fit and none is more specific than the others.
    Ambiguous(Vec<usize>),
    NoApplicable,
}

pub trait InferenceEngine: Send + Sync {
    fn complete_call(&self, call: &CallInfo, context: &dyn TypeContext) -> CallCompletion;
}
