//! The default inference engine.
//!
//! Deliberately small: each type variable is fixed to the common supertype
//! of its lower bounds, falling back to what the expected type implies and
//! then to its declared upper bound. Variables that only lambdas can
//! constrain stay open until the lambdas are analyzed and the call is
//! completed again.

use fir_tree::{ConeType, TypeParameterSymbol};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use super::{CallArgument, CallCompletion, CallInfo, Candidate, CandidateParameter, CompletedCall, InferenceEngine};
use crate::substitution::Substitutor;
use crate::subtyping::TypeContext;

#[derive(Copy, Clone, Debug, Default)]
pub struct SimpleInferenceEngine;

impl SimpleInferenceEngine {
    pub fn new() -> Self {
        SimpleInferenceEngine
    }
}

/// Parameter index for each argument. Vararg parameters take every
/// argument the parameters after them leave over.
fn map_arguments(parameters: &[CandidateParameter], count: usize) -> Option<SmallVec<[usize; 4]>> {
    let mut mapping = SmallVec::new();
    let mut parameter = 0;
    let mut argument = 0;
    while argument < count {
        let current = parameters.get(parameter)?;
        if current.is_vararg {
            let trailing = parameters.len() - parameter - 1;
            let taken = count.saturating_sub(argument + trailing);
            mapping.extend(std::iter::repeat(parameter).take(taken));
            argument += taken;
        } else {
            mapping.push(parameter);
            argument += 1;
        }
        parameter += 1;
    }
    let rest = parameters.get(parameter..).unwrap_or_default();
    rest.iter()
        .all(|p| p.has_default || p.is_vararg)
        .then_some(mapping)
}

fn mentions(ty: &ConeType, variable: &TypeParameterSymbol) -> bool {
    match ty {
        ConeType::TypeParameter { symbol, .. } => symbol == variable,
        ConeType::Class(class) => class
            .type_arguments
            .iter()
            .filter_map(|a| a.ty())
            .any(|a| mentions(a, variable)),
        ConeType::Error(_) => false,
    }
}

fn mentions_any(ty: &ConeType, variables: &[TypeParameterSymbol]) -> bool {
    variables.iter().any(|v| mentions(ty, v))
}

/// Lower bounds collected for the variables of one candidate.
struct Constraints<'a> {
    variables: &'a [TypeParameterSymbol],
    lower: FxHashMap<TypeParameterSymbol, Vec<ConeType>>,
}

impl<'a> Constraints<'a> {
    fn new(variables: &'a [TypeParameterSymbol]) -> Self {
        Constraints {
            variables,
            lower: FxHashMap::default(),
        }
    }

    /// `argument` flows into a slot of type `parameter`.
    fn add(&mut self, parameter: &ConeType, argument: &ConeType, context: &dyn TypeContext) {
        if argument.is_error() {
            return;
        }
        match parameter {
            ConeType::TypeParameter { symbol, nullable } if self.variables.contains(symbol) => {
                let bound = if *nullable {
                    argument.with_nullability(false)
                } else {
                    argument.clone()
                };
                self.lower.entry(symbol.clone()).or_default().push(bound);
            }
            ConeType::Class(class) if !class.type_arguments.is_empty() => {
                let Some(seen) = context.supertype_as(&argument.with_nullability(false), &class.lookup_tag)
                else {
                    return;
                };
                for (slot, actual) in class.type_arguments.iter().zip(&seen.type_arguments) {
                    if let (Some(slot), Some(actual)) = (slot.ty(), actual.ty()) {
                        self.add(slot, actual, context);
                    }
                }
            }
            _ => {}
        }
    }

    fn bounds(&self, variable: &TypeParameterSymbol) -> &[ConeType] {
        self.lower.get(variable).map_or(&[], Vec::as_slice)
    }
}

/// Does a lambda fit a parameter of type `parameter`?
fn lambda_fits(parameter: &ConeType, parameter_count: Option<usize>, context: &dyn TypeContext) -> bool {
    match parameter {
        ConeType::TypeParameter { .. } | ConeType::Error(_) => true,
        ConeType::Class(class) => {
            if class.lookup_tag == context.standard().any {
                return true;
            }
            let Some(arity) = context.standard().function_arity(&class.lookup_tag) else {
                return false;
            };
            let value_parameters = if class.extension_function {
                arity.saturating_sub(1)
            } else {
                arity
            };
            match parameter_count {
                Some(count) => count == value_parameters,
                None => value_parameters <= 1,
            }
        }
    }
}

struct Applicable {
    call: CompletedCall,
    /// Defaults filled in or varargs spread; such candidates lose ties.
    uses_defaults: bool,
}

impl SimpleInferenceEngine {
    fn complete_candidate(
        &self,
        index: usize,
        candidate: &Candidate,
        call: &CallInfo,
        context: &dyn TypeContext,
    ) -> Option<Applicable> {
        let mapping = map_arguments(&candidate.parameters, call.arguments.len())?;
        let variables = candidate.type_parameters.as_slice();
        if !call.explicit_type_arguments.is_empty() && call.explicit_type_arguments.len() != variables.len() {
            return None;
        }

        let mut constraints = Constraints::new(variables);
        if let (Some(expected), Some(actual)) = (&candidate.receiver_type, &call.receiver) {
            constraints.add(expected, actual, context);
        }
        let mut postponed: FxHashSet<&TypeParameterSymbol> = FxHashSet::default();
        for (argument, &parameter) in call.arguments.iter().zip(&mapping) {
            let slot = &candidate.parameters[parameter].ty;
            match argument {
                CallArgument::Expression(ty) => constraints.add(slot, ty, context),
                CallArgument::Lambda { .. } => {
                    postponed.extend(variables.iter().filter(|v| mentions(slot, v)));
                }
            }
        }
        let mut from_expected = Constraints::new(variables);
        if let Some(expected) = &call.expected_type {
            from_expected.add(&candidate.return_type, expected, context);
        }

        let mut substitutor = Substitutor::empty();
        let mut open = Vec::new();
        for (position, variable) in variables.iter().enumerate() {
            let fixed = if let Some(explicit) = call.explicit_type_arguments.get(position) {
                explicit.clone()
            } else if !constraints.bounds(variable).is_empty() {
                context.common_super_type(constraints.bounds(variable))
            } else if !from_expected.bounds(variable).is_empty() {
                context.common_super_type(from_expected.bounds(variable))
            } else if postponed.contains(variable) {
                open.push(variable.clone());
                continue;
            } else {
                context
                    .type_parameter_bounds(variable)
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| ConeType::class(context.standard().any.clone(), Vec::new(), true))
            };
            substitutor.insert(variable.clone(), fixed);
        }

        for variable in variables {
            let Some(fixed) = substitutor.get(variable) else {
                continue;
            };
            let within_bounds = context
                .type_parameter_bounds(variable)
                .iter()
                .all(|bound| context.is_subtype_of(fixed, &substitutor.substitute(bound)));
            if !within_bounds {
                return None;
            }
        }

        match (&candidate.receiver_type, &call.receiver) {
            (Some(expected), Some(actual)) => {
                if !context.is_subtype_of(actual, &substitutor.substitute(expected)) {
                    return None;
                }
            }
            (Some(_), None) => return None,
            _ => {}
        }

        let mut argument_types = Vec::with_capacity(call.arguments.len());
        for (argument, &parameter) in call.arguments.iter().zip(&mapping) {
            let slot = substitutor.substitute(&candidate.parameters[parameter].ty);
            let fits = match argument {
                CallArgument::Lambda { parameter_count } => lambda_fits(&slot, *parameter_count, context),
                CallArgument::Expression(_) if mentions_any(&slot, &open) => true,
                CallArgument::Expression(ty) => context.is_subtype_of(ty, &slot),
            };
            if !fits {
                tracing::trace!(candidate = index, "argument does not fit");
                return None;
            }
            argument_types.push(slot);
        }

        let uses_defaults = candidate.parameters.len() != call.arguments.len()
            || candidate.parameters.iter().any(|p| p.is_vararg);
        Some(Applicable {
            call: CompletedCall {
                candidate: index,
                return_type: substitutor.substitute(&candidate.return_type),
                substitutor,
                argument_types,
            },
            uses_defaults,
        })
    }
}

/// `a` takes arguments no wider than `b` at every position.
fn at_least_as_specific(a: &CompletedCall, b: &CompletedCall, context: &dyn TypeContext) -> bool {
    a.argument_types
        .iter()
        .zip(&b.argument_types)
        .all(|(x, y)| context.is_subtype_of(x, y))
}

fn most_specific(mut applicable: Vec<Applicable>, context: &dyn TypeContext) -> CallCompletion {
    let winners: Vec<usize> = (0..applicable.len())
        .filter(|&i| {
            (0..applicable.len()).all(|j| {
                i == j || at_least_as_specific(&applicable[i].call, &applicable[j].call, context)
            })
        })
        .collect();
    let winners = match winners.as_slice() {
        [] => (0..applicable.len()).collect(),
        _ => winners,
    };
    let exact: Vec<usize> = winners
        .iter()
        .copied()
        .filter(|&i| !applicable[i].uses_defaults)
        .collect();
    let chosen = match (winners.as_slice(), exact.as_slice()) {
        ([only], _) | (_, [only]) => Some(*only),
        _ => None,
    };
    match chosen {
        Some(index) => CallCompletion::Completed(applicable.swap_remove(index).call),
        None => CallCompletion::Ambiguous(winners.iter().map(|&i| applicable[i].call.candidate).collect()),
    }
}

impl InferenceEngine for SimpleInferenceEngine {
    fn complete_call(&self, call: &CallInfo, context: &dyn TypeContext) -> CallCompletion {
        let mut applicable: Vec<Applicable> = call
            .candidates
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| self.complete_candidate(index, candidate, call, context))
            .collect();
        tracing::trace!(
            candidates = call.candidates.len(),
            applicable = applicable.len(),
            "complete call"
        );
        match applicable.len() {
            0 => CallCompletion::NoApplicable,
            1 => match applicable.pop() {
                Some(only) => CallCompletion::Completed(only.call),
                None => CallCompletion::NoApplicable,
            },
            _ => most_specific(applicable, context),
        }
    }
}

#[cfg(test)]
mod tests;
