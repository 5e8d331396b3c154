//! Turning symbols into candidates.

use fir_tree::{
    ClassId, ConeType, DeclId, FirDeclaration, FirSymbol, FirTypeRef, FirValueParameter,
    FunctionSymbol, ResolvePhase, SyntheticCallKind, TypeParameterOwner, TypeParameterSymbol,
};

use super::{Candidate, CandidateParameter};
use crate::diagnostics::DiagnosticKind;
use crate::phases::ensure_at_least;
use crate::scopes::ProcessorAction;
use crate::substitution::Substitutor;
use crate::subtyping::supertype_as;
use crate::FirSession;

pub(crate) const RECURSIVE_IMPLICIT_TYPE: &str = "cycle in implicit type resolution";

fn return_type_ref(session: &FirSession, id: DeclId) -> Option<FirTypeRef> {
    session
        .declarations()
        .with(id, |d| match d {
            FirDeclaration::SimpleFunction(f) => Some(f.return_type_ref().clone()),
            FirDeclaration::Property(p) => Some(p.return_type_ref().clone()),
            FirDeclaration::Constructor(c) => Some(c.return_type_ref().clone()),
            FirDeclaration::File(_) | FirDeclaration::RegularClass(_) => None,
        })
        .flatten()
}

/// The return type of a function or the type of a property, running
/// implicit-type resolution for it when the type was left out.
///
/// A declaration whose implicit type is already being computed further up
/// the stack gets an error type, and `container` gets the diagnostic.
pub(crate) fn declared_return_type(session: &FirSession, id: DeclId, container: Option<DeclId>) -> ConeType {
    ensure_at_least(session, id, ResolvePhase::Types);
    let Some(mut type_ref) = return_type_ref(session, id) else {
        return ConeType::error(format!("Unknown declaration #{}", id.raw()));
    };
    if type_ref.is_implicit() {
        ensure_at_least(session, id, ResolvePhase::ImplicitTypesBodyResolve);
        type_ref = return_type_ref(session, id).unwrap_or_default();
    }
    if type_ref.is_implicit() {
        let name = session
            .declarations()
            .with(id, |d| session.text(d.name()).to_owned())
            .unwrap_or_default();
        tracing::debug!(declaration = id.raw(), %name, "recursive implicit type");
        session.report(
            DiagnosticKind::RecursiveImplicitType,
            format!("Type checking has run into a recursive problem for `{name}`"),
            container,
        );
        return ConeType::error(RECURSIVE_IMPLICIT_TYPE);
    }
    type_ref.cone_type_or_error()
}

/// Substitution that views members of `owner` through `dispatch`.
fn dispatch_substitutor(session: &FirSession, owner: Option<&ClassId>, dispatch: Option<&ConeType>) -> Substitutor {
    match (owner, dispatch) {
        (Some(owner), Some(dispatch)) => supertype_as(session, &dispatch.with_nullability(false), owner)
            .map(|seen| Substitutor::for_class_type(session, &seen))
            .unwrap_or_default(),
        _ => Substitutor::empty(),
    }
}

fn parameters(values: &[FirValueParameter], substitutor: &Substitutor) -> Vec<CandidateParameter> {
    values
        .iter()
        .map(|p| CandidateParameter {
            name: p.name(),
            ty: substitutor.substitute(&p.return_type_ref().cone_type_or_error()),
            has_default: p.default_value().is_some(),
            is_vararg: p.is_vararg(),
        })
        .collect()
}

fn type_parameter_symbols(parameters: &[fir_tree::FirTypeParameter]) -> Vec<TypeParameterSymbol> {
    parameters.iter().map(|p| p.symbol().clone()).collect()
}

/// Header of a function or constructor, read in one go.
enum Header {
    Function {
        owner: Option<ClassId>,
        type_parameters: Vec<TypeParameterSymbol>,
        receiver: Option<ConeType>,
        parameters: Vec<FirValueParameter>,
    },
    Constructor {
        owner: ClassId,
        parameters: Vec<FirValueParameter>,
    },
}

/// A function or constructor as a candidate. Members are seen through
/// `dispatch`, the receiver they are called on.
pub(crate) fn function_candidate(
    session: &FirSession,
    symbol: FunctionSymbol,
    dispatch: Option<&ConeType>,
    container: Option<DeclId>,
) -> Option<Candidate> {
    ensure_at_least(session, symbol.0, ResolvePhase::Types);
    let header = session
        .declarations()
        .with(symbol.0, |d| match d {
            FirDeclaration::SimpleFunction(f) => Some(Header::Function {
                owner: f.containing_class().cloned(),
                type_parameters: type_parameter_symbols(f.type_parameters()),
                receiver: f.receiver_type_ref().map(FirTypeRef::cone_type_or_error),
                parameters: f.value_parameters().to_vec(),
            }),
            FirDeclaration::Constructor(c) => Some(Header::Constructor {
                owner: c.owner().clone(),
                parameters: c.value_parameters().to_vec(),
            }),
            _ => None,
        })
        .flatten()?;

    match header {
        Header::Function {
            owner,
            type_parameters,
            receiver,
            parameters: values,
        } => {
            let return_type = declared_return_type(session, symbol.0, container);
            let substitutor = dispatch_substitutor(session, owner.as_ref(), dispatch);
            Some(Candidate {
                symbol: FirSymbol::Function(symbol),
                type_parameters,
                receiver_type: receiver.map(|r| substitutor.substitute(&r)),
                parameters: parameters(&values, &substitutor),
                return_type: substitutor.substitute(&return_type),
            })
        }
        // Class type parameters are inferred from the constructor arguments.
        Header::Constructor { owner, parameters: values } => {
            let (type_parameters, return_type) = session.with_class(&owner, |class| {
                (type_parameter_symbols(class.type_parameters()), class.default_type())
            })?;
            Some(Candidate {
                symbol: FirSymbol::Function(symbol),
                type_parameters,
                receiver_type: None,
                parameters: parameters(&values, &Substitutor::empty()),
                return_type,
            })
        }
    }
}

/// `f(x)` where `f` is a value of function type: `f.invoke(x)`.
pub(crate) fn invoke_candidate(
    session: &FirSession,
    function_type: &ConeType,
    container: Option<DeclId>,
) -> Option<Candidate> {
    let class_id = function_type.class_id()?;
    session.standard().function_arity(class_id)?;
    let scope = session.use_site_scope(class_id)?;
    let mut invoke = None;
    scope.process_functions_by_name(session, session.special_names().invoke, &mut |symbol| {
        invoke = Some(symbol);
        ProcessorAction::Stop
    });
    function_candidate(session, invoke?, Some(function_type), container)
}

/// Type of a member or top-level property seen through `dispatch`.
pub(crate) fn property_type(
    session: &FirSession,
    id: DeclId,
    dispatch: Option<&ConeType>,
    container: Option<DeclId>,
) -> ConeType {
    let ty = declared_return_type(session, id, container);
    let owner = session
        .declarations()
        .with(id, |d| d.as_property().and_then(|p| p.containing_class().cloned()))
        .flatten();
    dispatch_substitutor(session, owner.as_ref(), dispatch).substitute(&ty)
}

/// `fun <K> WHEN_CALL(branch0: K, ..., branchN: K): K`
///
/// Branch types unify through the type parameter `K`, so the result is
/// whatever the engine infers for it.
pub(crate) fn synthetic_candidate(session: &FirSession, kind: SyntheticCallKind, branches: usize) -> Candidate {
    let variable = TypeParameterSymbol {
        owner: TypeParameterOwner::Synthetic(kind),
        index: 0,
        name: session.name("K"),
    };
    let ty = ConeType::type_parameter(variable.clone());
    Candidate {
        symbol: FirSymbol::Synthetic(kind),
        type_parameters: vec![variable],
        receiver_type: None,
        parameters: (0..branches)
            .map(|index| CandidateParameter {
                name: session.name(&format!("branch{index}")),
                ty: ty.clone(),
                has_default: false,
                is_vararg: false,
            })
            .collect(),
        return_type: ty,
    }
}
