//! Whether a `when` covers every value of its subject.
//!
//! A `when` is exhaustive when it has an `else` branch, or when its subject
//! is one of:
//!
//! - `Boolean`, with both `true` and `false` checked,
//! - a sealed class, with every direct subclass checked by `is` (a sealed
//!   subclass may instead be covered by checks of its own subclasses).
//!
//! A nullable subject additionally needs a `null` branch.

use fir_tree::{
    ClassId, ConeType, ConstValue, FirExpression, FirReference, FirSymbol, FirWhenExpression,
    LogicOperation, Modality, Operation, ResolvePhase, TypeOperation, VariableSymbol,
};
use rustc_hash::FxHashSet;

use crate::phases::ensure_at_least;
use crate::subtyping::{SessionTypeContext, TypeContext};
use crate::FirSession;

#[derive(Default)]
struct Coverage {
    null: bool,
    true_checked: bool,
    false_checked: bool,
    types: Vec<ConeType>,
}

/// Reads branch conditions for checks against the subject.
struct ConditionReader {
    subject_variable: Option<fir_tree::LocalSymbolId>,
}

impl ConditionReader {
    fn is_subject(&self, expression: &FirExpression) -> bool {
        match expression {
            FirExpression::WhenSubject(_) => true,
            FirExpression::QualifiedAccess(access) => match (access.callee_reference(), self.subject_variable) {
                (
                    FirReference::Resolved {
                        symbol: FirSymbol::Variable(VariableSymbol::Local(id)),
                        ..
                    },
                    Some(subject),
                ) => *id == subject,
                _ => false,
            },
            _ => false,
        }
    }

    fn read(&self, condition: &FirExpression, coverage: &mut Coverage) {
        match condition {
            FirExpression::BinaryLogic(logic) if logic.kind() == LogicOperation::Or => {
                self.read(logic.left(), coverage);
                self.read(logic.right(), coverage);
            }
            FirExpression::Const(constant) => record_constant(constant.value(), coverage),
            FirExpression::OperatorCall(call) if call.operation() == Operation::Equal => {
                if let [left, right] = call.arguments() {
                    let constant = match (left, right) {
                        (subject, FirExpression::Const(c)) | (FirExpression::Const(c), subject)
                            if self.is_subject(subject) =>
                        {
                            Some(c.value())
                        }
                        _ => None,
                    };
                    if let Some(value) = constant {
                        record_constant(value, coverage);
                    }
                }
            }
            FirExpression::TypeOperatorCall(call)
                if call.operation() == TypeOperation::Is && self.is_subject(call.argument()) =>
            {
                if let Some(ty) = call.conversion_type_ref().cone_type() {
                    if ty.is_nullable() {
                        coverage.null = true;
                    }
                    coverage.types.push(ty.with_nullability(false));
                }
            }
            _ => {}
        }
    }
}

fn record_constant(value: &ConstValue, coverage: &mut Coverage) {
    match value {
        ConstValue::Null => coverage.null = true,
        ConstValue::Boolean(true) => coverage.true_checked = true,
        ConstValue::Boolean(false) => coverage.false_checked = true,
        _ => {}
    }
}

pub(super) fn is_exhaustive(session: &FirSession, when: &FirWhenExpression, subject: Option<&ConeType>) -> bool {
    if when.branches().iter().any(|branch| branch.is_else()) {
        return true;
    }
    let Some(subject) = subject.filter(|s| !s.is_error()) else {
        return false;
    };
    let reader = ConditionReader {
        subject_variable: when.subject_variable().and_then(|p| match p.symbol() {
            VariableSymbol::Local(id) => Some(id),
            VariableSymbol::Property(_) => None,
        }),
    };
    let mut coverage = Coverage::default();
    for branch in when.branches() {
        reader.read(branch.condition(), &mut coverage);
    }
    if subject.is_nullable() && !coverage.null {
        return false;
    }
    covers_non_null(session, subject, &coverage)
}

fn covers_non_null(session: &FirSession, subject: &ConeType, coverage: &Coverage) -> bool {
    let non_null = subject.with_nullability(false);
    let context = SessionTypeContext::new(session);
    if coverage.types.iter().any(|ty| context.is_subtype_of(&non_null, ty)) {
        return true;
    }
    let Some(class_id) = non_null.class_id() else {
        return false;
    };
    if *class_id == session.standard().boolean {
        return coverage.true_checked && coverage.false_checked;
    }
    let checked: FxHashSet<&ClassId> = coverage.types.iter().filter_map(ConeType::class_id).collect();
    let mut visited = FxHashSet::default();
    is_sealed(session, class_id) && sealed_covered(session, class_id, &checked, &mut visited)
}

fn is_sealed(session: &FirSession, class_id: &ClassId) -> bool {
    if let Some(id) = session.class_decl_id(class_id) {
        ensure_at_least(session, id, ResolvePhase::Status);
    }
    session
        .with_class(class_id, |class| class.status().modality == Some(Modality::Sealed))
        .unwrap_or(false)
}

/// Classes declaring `sealed` as a direct supertype.
fn direct_subclasses(session: &FirSession, sealed: &ClassId) -> Vec<ClassId> {
    session
        .provider()
        .all_class_ids()
        .into_iter()
        .filter(|candidate| candidate != sealed)
        .filter(|candidate| {
            if let Some(id) = session.class_decl_id(candidate) {
                ensure_at_least(session, id, ResolvePhase::SuperTypes);
            }
            session
                .with_class(candidate, |class| class.resolved_super_types().any(|s| s.is_class(sealed)))
                .unwrap_or(false)
        })
        .collect()
}

fn sealed_covered(
    session: &FirSession,
    sealed: &ClassId,
    checked: &FxHashSet<&ClassId>,
    visited: &mut FxHashSet<ClassId>,
) -> bool {
    if !visited.insert(sealed.clone()) {
        return false;
    }
    let subclasses = direct_subclasses(session, sealed);
    !subclasses.is_empty()
        && subclasses.iter().all(|subclass| {
            checked.contains(subclass)
                || (is_sealed(session, subclass) && sealed_covered(session, subclass, checked, visited))
        })
}
