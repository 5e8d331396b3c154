//! Data-flow notifications from body resolution.
//!
//! The body resolver does no flow analysis of its own. It tells a
//! [`DataFlowAnalyzer`] when control enters and leaves each construct, in
//! evaluation order, and the analyzer builds whatever graph it needs.
//!
//! The session creates one analyzer per body walk through its
//! [`DataFlowAnalyzerFactory`]. Each body is walked once: declarations
//! with an omitted type during the implicit-types phase, all others during
//! body resolve.

use fir_tree::{DeclId, LocalSymbolId, Name};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum JumpKind {
    Break,
    Continue,
    Return,
    Throw,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DataFlowEvent {
    EnterFunction,
    ExitFunction,
    EnterAnonymousFunction,
    ExitAnonymousFunction,

    EnterWhileLoop,
    ExitWhileCondition,
    ExitWhileLoop,

    EnterDoWhileLoop,
    ExitDoWhileBlock,
    EnterDoWhileCondition,
    ExitDoWhileLoop,

    EnterWhenExpression,
    EnterWhenBranchCondition,
    ExitWhenBranchCondition,
    ExitWhenBranchResult,
    ExitWhenExpression { exhaustive: bool },

    EnterTryExpression,
    ExitTryMainBlock,
    EnterCatchClause,
    ExitCatchClause,
    EnterFinallyBlock,
    ExitFinallyBlock,
    ExitTryExpression,

    Jump(JumpKind),
    VariableDeclaration(LocalSymbolId),
    VariableAssignment(Name),
    ExitCall(Name),
}

impl DataFlowEvent {
    pub fn is_loop_event(&self) -> bool {
        matches!(
            self,
            DataFlowEvent::EnterWhileLoop
                | DataFlowEvent::ExitWhileCondition
                | DataFlowEvent::ExitWhileLoop
                | DataFlowEvent::EnterDoWhileLoop
                | DataFlowEvent::ExitDoWhileBlock
                | DataFlowEvent::EnterDoWhileCondition
                | DataFlowEvent::ExitDoWhileLoop
        )
    }
}

/// Receives control-flow notifications.
///
/// Every hook funnels into [`record`](Self::record) by default, so an
/// analyzer can either handle the stream of events or override single hooks.
pub trait DataFlowAnalyzer {
    fn record(&mut self, event: DataFlowEvent) {
        let _ = event;
    }

    fn enter_function(&mut self) {
        self.record(DataFlowEvent::EnterFunction);
    }

    fn exit_function(&mut self) {
        self.record(DataFlowEvent::ExitFunction);
    }

    fn enter_anonymous_function(&mut self) {
        self.record(DataFlowEvent::EnterAnonymousFunction);
    }

    fn exit_anonymous_function(&mut self) {
        self.record(DataFlowEvent::ExitAnonymousFunction);
    }

    fn enter_while_loop(&mut self) {
        self.record(DataFlowEvent::EnterWhileLoop);
    }

    fn exit_while_condition(&mut self) {
        self.record(DataFlowEvent::ExitWhileCondition);
    }

    fn exit_while_loop(&mut self) {
        self.record(DataFlowEvent::ExitWhileLoop);
    }

    fn enter_do_while_loop(&mut self) {
        self.record(DataFlowEvent::EnterDoWhileLoop);
    }

    fn exit_do_while_block(&mut self) {
        self.record(DataFlowEvent::ExitDoWhileBlock);
    }

    fn enter_do_while_condition(&mut self) {
        self.record(DataFlowEvent::EnterDoWhileCondition);
    }

    fn exit_do_while_loop(&mut self) {
        self.record(DataFlowEvent::ExitDoWhileLoop);
    }

    fn enter_when_expression(&mut self) {
        self.record(DataFlowEvent::EnterWhenExpression);
    }

    fn enter_when_branch_condition(&mut self) {
        self.record(DataFlowEvent::EnterWhenBranchCondition);
    }

    fn exit_when_branch_condition(&mut self) {
        self.record(DataFlowEvent::ExitWhenBranchCondition);
    }

    fn exit_when_branch_result(&mut self) {
        self.record(DataFlowEvent::ExitWhenBranchResult);
    }

    fn exit_when_expression(&mut self, exhaustive: bool) {
        self.record(DataFlowEvent::ExitWhenExpression { exhaustive });
    }

    fn enter_try_expression(&mut self) {
        self.record(DataFlowEvent::EnterTryExpression);
    }

    fn exit_try_main_block(&mut self) {
        self.record(DataFlowEvent::ExitTryMainBlock);
    }

    fn enter_catch_clause(&mut self) {
        self.record(DataFlowEvent::EnterCatchClause);
    }

    fn exit_catch_clause(&mut self) {
        self.record(DataFlowEvent::ExitCatchClause);
    }

    fn enter_finally_block(&mut self) {
        self.record(DataFlowEvent::EnterFinallyBlock);
    }

    fn exit_finally_block(&mut self) {
        self.record(DataFlowEvent::ExitFinallyBlock);
    }

    fn exit_try_expression(&mut self) {
        self.record(DataFlowEvent::ExitTryExpression);
    }

    fn jump(&mut self, kind: JumpKind) {
        self.record(DataFlowEvent::Jump(kind));
    }

    fn variable_declaration(&mut self, symbol: LocalSymbolId) {
        self.record(DataFlowEvent::VariableDeclaration(symbol));
    }

    fn variable_assignment(&mut self, name: Name) {
        self.record(DataFlowEvent::VariableAssignment(name));
    }

    fn exit_call(&mut self, name: Name) {
        self.record(DataFlowEvent::ExitCall(name));
    }
}

/// Creates the analyzer for one walk over the body of `declaration`.
pub trait DataFlowAnalyzerFactory: Send + Sync {
    fn analyzer(&self, declaration: DeclId) -> Box<dyn DataFlowAnalyzer + '_>;
}

/// Ignores everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopDataFlowAnalyzer;

impl DataFlowAnalyzer for NoopDataFlowAnalyzer {}

impl DataFlowAnalyzerFactory for NoopDataFlowAnalyzer {
    fn analyzer(&self, _: DeclId) -> Box<dyn DataFlowAnalyzer + '_> {
        Box::new(NoopDataFlowAnalyzer)
    }
}

/// Keeps every event in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingDataFlowAnalyzer {
    pub events: Vec<DataFlowEvent>,
}

impl RecordingDataFlowAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loop_events(&self) -> Vec<DataFlowEvent> {
        self.events.iter().filter(|e| e.is_loop_event()).cloned().collect()
    }
}

impl DataFlowAnalyzer for RecordingDataFlowAnalyzer {
    fn record(&mut self, event: DataFlowEvent) {
        tracing::trace!(?event, "data flow");
        self.events.push(event);
    }
}

/// Keeps the events of every body walk, by declaration.
#[derive(Default)]
pub struct RecordingDataFlowFactory {
    events: Mutex<FxHashMap<DeclId, Vec<DataFlowEvent>>>,
}

impl RecordingDataFlowFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events of every walk over `declaration` so far, in order.
    pub fn events(&self, declaration: DeclId) -> Vec<DataFlowEvent> {
        self.events.lock().get(&declaration).cloned().unwrap_or_default()
    }
}

impl DataFlowAnalyzerFactory for RecordingDataFlowFactory {
    fn analyzer(&self, declaration: DeclId) -> Box<dyn DataFlowAnalyzer + '_> {
        Box::new(FactoryRecorder {
            factory: self,
            declaration,
            recorder: RecordingDataFlowAnalyzer::new(),
        })
    }
}

/// Buffers one walk and hands the events to its factory when dropped.
struct FactoryRecorder<'f> {
    factory: &'f RecordingDataFlowFactory,
    declaration: DeclId,
    recorder: RecordingDataFlowAnalyzer,
}

impl DataFlowAnalyzer for FactoryRecorder<'_> {
    fn record(&mut self, event: DataFlowEvent) {
        self.recorder.record(event);
    }
}

impl Drop for FactoryRecorder<'_> {
    fn drop(&mut self) {
        let events = std::mem::take(&mut self.recorder.events);
        self.factory
            .events
            .lock()
            .entry(self.declaration)
            .or_default()
            .extend(events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hooks_funnel_into_record() {
        let mut dfa = RecordingDataFlowAnalyzer::new();
        dfa.enter_do_while_loop();
        dfa.jump(JumpKind::Break);
        dfa.exit_do_while_loop();
        assert_eq!(
            dfa.events,
            vec![
                DataFlowEvent::EnterDoWhileLoop,
                DataFlowEvent::Jump(JumpKind::Break),
                DataFlowEvent::ExitDoWhileLoop,
            ]
        );
        assert_eq!(dfa.loop_events().len(), 2);
    }

    #[test]
    fn factory_keeps_walks_apart_by_declaration() {
        let factory = RecordingDataFlowFactory::new();
        let (f, g) = (DeclId::from_raw(1), DeclId::from_raw(2));
        {
            let mut first = factory.analyzer(f);
            first.enter_when_expression();
            let mut second = factory.analyzer(g);
            second.jump(JumpKind::Throw);
        }
        factory.analyzer(f).exit_when_expression(true);

        assert_eq!(
            factory.events(f),
            vec![
                DataFlowEvent::EnterWhenExpression,
                DataFlowEvent::ExitWhenExpression { exhaustive: true },
            ]
        );
        assert_eq!(factory.events(g), vec![DataFlowEvent::Jump(JumpKind::Throw)]);
        assert!(factory.events(DeclId::from_raw(3)).is_empty());
    }
}
