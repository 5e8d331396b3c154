//! Implicit receivers: what `this` can mean at a point in a body.

use fir_tree::{ClassId, ConeType, Name};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImplicitReceiverKind {
    /// `this` of an enclosing class.
    Dispatch(ClassId),
    /// Receiver of an extension function or property.
    Extension,
    /// Receiver of a lambda with receiver.
    Lambda,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImplicitReceiver {
    /// `this@label` resolves to the innermost receiver with this label.
    pub label: Option<Name>,
    pub ty: ConeType,
    pub kind: ImplicitReceiverKind,
}

/// Receivers in scope, outermost first.
#[derive(Clone, Debug, Default)]
pub struct ImplicitReceiverStack {
    receivers: Vec<ImplicitReceiver>,
}

impl ImplicitReceiverStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, receiver: ImplicitReceiver) {
        self.receivers.push(receiver);
    }

    pub fn pop(&mut self) -> Option<ImplicitReceiver> {
        self.receivers.pop()
    }

    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.receivers.truncate(len);
    }

    pub fn innermost(&self) -> Option<&ImplicitReceiver> {
        self.receivers.last()
    }

    /// Plain `this` is the innermost receiver; `this@label` the innermost
    /// one carrying `label`.
    pub fn find(&self, label: Option<Name>) -> Option<&ImplicitReceiver> {
        match label {
            None => self.innermost(),
            Some(label) => self.innermost_first().find(|r| r.label == Some(label)),
        }
    }

    pub fn innermost_first(&self) -> impl Iterator<Item = &ImplicitReceiver> {
        self.receivers.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fir_tree::{FqName, SharedInterner};

    #[test]
    fn labels_pick_the_innermost_match() {
        let interner = SharedInterner::new();
        let class = ClassId::top_level(FqName::root(), interner.intern("A"));
        let outer = interner.intern("A");
        let lambda = interner.intern("apply");
        let mut stack = ImplicitReceiverStack::new();
        stack.push(ImplicitReceiver {
            label: Some(outer),
            ty: ConeType::simple(class.clone()),
            kind: ImplicitReceiverKind::Dispatch(class.clone()),
        });
        stack.push(ImplicitReceiver {
            label: Some(lambda),
            ty: ConeType::error("lambda receiver"),
            kind: ImplicitReceiverKind::Lambda,
        });

        assert_eq!(stack.find(None).map(|r| &r.kind), Some(&ImplicitReceiverKind::Lambda));
        assert_eq!(
            stack.find(Some(outer)).map(|r| &r.kind),
            Some(&ImplicitReceiverKind::Dispatch(class))
        );
        assert!(stack.find(Some(interner.intern("missing"))).is_none());
        assert_eq!(stack.innermost_first().count(), 2);
    }
}
