//! Session declaration table.
//!
//! Every named declaration lives here, addressed by `DeclId`. A pass that
//! rewrites a declaration checks it out (taking ownership), transforms it,
//! and checks it back in. While it is out, readers see a signature-only
//! shadow: the header stays visible, the body does not.
//!
//! Checking out a declaration that is already out fails with
//! [`ResolveError::DeclarationInUse`]. Phased resolution relies on this to
//! notice that it is being asked to resolve something it is in the middle
//! of resolving.

use fir_tree::{DeclId, FirDeclaration, ResolvePhase};
use parking_lot::RwLock;

use crate::ResolveError;

/// Where a declaration sits: its file and the classes around it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Designation {
    pub file: Option<DeclId>,
    /// Enclosing classes, outermost first.
    pub classes: Vec<DeclId>,
}

impl Designation {
    pub fn in_file(file: DeclId) -> Self {
        Designation {
            file: Some(file),
            classes: Vec::new(),
        }
    }

    /// The designation of a member declared directly inside `class`.
    #[must_use]
    pub fn nested(&self, class: DeclId) -> Self {
        let mut classes = self.classes.clone();
        classes.push(class);
        Designation {
            file: self.file,
            classes,
        }
    }

    pub fn innermost_class(&self) -> Option<DeclId> {
        self.classes.last().copied()
    }
}

enum SlotState {
    Available(FirDeclaration),
    CheckedOut { shadow: FirDeclaration },
}

struct Slot {
    state: SlotState,
    designation: Designation,
}

impl Slot {
    fn current(&self) -> &FirDeclaration {
        match &self.state {
            SlotState::Available(declaration) => declaration,
            SlotState::CheckedOut { shadow } => shadow,
        }
    }
}

#[derive(Default)]
pub struct DeclarationTable {
    slots: RwLock<Vec<Slot>>,
}

impl DeclarationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    pub fn ids(&self) -> Vec<DeclId> {
        (0..self.len()).map(Self::id_at).collect()
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "the table never holds more than u32::MAX declarations"
    )]
    fn id_at(index: usize) -> DeclId {
        DeclId::from_raw(index as u32)
    }

    pub fn register(&self, declaration: FirDeclaration, designation: Designation) -> DeclId {
        self.register_with(designation, |_| declaration)
    }

    /// Register a declaration that needs its own id (symbols refer to it).
    ///
    /// `build` runs under the table's write lock and must not touch the table.
    pub fn register_with(
        &self,
        designation: Designation,
        build: impl FnOnce(DeclId) -> FirDeclaration,
    ) -> DeclId {
        let mut slots = self.slots.write();
        let id = Self::id_at(slots.len());
        slots.push(Slot {
            state: SlotState::Available(build(id)),
            designation,
        });
        id
    }

    /// A copy of the declaration; the signature-only shadow if checked out.
    pub fn get(&self, id: DeclId) -> Option<FirDeclaration> {
        self.with(id, FirDeclaration::clone)
    }

    /// Read the declaration in place.
    ///
    /// `f` runs under the table's read lock and must not write to the table.
    pub fn with<R>(&self, id: DeclId, f: impl FnOnce(&FirDeclaration) -> R) -> Option<R> {
        let slots = self.slots.read();
        slots.get(id.index()).map(|slot| f(slot.current()))
    }

    pub fn phase(&self, id: DeclId) -> Option<ResolvePhase> {
        self.with(id, FirDeclaration::resolve_phase)
    }

    pub fn designation(&self, id: DeclId) -> Option<Designation> {
        self.slots
            .read()
            .get(id.index())
            .map(|slot| slot.designation.clone())
    }

    pub fn is_checked_out(&self, id: DeclId) -> bool {
        self.slots
            .read()
            .get(id.index())
            .is_some_and(|slot| matches!(slot.state, SlotState::CheckedOut { .. }))
    }

    /// Take the declaration out for transformation.
    pub fn checkout(&self, id: DeclId) -> Result<FirDeclaration, ResolveError> {
        let mut slots = self.slots.write();
        let slot = slots
            .get_mut(id.index())
            .ok_or(ResolveError::UnknownDeclaration(id))?;
        match &slot.state {
            SlotState::CheckedOut { .. } => Err(ResolveError::DeclarationInUse(id)),
            SlotState::Available(declaration) => {
                let shadow = declaration.signature_only();
                let SlotState::Available(declaration) =
                    std::mem::replace(&mut slot.state, SlotState::CheckedOut { shadow })
                else {
                    unreachable!("slot state changed under the write lock");
                };
                tracing::trace!(id = id.raw(), "checked out");
                Ok(declaration)
            }
        }
    }

    /// Put a transformed declaration back.
    ///
    /// # Panics
    /// Panics if `id` is not checked out; that is a bug in the pass.
    pub fn checkin(&self, id: DeclId, declaration: FirDeclaration) {
        let mut slots = self.slots.write();
        let slot = slots
            .get_mut(id.index())
            .unwrap_or_else(|| panic!("checkin of unknown declaration #{}", id.raw()));
        assert!(
            matches!(slot.state, SlotState::CheckedOut { .. }),
            "checkin of declaration #{} that was not checked out",
            id.raw()
        );
        slot.state = SlotState::Available(declaration);
        tracing::trace!(id = id.raw(), "checked in");
    }

    /// Mutate an available declaration in place (builders adding members).
    pub fn update(
        &self,
        id: DeclId,
        f: impl FnOnce(&mut FirDeclaration),
    ) -> Result<(), ResolveError> {
        let mut slots = self.slots.write();
        let slot = slots
            .get_mut(id.index())
            .ok_or(ResolveError::UnknownDeclaration(id))?;
        match &mut slot.state {
            SlotState::Available(declaration) => {
                f(declaration);
                Ok(())
            }
            SlotState::CheckedOut { .. } => Err(ResolveError::DeclarationInUse(id)),
        }
    }
}

#[cfg(test)]
mod tests;
