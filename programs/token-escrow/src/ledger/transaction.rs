use std::ops::{Deref, DerefMut};

use super::Ledger;

/// Scoped commit over a ledger.
///
/// Writes go to a staged copy. [`Transaction::commit`] replaces the target
/// with the staged state; dropping the transaction without committing
/// discards every write, so an early `?` return leaves the target untouched.
pub struct Transaction<'a, L: Ledger> {
    target: &'a mut L,
    staged: L,
}

impl<'a, L: Ledger> Transaction<'a, L> {
    pub fn begin(target: &'a mut L) -> Self {
        let staged = target.clone();
        Self { target, staged }
    }

    pub fn commit(self) {
        let Self { target, staged } = self;
        *target = staged;
    }
}

impl<L: Ledger> Deref for Transaction<'_, L> {
    type Target = L;

    fn deref(&self) -> &L {
        &self.staged
    }
}

impl<L: Ledger> DerefMut for Transaction<'_, L> {
    fn deref_mut(&mut self) -> &mut L {
        &mut self.staged
    }
}
