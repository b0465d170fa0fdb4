//! Escrow lifecycle: `Live -> Settled` or `Live -> Cancelled`.
//!
//! An entry that has not been created yet has no status at all; callers
//! report that case as [`EscrowError::InvalidState`] as well.

use crate::error::EscrowError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscrowStatus {
    Live,
    Settled,
    Cancelled,
}

impl EscrowStatus {
    pub fn is_live(self) -> bool {
        self == EscrowStatus::Live
    }

    pub fn is_terminal(self) -> bool {
        !self.is_live()
    }

    pub fn ensure_live(self) -> Result<(), EscrowError> {
        if self.is_live() {
            Ok(())
        } else {
            Err(EscrowError::InvalidState)
        }
    }

    /// Taker completed the swap.
    pub fn settle(&mut self) -> Result<(), EscrowError> {
        self.ensure_live()?;
        *self = EscrowStatus::Settled;
        Ok(())
    }

    /// Maker reclaimed the vault.
    pub fn cancel(&mut self) -> Result<(), EscrowError> {
        self.ensure_live()?;
        *self = EscrowStatus::Cancelled;
        Ok(())
    }
}

/// Exchange terms checked at creation time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Terms {
    /// Amount of `mint_a` the maker locks in the vault
    pub amount_a: u64,
    /// Amount of `mint_b` the maker expects back
    pub amount_b: u64,
}

impl Terms {
    pub fn new(amount_a: u64, amount_b: u64) -> Result<Self, EscrowError> {
        if amount_a == 0 || amount_b == 0 {
            return Err(EscrowError::InvalidAmount);
        }
        Ok(Self { amount_a, amount_b })
    }
}
