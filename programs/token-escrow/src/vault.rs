//! Custody vault addressing.
//!
//! A vault lives at a program-derived address seeded by [`VAULT_SEED`] and the
//! escrow entry's own address. Derived addresses sit off the ed25519 curve, so
//! no private key exists for them and only the program can sign for the vault.

use anchor_lang::prelude::Pubkey;

use crate::constants::VAULT_SEED;

/// Derives the vault address and bump for the escrow entry at `escrow`.
pub fn derive_vault(escrow: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_SEED, escrow.as_ref()], program_id)
}

/// Recomputes the vault address from a cached bump.
pub fn vault_address(escrow: &Pubkey, bump: u8, program_id: &Pubkey) -> Option<Pubkey> {
    Pubkey::create_program_address(&[VAULT_SEED, escrow.as_ref(), &[bump]], program_id).ok()
}

/// Whether `vault` is the custody account bound to `escrow`.
pub fn is_vault_for(vault: &Pubkey, escrow: &Pubkey, bump: u8, program_id: &Pubkey) -> bool {
    vault_address(escrow, bump, program_id).is_some_and(|derived| derived == *vault)
}
