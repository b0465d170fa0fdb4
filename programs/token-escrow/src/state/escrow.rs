use anchor_lang::prelude::*;

use crate::{constants::DISCRIMINATOR_LEN, vault};

/// Defines the data stored for an escrow entry:
/// - the maker who created it,
/// - the offered and requested token types (`mint_a` and `mint_b`),
/// - the locked and requested amounts,
/// - and the bump of the vault derived from the entry's address.
#[account]
#[derive(InitSpace, Debug, PartialEq, Eq)]
pub struct Escrow {
    pub maker: Pubkey,  // creator of the trade, receives rent back on close
    pub mint_a: Pubkey, // token locked in the vault
    pub mint_b: Pubkey, // token the maker expects in return
    pub amount_a: u64,  // amount of mint_a held by the vault
    pub amount_b: u64,  // amount of mint_b the taker must pay
    pub bump: u8,       // vault bump, used to sign for the vault
}

impl Escrow {
    /// Account size including the discriminator
    pub const SPACE: usize = DISCRIMINATOR_LEN + Escrow::INIT_SPACE;

    /// Whether `vault` is the custody account derived for the entry at `escrow`
    pub fn owns_vault(&self, escrow: &Pubkey, vault: &Pubkey) -> bool {
        vault::is_vault_for(vault, escrow, self.bump, &crate::ID)
    }
}
