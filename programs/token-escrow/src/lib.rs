use anchor_lang::prelude::*;

declare_id!("DnisM2y5SdDk88qjP34iCVecY3m3zWMmEqQWNSE5o2Y");

pub mod constants;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod vault;
pub mod state;
pub use state::*;
pub mod contexts;
pub use contexts::*;

#[cfg(not(target_os = "solana"))]
pub mod engine;
#[cfg(not(target_os = "solana"))]
pub mod ledger;

use lifecycle::Terms;

#[program]
pub mod token_escrow {
    use super::*;

    /// Opens an escrow entry and locks `amount_a` of `mint_a` in a vault derived from it
    /// The maker asks for `amount_b` of `mint_b` in return
    ///
    /// Fails with `InvalidAmount` for a zero amount and `InsufficientFunds` when the maker holds
    /// less than `amount_a`. Reusing an entry keypair is rejected by the system program
    /// ("account already in use") while the accounts are created, before this handler runs
    pub fn make(ctx: Context<Make>, amount_a: u64, amount_b: u64) -> Result<()> {
        let terms = Terms::new(amount_a, amount_b)?;
        ctx.accounts.save_escrow(terms, &ctx.bumps)?;
        ctx.accounts.deposit(terms.amount_a)?;
        ctx.accounts.emit_made();
        Ok(())
    }

    /// Settles the escrow: the taker pays the maker and receives the vault
    /// Both transfers run in one instruction, so they succeed or fail together
    ///
    /// Fails with `InvalidVault` for a vault not derived from this entry and `InsufficientFunds`
    /// when the taker cannot pay `amount_b`. A settled or refunded entry is closed, so a later
    /// call fails with Anchor's `AccountNotInitialized` (3012) instead of `InvalidState`
    pub fn take(ctx: Context<Take>) -> Result<()> {
        ctx.accounts.pay_maker()?;
        ctx.accounts.withdraw_and_close_vault()?;
        ctx.accounts.emit_taken();
        Ok(())
    }

    /// Cancels the escrow and returns the vault to the maker
    /// Only the maker can sign for it
    ///
    /// Any other signer fails with `Unauthorized`, a foreign vault with `InvalidVault`. As with
    /// `take`, an entry that was already closed fails with `AccountNotInitialized` (3012)
    pub fn refund(ctx: Context<Refund>) -> Result<()> {
        ctx.accounts.refund_and_close_vault()?;
        ctx.accounts.emit_refunded();
        Ok(())
    }
}
