//! Escrow operations executed against a [`Ledger`].
//!
//! Each operation validates against the committed state, then replays its
//! writes inside a [`Transaction`](crate::ledger::Transaction). Any failure
//! drops the transaction, so callers observe either the whole operation or
//! nothing.

mod make;
mod refund;
mod take;

pub use make::{make, MakeArgs};
pub use refund::{refund, RefundAccounts};
pub use take::{take, TakeAccounts};

use anchor_lang::prelude::Pubkey;

use crate::{
    error::EscrowError,
    ledger::{
        AssetLedger, Custody, EntryStore, EscrowEntry, FundedAccounts, Ledger, LedgerResult,
        VaultSigner,
    },
    lifecycle::EscrowStatus,
    vault,
};

/// Loads an entry that can still be taken or refunded.
fn live_entry<L: Ledger>(ledger: &L, escrow: &Pubkey) -> LedgerResult<EscrowEntry> {
    let entry = ledger
        .entry(escrow)
        .cloned()
        .ok_or(EscrowError::InvalidState)?;
    entry.status.ensure_live()?;
    Ok(entry)
}

/// Grants the capability to sign for `entry`'s vault once `supplied_vault`
/// is confirmed to be that vault.
fn vault_signer<L: Ledger>(
    ledger: &L,
    entry: &EscrowEntry,
    supplied_vault: &Pubkey,
) -> LedgerResult<VaultSigner> {
    let program_id = ledger.config().program_id;
    if !vault::is_vault_for(supplied_vault, &entry.id, entry.escrow.bump, &program_id) {
        return Err(EscrowError::InvalidVault);
    }
    VaultSigner::new(&entry.id, entry.escrow.bump, &program_id)
}

/// Checks that `address` is `owner`'s wallet account for `mint`.
fn check_account<L: Ledger>(
    ledger: &L,
    address: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
) -> LedgerResult<()> {
    match ledger.account(address) {
        Some(account)
            if account.mint == *mint
                && account.authority == *owner
                && account.custody == Custody::Wallet =>
        {
            Ok(())
        }
        _ => Err(EscrowError::InvalidTokenAccount),
    }
}

/// Opens `owner`'s account for `mint` at `address` unless it already exists.
fn ensure_account<L: Ledger>(
    ledger: &mut L,
    payer: &Pubkey,
    address: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
) -> LedgerResult<()> {
    if ledger.account(address).is_some() {
        return check_account(ledger, address, owner, mint);
    }
    let created = ledger.create_account(payer, owner, mint)?;
    if created != *address {
        return Err(EscrowError::InvalidTokenAccount);
    }
    Ok(())
}

/// Applies a terminal transition and returns the entry's deposit to the maker.
fn close_entry<L: Ledger>(
    ledger: &mut L,
    escrow: &Pubkey,
    transition: fn(&mut EscrowStatus) -> LedgerResult<()>,
) -> LedgerResult<()> {
    let entry = ledger
        .entry_mut(escrow)
        .ok_or(EscrowError::InvalidState)?;
    transition(&mut entry.status)?;
    let lamports = std::mem::take(&mut entry.lamports);
    let maker = entry.escrow.maker;
    ledger.credit_lamports(&maker, lamports)
}
