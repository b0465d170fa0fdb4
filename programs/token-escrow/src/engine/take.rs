use anchor_lang::prelude::{msg, Pubkey};
use anchor_spl::associated_token::get_associated_token_address;

use super::{check_account, close_entry, ensure_account, live_entry, vault_signer};
use crate::{
    error::EscrowError,
    ledger::{AssetLedger, Authority, Ledger, LedgerResult, Transaction},
    lifecycle::EscrowStatus,
    state::Escrow,
};

/// Accounts the taker supplies for settlement
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TakeAccounts {
    /// Receives the vaulted `mint_a`; opened if missing
    pub taker_ata_a: Pubkey,
    /// Pays `amount_b` of `mint_b`
    pub taker_ata_b: Pubkey,
    /// Receives `amount_b`; opened if missing
    pub maker_ata_b: Pubkey,
    pub vault: Pubkey,
}

impl TakeAccounts {
    /// Associated token accounts of both parties for `escrow`.
    pub fn associated(taker: &Pubkey, escrow: &Escrow, vault: Pubkey) -> Self {
        Self {
            taker_ata_a: get_associated_token_address(taker, &escrow.mint_a),
            taker_ata_b: get_associated_token_address(taker, &escrow.mint_b),
            maker_ata_b: get_associated_token_address(&escrow.maker, &escrow.mint_b),
            vault,
        }
    }
}

/// Settles a live entry.
///
/// The taker pays `amount_b` to the maker and receives the whole vault. The
/// vault and the entry are closed, their deposits go back to the maker.
/// Both transfers and the state change commit together or not at all.
pub fn take<L: Ledger>(
    ledger: &mut L,
    taker: &Pubkey,
    escrow: &Pubkey,
    accounts: &TakeAccounts,
) -> LedgerResult<()> {
    let entry = live_entry(ledger, escrow)?;
    let signer = vault_signer(ledger, &entry, &accounts.vault)?;
    let terms = &entry.escrow;

    check_account(ledger, &accounts.taker_ata_b, taker, &terms.mint_b)?;
    if ledger.balance(&accounts.taker_ata_b).unwrap_or_default() < terms.amount_b {
        return Err(EscrowError::InsufficientFunds);
    }

    let mut tx = Transaction::begin(ledger);
    ensure_account(&mut *tx, taker, &accounts.taker_ata_a, taker, &terms.mint_a)?;
    ensure_account(&mut *tx, taker, &accounts.maker_ata_b, &terms.maker, &terms.mint_b)?;

    tx.transfer(
        &accounts.taker_ata_b,
        &accounts.maker_ata_b,
        Authority::Wallet(taker),
        terms.amount_b,
    )?;

    let vault = signer.vault();
    let vaulted = tx.balance(vault).ok_or(EscrowError::InvalidVault)?;
    tx.transfer(
        vault,
        &accounts.taker_ata_a,
        Authority::Vault(&signer),
        vaulted,
    )?;
    tx.close_account(vault, Authority::Vault(&signer), &terms.maker)?;
    close_entry(&mut *tx, escrow, EscrowStatus::settle)?;
    tx.commit();

    msg!("Escrow {} taken by {}: {} for {}", escrow, taker, vaulted, terms.amount_b);
    Ok(())
}
