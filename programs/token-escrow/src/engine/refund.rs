use anchor_lang::prelude::{msg, Pubkey};
use anchor_spl::associated_token::get_associated_token_address;

use super::{check_account, close_entry, live_entry, vault_signer};
use crate::{
    error::EscrowError,
    ledger::{AssetLedger, Authority, Ledger, LedgerResult, Transaction},
    lifecycle::EscrowStatus,
    state::Escrow,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefundAccounts {
    /// Maker's `mint_a` account the vault is emptied into
    pub maker_ata_a: Pubkey,
    pub vault: Pubkey,
}

impl RefundAccounts {
    pub fn associated(escrow: &Escrow, vault: Pubkey) -> Self {
        Self {
            maker_ata_a: get_associated_token_address(&escrow.maker, &escrow.mint_a),
            vault,
        }
    }
}

/// Cancels a live entry and returns the vault to its maker.
///
/// Checks run in order: the entry must be live, the caller must be its maker,
/// then the supplied vault and receiving account must match the entry.
pub fn refund<L: Ledger>(
    ledger: &mut L,
    caller: &Pubkey,
    escrow: &Pubkey,
    accounts: &RefundAccounts,
) -> LedgerResult<()> {
    let entry = live_entry(ledger, escrow)?;
    let terms = &entry.escrow;
    if terms.maker != *caller {
        return Err(EscrowError::Unauthorized);
    }
    let signer = vault_signer(ledger, &entry, &accounts.vault)?;
    check_account(ledger, &accounts.maker_ata_a, caller, &terms.mint_a)?;

    let mut tx = Transaction::begin(ledger);
    let vault = signer.vault();
    let vaulted = tx.balance(vault).ok_or(EscrowError::InvalidVault)?;
    tx.transfer(
        vault,
        &accounts.maker_ata_a,
        Authority::Vault(&signer),
        vaulted,
    )?;
    tx.close_account(vault, Authority::Vault(&signer), &terms.maker)?;
    close_entry(&mut *tx, escrow, EscrowStatus::cancel)?;
    tx.commit();

    msg!("Escrow {} refunded: {} returned to maker", escrow, vaulted);
    Ok(())
}
