//! Host-side ledger the escrow engine runs against.
//!
//! The store keeps three kinds of rows keyed by address: native lamport
//! balances, token accounts and escrow entries. Operations never touch the
//! store directly; they stage their writes in a [`Transaction`] and commit
//! only once every step succeeded.

mod memory;
mod transaction;

use anchor_lang::prelude::{Pubkey, Rent};

pub use memory::MemoryLedger;
pub use transaction::Transaction;

use crate::{
    constants::TOKEN_ACCOUNT_LEN,
    error::EscrowError,
    lifecycle::EscrowStatus,
    state::Escrow,
    vault,
};

pub type LedgerResult<T> = Result<T, EscrowError>;

#[derive(Clone, Debug, PartialEq)]
pub struct LedgerConfig {
    /// Program that owns every derived vault
    pub program_id: Pubkey,
    /// Rent schedule used to price account deposits
    pub rent: Rent,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            program_id: crate::ID,
            rent: Rent::default(),
        }
    }
}

impl LedgerConfig {
    /// Deposit locked by an escrow entry while it is live
    pub fn entry_rent(&self) -> u64 {
        self.rent.minimum_balance(Escrow::SPACE)
    }

    /// Deposit locked by a token account until it is closed
    pub fn token_account_rent(&self) -> u64 {
        self.rent.minimum_balance(TOKEN_ACCOUNT_LEN)
    }
}

/// Who may debit a token account
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Custody {
    /// A keyed wallet signs for the account
    Wallet,
    /// Only the program, through a [`VaultSigner`], may move funds
    Program,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetAccount {
    pub mint: Pubkey,
    pub authority: Pubkey,
    pub amount: u64,
    /// Rent deposit returned on close
    pub lamports: u64,
    pub custody: Custody,
}

/// Signing capability for a vault.
///
/// Vaults have no private key. The engine recreates the vault address from
/// the entry's seeds and hands out this capability, which nothing outside
/// the crate can construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VaultSigner {
    vault: Pubkey,
}

impl VaultSigner {
    pub(crate) fn new(escrow: &Pubkey, bump: u8, program_id: &Pubkey) -> LedgerResult<Self> {
        let vault =
            vault::vault_address(escrow, bump, program_id).ok_or(EscrowError::InvalidVault)?;
        Ok(Self { vault })
    }

    pub fn vault(&self) -> &Pubkey {
        &self.vault
    }
}

/// Authority presented for a debit or close
#[derive(Clone, Copy, Debug)]
pub enum Authority<'a> {
    Wallet(&'a Pubkey),
    Vault(&'a VaultSigner),
}

impl Authority<'_> {
    /// Whether this authority may act on `account`
    pub fn permits(&self, account: &AssetAccount) -> bool {
        match (self, account.custody) {
            (Authority::Wallet(key), Custody::Wallet) => **key == account.authority,
            (Authority::Vault(signer), Custody::Program) => signer.vault == account.authority,
            _ => false,
        }
    }
}

/// Escrow entry as stored on the host ledger
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscrowEntry {
    /// Entry identifier the vault is derived from
    pub id: Pubkey,
    pub escrow: Escrow,
    pub status: EscrowStatus,
    /// Rent deposit paid by the maker, returned on termination
    pub lamports: u64,
}

impl EscrowEntry {
    pub fn vault(&self, program_id: &Pubkey) -> Option<Pubkey> {
        vault::vault_address(&self.id, self.escrow.bump, program_id)
    }
}

/// Native balances that pay for account deposits.
pub trait FundedAccounts {
    fn lamports(&self, owner: &Pubkey) -> u64;

    fn debit_lamports(&mut self, owner: &Pubkey, lamports: u64) -> LedgerResult<()>;

    fn credit_lamports(&mut self, owner: &Pubkey, lamports: u64) -> LedgerResult<()>;
}

/// Token balances keyed by account address.
pub trait AssetLedger {
    fn account(&self, address: &Pubkey) -> Option<&AssetAccount>;

    fn balance(&self, address: &Pubkey) -> Option<u64> {
        self.account(address).map(|account| account.amount)
    }

    fn has_mint(&self, mint: &Pubkey) -> bool;

    /// Opens `owner`'s associated account for `mint`, paid by `payer`.
    fn create_account(&mut self, payer: &Pubkey, owner: &Pubkey, mint: &Pubkey)
        -> LedgerResult<Pubkey>;

    /// Opens a program-custody account at a derived `vault` address.
    fn create_vault(&mut self, payer: &Pubkey, vault: &Pubkey, mint: &Pubkey) -> LedgerResult<()>;

    fn transfer(
        &mut self,
        from: &Pubkey,
        to: &Pubkey,
        authority: Authority<'_>,
        amount: u64,
    ) -> LedgerResult<()>;

    /// Removes an empty account and pays its deposit to `residual_recipient`.
    fn close_account(
        &mut self,
        account: &Pubkey,
        authority: Authority<'_>,
        residual_recipient: &Pubkey,
    ) -> LedgerResult<u64>;
}

pub trait EntryStore {
    fn entry(&self, id: &Pubkey) -> Option<&EscrowEntry>;

    fn entry_mut(&mut self, id: &Pubkey) -> Option<&mut EscrowEntry>;

    /// Fails with `AlreadyExists` if the identifier was ever used.
    fn insert_entry(&mut self, entry: EscrowEntry) -> LedgerResult<()>;
}

/// Everything the engine needs from a store. `Clone` backs the staged copy
/// a [`Transaction`] works on.
pub trait Ledger: FundedAccounts + AssetLedger + EntryStore + Clone {
    fn config(&self) -> &LedgerConfig;
}
