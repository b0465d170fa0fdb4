use std::collections::{btree_map::Entry, BTreeMap};

use anchor_lang::prelude::Pubkey;
use anchor_spl::associated_token::get_associated_token_address;

use super::{
    AssetAccount, AssetLedger, Authority, Custody, EntryStore, EscrowEntry, FundedAccounts,
    Ledger, LedgerConfig, LedgerResult,
};
use crate::error::EscrowError;

/// In-memory ledger for deterministic runs without a validator.
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    config: LedgerConfig,
    lamports: BTreeMap<Pubkey, u64>,
    // mint -> mint authority
    mints: BTreeMap<Pubkey, Pubkey>,
    accounts: BTreeMap<Pubkey, AssetAccount>,
    entries: BTreeMap<Pubkey, EscrowEntry>,
}

impl MemoryLedger {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Funds `owner` with native lamports.
    pub fn airdrop(&mut self, owner: &Pubkey, lamports: u64) {
        let balance = self.lamports.entry(*owner).or_default();
        *balance = balance.saturating_add(lamports);
    }

    /// Registers a new token type controlled by `authority`.
    pub fn create_mint(&mut self, authority: &Pubkey) -> Pubkey {
        let mint = Pubkey::new_unique();
        self.mints.insert(mint, *authority);
        mint
    }

    /// Issues `amount` new tokens into a wallet account.
    pub fn mint_to(
        &mut self,
        mint: &Pubkey,
        account: &Pubkey,
        authority: &Pubkey,
        amount: u64,
    ) -> LedgerResult<()> {
        if self.mints.get(mint) != Some(authority) {
            return Err(EscrowError::Unauthorized);
        }
        let target = self
            .accounts
            .get_mut(account)
            .filter(|target| target.mint == *mint && target.custody == Custody::Wallet)
            .ok_or(EscrowError::InvalidTokenAccount)?;
        target.amount = target
            .amount
            .checked_add(amount)
            .ok_or(EscrowError::InvalidAmount)?;
        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = &EscrowEntry> {
        self.entries.values()
    }

    fn open(&mut self, payer: &Pubkey, address: Pubkey, account: AssetAccount) -> LedgerResult<()> {
        if !self.has_mint(&account.mint) {
            return Err(EscrowError::InvalidTokenAccount);
        }
        if self.accounts.contains_key(&address) {
            return Err(EscrowError::AlreadyExists);
        }
        self.debit_lamports(payer, account.lamports)?;
        self.accounts.insert(address, account);
        Ok(())
    }
}

impl FundedAccounts for MemoryLedger {
    fn lamports(&self, owner: &Pubkey) -> u64 {
        self.lamports.get(owner).copied().unwrap_or_default()
    }

    fn debit_lamports(&mut self, owner: &Pubkey, lamports: u64) -> LedgerResult<()> {
        let balance = self
            .lamports
            .get_mut(owner)
            .ok_or(EscrowError::InsufficientFunds)?;
        *balance = balance
            .checked_sub(lamports)
            .ok_or(EscrowError::InsufficientFunds)?;
        Ok(())
    }

    fn credit_lamports(&mut self, owner: &Pubkey, lamports: u64) -> LedgerResult<()> {
        let balance = self.lamports.entry(*owner).or_default();
        *balance = balance
            .checked_add(lamports)
            .ok_or(EscrowError::InvalidAmount)?;
        Ok(())
    }
}

impl AssetLedger for MemoryLedger {
    fn account(&self, address: &Pubkey) -> Option<&AssetAccount> {
        self.accounts.get(address)
    }

    fn has_mint(&self, mint: &Pubkey) -> bool {
        self.mints.contains_key(mint)
    }

    fn create_account(
        &mut self,
        payer: &Pubkey,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> LedgerResult<Pubkey> {
        let address = get_associated_token_address(owner, mint);
        let account = AssetAccount {
            mint: *mint,
            authority: *owner,
            amount: 0,
            lamports: self.config.token_account_rent(),
            custody: Custody::Wallet,
        };
        self.open(payer, address, account)?;
        Ok(address)
    }

    fn create_vault(&mut self, payer: &Pubkey, vault: &Pubkey, mint: &Pubkey) -> LedgerResult<()> {
        let account = AssetAccount {
            mint: *mint,
            authority: *vault,
            amount: 0,
            lamports: self.config.token_account_rent(),
            custody: Custody::Program,
        };
        self.open(payer, *vault, account)
    }

    fn transfer(
        &mut self,
        from: &Pubkey,
        to: &Pubkey,
        authority: Authority<'_>,
        amount: u64,
    ) -> LedgerResult<()> {
        let source = self
            .accounts
            .get(from)
            .ok_or(EscrowError::InvalidTokenAccount)?;
        let destination = self
            .accounts
            .get(to)
            .ok_or(EscrowError::InvalidTokenAccount)?;
        if source.mint != destination.mint {
            return Err(EscrowError::InvalidTokenAccount);
        }
        if !authority.permits(source) {
            return Err(EscrowError::Unauthorized);
        }
        if source.amount < amount {
            return Err(EscrowError::InsufficientFunds);
        }
        if from == to {
            return Ok(());
        }
        let credited = destination
            .amount
            .checked_add(amount)
            .ok_or(EscrowError::InvalidAmount)?;
        let debited = source.amount - amount;

        if let Some(source) = self.accounts.get_mut(from) {
            source.amount = debited;
        }
        if let Some(destination) = self.accounts.get_mut(to) {
            destination.amount = credited;
        }
        Ok(())
    }

    fn close_account(
        &mut self,
        account: &Pubkey,
        authority: Authority<'_>,
        residual_recipient: &Pubkey,
    ) -> LedgerResult<u64> {
        let closing = self
            .accounts
            .get(account)
            .ok_or(EscrowError::InvalidTokenAccount)?;
        if !authority.permits(closing) {
            return Err(EscrowError::Unauthorized);
        }
        if closing.amount != 0 {
            return Err(EscrowError::AccountNotEmpty);
        }
        let lamports = closing.lamports;
        self.credit_lamports(residual_recipient, lamports)?;
        self.accounts.remove(account);
        Ok(lamports)
    }
}

impl EntryStore for MemoryLedger {
    fn entry(&self, id: &Pubkey) -> Option<&EscrowEntry> {
        self.entries.get(id)
    }

    fn entry_mut(&mut self, id: &Pubkey) -> Option<&mut EscrowEntry> {
        self.entries.get_mut(id)
    }

    fn insert_entry(&mut self, entry: EscrowEntry) -> LedgerResult<()> {
        match self.entries.entry(entry.id) {
            Entry::Occupied(_) => Err(EscrowError::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(())
            }
        }
    }
}

impl Ledger for MemoryLedger {
    fn config(&self) -> &LedgerConfig {
        &self.config
    }
}
