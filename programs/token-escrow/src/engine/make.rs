use anchor_lang::prelude::{msg, Pubkey};

use super::check_account;
use crate::{
    error::EscrowError,
    ledger::{
        AssetLedger, Authority, EntryStore, EscrowEntry, FundedAccounts, Ledger, LedgerResult,
        Transaction,
    },
    lifecycle::{EscrowStatus, Terms},
    state::Escrow,
    vault::derive_vault,
};

/// Inputs of `make` besides the maker's identity
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MakeArgs {
    /// Identifier of the new entry, the vault is derived from it
    pub escrow: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    /// Maker's account holding `mint_a`
    pub maker_ata_a: Pubkey,
    pub amount_a: u64,
    pub amount_b: u64,
}

/// Creates a live entry and locks `amount_a` of `mint_a` in its vault.
///
/// The maker pays the deposits of both the entry and the vault. Returns
/// the vault address.
pub fn make<L: Ledger>(ledger: &mut L, maker: &Pubkey, args: &MakeArgs) -> LedgerResult<Pubkey> {
    let terms = Terms::new(args.amount_a, args.amount_b)?;
    if ledger.entry(&args.escrow).is_some() {
        return Err(EscrowError::AlreadyExists);
    }
    if !ledger.has_mint(&args.mint_b) {
        return Err(EscrowError::InvalidTokenAccount);
    }
    check_account(ledger, &args.maker_ata_a, maker, &args.mint_a)?;
    if ledger.balance(&args.maker_ata_a).unwrap_or_default() < terms.amount_a {
        return Err(EscrowError::InsufficientFunds);
    }

    let (vault, bump) = derive_vault(&args.escrow, &ledger.config().program_id);
    let deposit = ledger.config().entry_rent();

    let mut tx = Transaction::begin(ledger);
    tx.debit_lamports(maker, deposit)?;
    tx.insert_entry(EscrowEntry {
        id: args.escrow,
        escrow: Escrow {
            maker: *maker,
            mint_a: args.mint_a,
            mint_b: args.mint_b,
            amount_a: terms.amount_a,
            amount_b: terms.amount_b,
            bump,
        },
        status: EscrowStatus::Live,
        lamports: deposit,
    })?;
    tx.create_vault(maker, &vault, &args.mint_a)?;
    tx.transfer(
        &args.maker_ata_a,
        &vault,
        Authority::Wallet(maker),
        terms.amount_a,
    )?;
    tx.commit();

    msg!(
        "Escrow {} made: {} locked, {} requested",
        args.escrow,
        terms.amount_a,
        terms.amount_b
    );
    Ok(vault)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::prelude::Rent;

    use crate::ledger::{LedgerConfig, MemoryLedger};

    struct Fixture {
        ledger: MemoryLedger,
        maker: Pubkey,
        args: MakeArgs,
    }

    fn fixture(minted: u64) -> Fixture {
        let mut ledger = MemoryLedger::default();
        let maker = Pubkey::new_unique();
        ledger.airdrop(&maker, 1_000_000_000);
        let mint_a = ledger.create_mint(&maker);
        let mint_b = ledger.create_mint(&maker);
        let maker_ata_a = ledger.create_account(&maker, &maker, &mint_a).unwrap();
        ledger.mint_to(&mint_a, &maker_ata_a, &maker, minted).unwrap();
        let args = MakeArgs {
            escrow: Pubkey::new_unique(),
            mint_a,
            mint_b,
            maker_ata_a,
            amount_a: 100,
            amount_b: 200,
        };
        Fixture { ledger, maker, args }
    }

    #[test]
    fn locks_offered_amount_in_vault() {
        let Fixture {
            mut ledger,
            maker,
            args,
        } = fixture(150);
        let lamports_before = ledger.lamports(&maker);

        let vault = make(&mut ledger, &maker, &args).unwrap();

        assert_eq!(ledger.balance(&vault), Some(100));
        assert_eq!(ledger.balance(&args.maker_ata_a), Some(50));
        let entry = ledger.entry(&args.escrow).unwrap();
        assert_eq!(entry.status, EscrowStatus::Live);
        assert_eq!(entry.vault(&crate::ID), Some(vault));

        let deposits = ledger.config().entry_rent() + ledger.config().token_account_rent();
        assert_eq!(ledger.lamports(&maker), lamports_before - deposits);
    }

    #[test]
    fn zero_amounts_fail() {
        let Fixture {
            mut ledger,
            maker,
            mut args,
        } = fixture(150);
        args.amount_a = 0;

        let result = make(&mut ledger, &maker, &args);
        assert!(matches!(result, Err(EscrowError::InvalidAmount)));
        assert!(ledger.entry(&args.escrow).is_none());
    }

    #[test]
    fn insufficient_balance_fails_without_side_effects() {
        let Fixture {
            mut ledger,
            maker,
            args,
        } = fixture(99);
        let lamports_before = ledger.lamports(&maker);

        let result = make(&mut ledger, &maker, &args);
        assert!(matches!(result, Err(EscrowError::InsufficientFunds)));
        assert_eq!(ledger.balance(&args.maker_ata_a), Some(99));
        assert_eq!(ledger.lamports(&maker), lamports_before);
        assert!(ledger.entry(&args.escrow).is_none());
    }

    #[test]
    fn missing_rent_rolls_back() {
        let Fixture {
            mut ledger,
            maker,
            args,
        } = fixture(100);
        // Leave enough for the entry deposit but not for the vault
        let spare = ledger.lamports(&maker) - ledger.config().entry_rent();
        ledger.debit_lamports(&maker, spare).unwrap();

        let result = make(&mut ledger, &maker, &args);
        assert!(matches!(result, Err(EscrowError::InsufficientFunds)));
        assert!(ledger.entry(&args.escrow).is_none());
        assert_eq!(ledger.lamports(&maker), ledger.config().entry_rent());
    }

    #[test]
    fn reused_identifier_fails() {
        let Fixture {
            mut ledger,
            maker,
            args,
        } = fixture(200);
        make(&mut ledger, &maker, &args).unwrap();

        let result = make(&mut ledger, &maker, &args);
        assert!(matches!(result, Err(EscrowError::AlreadyExists)));
        assert_eq!(ledger.balance(&args.maker_ata_a), Some(100));
    }

    #[test]
    fn foreign_source_account_fails() {
        let Fixture {
            mut ledger,
            maker: _,
            args,
        } = fixture(200);
        let stranger = Pubkey::new_unique();
        ledger.airdrop(&stranger, 1_000_000_000);

        let result = make(&mut ledger, &stranger, &args);
        assert!(matches!(result, Err(EscrowError::InvalidTokenAccount)));
        assert_eq!(ledger.balance(&args.maker_ata_a), Some(200));
    }

    #[test]
    fn vault_and_deposits_follow_ledger_config() {
        let program_id = Pubkey::new_unique();
        let rent = Rent {
            lamports_per_byte_year: 10,
            exemption_threshold: 2.0,
            burn_percent: 0,
        };
        let mut ledger = MemoryLedger::new(LedgerConfig {
            program_id,
            rent,
        });
        let maker = Pubkey::new_unique();
        ledger.airdrop(&maker, 1_000_000_000);
        let mint_a = ledger.create_mint(&maker);
        let mint_b = ledger.create_mint(&maker);
        let maker_ata_a = ledger.create_account(&maker, &maker, &mint_a).unwrap();
        ledger.mint_to(&mint_a, &maker_ata_a, &maker, 100).unwrap();
        let before = ledger.lamports(&maker);

        let args = MakeArgs {
            escrow: Pubkey::new_unique(),
            mint_a,
            mint_b,
            maker_ata_a,
            amount_a: 100,
            amount_b: 200,
        };
        let vault = make(&mut ledger, &maker, &args).unwrap();

        assert_eq!(vault, derive_vault(&args.escrow, &program_id).0);
        assert_ne!(vault, derive_vault(&args.escrow, &crate::ID).0);
        let entry_rent = rent.minimum_balance(Escrow::SPACE);
        let vault_rent = rent.minimum_balance(crate::constants::TOKEN_ACCOUNT_LEN);
        assert_eq!(ledger.lamports(&maker), before - entry_rent - vault_rent);
        assert_eq!(
            ledger.entry(&args.escrow).map(|entry| entry.lamports),
            Some(entry_rent)
        );
    }
}
