#![allow(dead_code)]

use anchor_lang::prelude::Pubkey;
use token_escrow::{
    engine::{make, MakeArgs, RefundAccounts, TakeAccounts},
    ledger::{AssetLedger, EntryStore, Ledger, MemoryLedger},
};

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Two funded parties trading `mint_a` against `mint_b`
pub struct Market {
    pub ledger: MemoryLedger,
    pub maker: Pubkey,
    pub taker: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub maker_ata_a: Pubkey,
    pub maker_ata_b: Pubkey,
    pub taker_ata_a: Pubkey,
    pub taker_ata_b: Pubkey,
}

impl Market {
    /// Mints `maker_a` of `mint_a` to the maker and `taker_b` of `mint_b` to the taker.
    pub fn new(maker_a: u64, taker_b: u64) -> Self {
        let mut ledger = MemoryLedger::default();
        let maker = Pubkey::new_unique();
        let taker = Pubkey::new_unique();
        ledger.airdrop(&maker, 10 * LAMPORTS_PER_SOL);
        ledger.airdrop(&taker, LAMPORTS_PER_SOL);

        let mint_a = ledger.create_mint(&maker);
        let mint_b = ledger.create_mint(&maker);

        let maker_ata_a = ledger.create_account(&maker, &maker, &mint_a).unwrap();
        let maker_ata_b = ledger.create_account(&maker, &maker, &mint_b).unwrap();
        let taker_ata_a = ledger.create_account(&maker, &taker, &mint_a).unwrap();
        let taker_ata_b = ledger.create_account(&maker, &taker, &mint_b).unwrap();

        ledger.mint_to(&mint_a, &maker_ata_a, &maker, maker_a).unwrap();
        ledger.mint_to(&mint_b, &taker_ata_b, &maker, taker_b).unwrap();

        Self {
            ledger,
            maker,
            taker,
            mint_a,
            mint_b,
            maker_ata_a,
            maker_ata_b,
            taker_ata_a,
            taker_ata_b,
        }
    }

    pub fn make_args(&self, amount_a: u64, amount_b: u64) -> MakeArgs {
        MakeArgs {
            escrow: Pubkey::new_unique(),
            mint_a: self.mint_a,
            mint_b: self.mint_b,
            maker_ata_a: self.maker_ata_a,
            amount_a,
            amount_b,
        }
    }

    /// Opens an escrow and returns its identifier and vault.
    pub fn open(&mut self, amount_a: u64, amount_b: u64) -> (Pubkey, Pubkey) {
        let args = self.make_args(amount_a, amount_b);
        let vault = make(&mut self.ledger, &self.maker, &args).unwrap();
        (args.escrow, vault)
    }

    pub fn take_accounts(&self, vault: Pubkey) -> TakeAccounts {
        TakeAccounts {
            taker_ata_a: self.taker_ata_a,
            taker_ata_b: self.taker_ata_b,
            maker_ata_b: self.maker_ata_b,
            vault,
        }
    }

    pub fn refund_accounts(&self, vault: Pubkey) -> RefundAccounts {
        RefundAccounts {
            maker_ata_a: self.maker_ata_a,
            vault,
        }
    }

    pub fn vault_of(&self, escrow: &Pubkey) -> Option<Pubkey> {
        let program_id = self.ledger.config().program_id;
        self.ledger.entry(escrow)?.vault(&program_id)
    }
}
