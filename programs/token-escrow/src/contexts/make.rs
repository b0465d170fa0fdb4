use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked},
};

use crate::{
    constants::VAULT_SEED, error::EscrowError, events::EscrowMade, lifecycle::Terms, Escrow,
};

/// Defines the accounts needed to execute the `make` instruction: the maker, both token mints,
/// the maker's source account, the new escrow entry and its vault
#[derive(Accounts)]
pub struct Make<'info> {
    /// The user opening the escrow, pays for both new accounts and signs the deposit
    #[account(mut)]
    pub maker: Signer<'info>,

    /// Token type the maker locks in the vault
    #[account(
        mint::token_program = token_program
    )]
    pub mint_a: InterfaceAccount<'info, Mint>,

    /// Token type the maker expects in return
    #[account(
        mint::token_program = token_program
    )]
    pub mint_b: InterfaceAccount<'info, Mint>,

    /// The maker's token account for `mint_a`, debited by the deposit
    #[account(
        mut, // Balance decreases by `amount_a`
        associated_token::mint = mint_a, // Must hold the offered token type
        associated_token::authority = maker, // Only the signing maker can fund the escrow
        associated_token::token_program = token_program
    )]
    pub maker_ata_a: InterfaceAccount<'info, TokenAccount>,

    /// The escrow entry. Its address is a fresh keypair supplied by the client, which is the
    /// entry identifier; `init` fails if the address is already in use
    #[account(
        init, // Also makes the entry keypair a required signer
        payer = maker, // Entry rent comes back to the maker when the entry closes
        space = Escrow::SPACE // Discriminator plus the serialized terms
    )]
    pub escrow: Account<'info, Escrow>,

    /// Custody account for the deposit. It lives at an address derived from the escrow entry
    /// and is its own authority, so only this program can sign for it
    #[account(
        init,
        payer = maker,
        token::mint = mint_a, // Can only ever hold the offered token type
        token::authority = vault, // Self-owned: transfers out need the vault's own seeds
        token::token_program = token_program,

        // One vault per entry; the bump is cached on the entry for later signing
        seeds = [VAULT_SEED, escrow.key().as_ref()],
        bump
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    pub associated_token_program: Program<'info, AssociatedToken>,
    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

impl<'info> Make<'info> {
    /// Records the exchange terms and the vault bump on the new entry
    pub fn save_escrow(&mut self, terms: Terms, bumps: &MakeBumps) -> Result<()> {
        self.escrow.set_inner(Escrow {
            maker: self.maker.key(),
            mint_a: self.mint_a.key(),
            mint_b: self.mint_b.key(),
            amount_a: terms.amount_a,
            amount_b: terms.amount_b,
            bump: bumps.vault,
        });
        Ok(())
    }

    /// Moves `amount` of `mint_a` from the maker into the vault
    pub fn deposit(&mut self, amount: u64) -> Result<()> {
        require_gte!(
            self.maker_ata_a.amount,
            amount,
            EscrowError::InsufficientFunds
        );

        let transfer_accounts = TransferChecked {
            from: self.maker_ata_a.to_account_info(),
            mint: self.mint_a.to_account_info(),
            to: self.vault.to_account_info(),
            authority: self.maker.to_account_info(),
        };
        let cpi_ctx = CpiContext::new(self.token_program.to_account_info(), transfer_accounts);

        transfer_checked(cpi_ctx, amount, self.mint_a.decimals)
    }

    pub fn emit_made(&self) {
        emit!(EscrowMade {
            escrow: self.escrow.key(),
            maker: self.escrow.maker,
            mint_a: self.escrow.mint_a,
            mint_b: self.escrow.mint_b,
            amount_a: self.escrow.amount_a,
            amount_b: self.escrow.amount_b,
        });
    }
}
