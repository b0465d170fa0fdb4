use anchor_lang::prelude::*;

use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        close_account, transfer_checked, CloseAccount, Mint, TokenAccount, TokenInterface,
        TransferChecked,
    },
};

use crate::{constants::VAULT_SEED, error::EscrowError, events::EscrowTaken, Escrow};

/// Defines the accounts needed for the `take` instruction: both parties, their token accounts,
/// the escrow entry and its vault
#[derive(Accounts)]
pub struct Take<'info> {
    /// The participant settling the escrow
    #[account(mut)]
    pub taker: Signer<'info>,

    /// The maker who opened the escrow, receives `mint_b` and the rent of every closed account
    #[account(mut)]
    pub maker: SystemAccount<'info>,

    #[account(mint::token_program = token_program)]
    pub mint_a: Box<InterfaceAccount<'info, Mint>>,
    #[account(mint::token_program = token_program)]
    pub mint_b: Box<InterfaceAccount<'info, Mint>>,

    /// Taker's account receiving the vaulted `mint_a`, opened at the taker's expense if needed
    #[account(
        init_if_needed,
        payer = taker,
        associated_token::mint = mint_a,
        associated_token::authority = taker,
        associated_token::token_program = token_program
    )]
    pub taker_ata_a: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Taker's account paying `amount_b` of `mint_b`
    #[account(
        mut,
        associated_token::mint = mint_b,
        associated_token::authority = taker,
        associated_token::token_program = token_program
    )]
    pub taker_ata_b: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Maker's account receiving `mint_b`, opened at the taker's expense if needed
    #[account(
        init_if_needed,
        payer = taker,
        associated_token::mint = mint_b,
        associated_token::authority = maker,
        associated_token::token_program = token_program
    )]
    pub maker_ata_b: Box<InterfaceAccount<'info, TokenAccount>>,

    /// The escrow entry, closed to the maker once settled. A closed entry can no longer be
    /// loaded, so a second `take` or a late `refund` fails before reaching the handler
    #[account(
        mut,
        close = maker, // Entry rent goes back to the maker, not to the taker
        has_one = maker, // The `maker` account must be the one recorded at `make`
        has_one = mint_a @ EscrowError::InvalidTokenAccount, // Mints must match the agreed pair
        has_one = mint_b @ EscrowError::InvalidTokenAccount,
    )]
    pub escrow: Box<Account<'info, Escrow>>,

    /// The vault must be the one derived from this entry
    #[account(
        mut,
        token::mint = mint_a,
        token::token_program = token_program,
        // Re-derived from the entry key and cached bump, so another entry's vault is rejected
        constraint = escrow.owns_vault(&escrow.key(), &vault.key()) @ EscrowError::InvalidVault
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub associated_token_program: Program<'info, AssociatedToken>,
    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

impl<'info> Take<'info> {
    /// Transfers the requested amount of `mint_b` from the taker to the maker
    pub fn pay_maker(&mut self) -> Result<()> {
        require_gte!(
            self.taker_ata_b.amount,
            self.escrow.amount_b,
            EscrowError::InsufficientFunds
        );

        let transfer_accounts = TransferChecked {
            from: self.taker_ata_b.to_account_info(),
            mint: self.mint_b.to_account_info(),
            to: self.maker_ata_b.to_account_info(),
            authority: self.taker.to_account_info(),
        };
        let cpi_ctx = CpiContext::new(self.token_program.to_account_info(), transfer_accounts);

        transfer_checked(cpi_ctx, self.escrow.amount_b, self.mint_b.decimals)
    }

    /// Releases the whole vault to the taker and closes it, sending its rent to the maker
    pub fn withdraw_and_close_vault(&mut self) -> Result<()> {
        let escrow_key = self.escrow.key();
        let signer_seeds: [&[&[u8]]; 1] =
            [&[VAULT_SEED, escrow_key.as_ref(), &[self.escrow.bump]]];

        let accounts = TransferChecked {
            from: self.vault.to_account_info(),
            mint: self.mint_a.to_account_info(),
            to: self.taker_ata_a.to_account_info(),
            authority: self.vault.to_account_info(),
        };
        let ctx = CpiContext::new_with_signer(
            self.token_program.to_account_info(),
            accounts,
            &signer_seeds,
        );
        transfer_checked(ctx, self.vault.amount, self.mint_a.decimals)?;

        let accounts = CloseAccount {
            account: self.vault.to_account_info(),
            destination: self.maker.to_account_info(),
            authority: self.vault.to_account_info(),
        };
        let ctx = CpiContext::new_with_signer(
            self.token_program.to_account_info(),
            accounts,
            &signer_seeds,
        );
        close_account(ctx)
    }

    pub fn emit_taken(&self) {
        emit!(EscrowTaken {
            escrow: self.escrow.key(),
            maker: self.maker.key(),
            taker: self.taker.key(),
            amount_a: self.escrow.amount_a,
            amount_b: self.escrow.amount_b,
        });
    }
}
