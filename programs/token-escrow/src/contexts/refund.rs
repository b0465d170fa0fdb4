use anchor_lang::prelude::*;

use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        close_account, transfer_checked, CloseAccount, Mint, TokenAccount, TokenInterface,
        TransferChecked,
    },
};

use crate::{constants::VAULT_SEED, error::EscrowError, events::EscrowRefunded, Escrow};

#[derive(Accounts)]
pub struct Refund<'info> {
    /// The maker cancelling the escrow, must sign
    #[account(mut)]
    maker: Signer<'info>,

    /// The mint deposited into the vault
    mint_a: InterfaceAccount<'info, Mint>,

    /// The maker's account the deposit returns to
    #[account(
        mut,
        associated_token::mint = mint_a,
        associated_token::authority = maker,
        associated_token::token_program = token_program
    )]
    maker_ata_a: InterfaceAccount<'info, TokenAccount>,

    /// The escrow entry, closed to the maker. Any other signer fails `has_one`
    #[account(
        mut,
        close = maker, // Entry rent returns to the maker
        has_one = maker @ EscrowError::Unauthorized, // Checked before the vault below
        has_one = mint_a @ EscrowError::InvalidTokenAccount,
    )]
    escrow: Account<'info, Escrow>,

    /// The vault derived from this entry, emptied and closed
    #[account(
        mut, // Drained back to `maker_ata_a`, then closed with its rent sent to the maker
        token::mint = mint_a,
        token::token_program = token_program,
        constraint = escrow.owns_vault(&escrow.key(), &vault.key()) @ EscrowError::InvalidVault
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    associated_token_program: Program<'info, AssociatedToken>,
    token_program: Interface<'info, TokenInterface>,
    system_program: Program<'info, System>,
}

impl<'info> Refund<'info> {
    pub fn refund_and_close_vault(&mut self) -> Result<()> {
        // The vault signs for itself
        let escrow_key = self.escrow.key();
        let signer_seeds: [&[&[u8]]; 1] =
            [&[VAULT_SEED, escrow_key.as_ref(), &[self.escrow.bump]]];

        let xfer_accounts = TransferChecked {
            from: self.vault.to_account_info(),
            mint: self.mint_a.to_account_info(),
            to: self.maker_ata_a.to_account_info(),
            authority: self.vault.to_account_info(),
        };
        let ctx = CpiContext::new_with_signer(
            self.token_program.to_account_info(),
            xfer_accounts,
            &signer_seeds,
        );
        transfer_checked(ctx, self.vault.amount, self.mint_a.decimals)?;

        let close_accounts = CloseAccount {
            account: self.vault.to_account_info(),
            destination: self.maker.to_account_info(),
            authority: self.vault.to_account_info(),
        };
        let ctx = CpiContext::new_with_signer(
            self.token_program.to_account_info(),
            close_accounts,
            &signer_seeds,
        );
        close_account(ctx)
    }

    pub fn emit_refunded(&self) {
        emit!(EscrowRefunded {
            escrow: self.escrow.key(),
            maker: self.maker.key(),
            amount_a: self.escrow.amount_a,
        });
    }
}
