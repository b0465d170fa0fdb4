use anchor_lang::prelude::*;

#[error_code]
pub enum EscrowError {
    #[msg("Invalid amount: amounts must be non-zero and must not overflow")]
    InvalidAmount,
    #[msg("Insufficient funds to complete the transfer")]
    InsufficientFunds,
    #[msg("An escrow with this identifier already exists")]
    AlreadyExists,
    #[msg("Escrow is not live")]
    InvalidState,
    #[msg("Signer is not allowed to perform this operation")]
    Unauthorized,
    #[msg("Vault does not match the address derived for this escrow")]
    InvalidVault,
    #[msg("Token account does not match the expected mint or owner")]
    InvalidTokenAccount,
    #[msg("Token account still holds tokens and cannot be closed")]
    AccountNotEmpty,
}
