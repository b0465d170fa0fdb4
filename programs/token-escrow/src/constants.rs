/// Namespace tag for the custody vault derived from an escrow entry
pub const VAULT_SEED: &[u8] = b"vault";

/// Anchor account discriminator length prepended to every program account
pub const DISCRIMINATOR_LEN: usize = 8;

/// Size of a packed SPL token account
pub const TOKEN_ACCOUNT_LEN: usize = 165;
