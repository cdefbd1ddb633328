//! Password-reset token store

mod reset_token;

pub use reset_token::ResetTokenStore;
