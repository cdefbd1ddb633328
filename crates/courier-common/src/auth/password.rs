//! Password hashing and verification utilities
//!
//! Uses bcrypt (cost 12). Hashing is CPU-bound, so both operations run
//! on the blocking thread pool to keep the I/O scheduler responsive.

use crate::error::AppError;

/// bcrypt cost factor
const BCRYPT_COST: u32 = 12;

/// Hash a password using bcrypt on the blocking pool
///
/// # Errors
/// Returns an error if hashing fails
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("hash task panicked: {e}")))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a hash on the blocking pool
///
/// # Errors
/// Returns an error if the hash is malformed
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("verify task panicked: {e}")))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {e}")))
}

/// Validate password strength
///
/// # Errors
/// Returns a validation error when the password is shorter than 8
/// characters or missing a letter or a digit.
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    if password.chars().count() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if !password.chars().any(char::is_alphabetic) {
        return Err(AppError::Validation(
            "Password must contain at least one letter".to_string(),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Password must contain at least one digit".to_string(),
        ));
    }

    Ok(())
}
