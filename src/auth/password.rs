use crate::error::AppError;

/// bcrypt work factor used in production. Each hash or verify costs a few hundred
/// milliseconds at this setting.
pub const DEFAULT_COST: u32 = 12;

/// bcrypt only reads the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// One-way salted password hashing.
pub trait PasswordHasher: Send + Sync {
    /// Hashes `password` with a fresh random salt, so two calls never return the same string.
    fn hash(&self, password: &str) -> Result<String, AppError>;

    /// Constant-time check of `password` against `hashed`. A malformed hash is a
    /// mismatch, not an error.
    fn verify(&self, password: &str, hashed: &str) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::with_cost(DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, AppError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::Validation(format!(
                "password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }
        bcrypt::hash(password, self.cost)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hashed: &str) -> bool {
        match bcrypt::verify(password, hashed) {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!("stored password hash could not be parsed: {}", e);
                false
            }
        }
    }
}
