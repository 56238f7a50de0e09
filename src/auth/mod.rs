pub mod context;
pub mod extractors;
pub mod filter;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

// Re-export necessary items
pub use context::{AuthFailure, IdentityState, RequestContext};
pub use extractors::CurrentAccount;
pub use filter::IdentityFilter;
pub use middleware::IdentityMiddleware;
pub use password::{BcryptHasher, PasswordHasher};
pub use service::Authenticator;
pub use token::{Claims, TokenCodec};

use password::MAX_PASSWORD_BYTES;

/// Rejects passwords bcrypt would silently truncate. `length` counts characters,
/// so multi-byte input needs its own check.
fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        let mut error = ValidationError::new("password_too_long");
        error.message = Some(format!("must be at most {} bytes", MAX_PASSWORD_BYTES).into());
        return Err(error);
    }
    Ok(())
}

/// Represents the payload for a sign-up request.
#[derive(Deserialize, Validate)]
pub struct SignUpRequest {
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// At least 6 characters and at most 72 bytes.
    #[validate(length(min = 6), custom = "validate_password_bytes")]
    pub password: String,
}

/// Represents the payload for a login request.
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

// Passwords are redacted so a stray `{:?}` cannot leak them into the logs.
impl fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response returned by sign-up and login.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    /// The account email, which is also the token's subject.
    pub email: String,
    /// The JWT for bearer authentication.
    pub token: String,
}
