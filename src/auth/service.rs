use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::auth::context::RequestContext;
use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenCodec;
use crate::auth::AuthResponse;
use crate::error::AppError;
use crate::ids::IdGenerator;
use crate::models::Account;
use crate::store::{AccountStore, StoreError};

/// Sign-up, login and current-principal resolution.
///
/// All collaborators are injected, each behind a trait with a production and an
/// in-memory implementation.
pub struct Authenticator {
    accounts: Arc<dyn AccountStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<TokenCodec>,
    ids: Arc<dyn IdGenerator>,
    // Hash checked against when the email is unknown, so both login failures
    // cost one bcrypt verification.
    decoy_hash: OnceCell<String>,
}

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

impl Authenticator {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<TokenCodec>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            tokens,
            ids,
            decoy_hash: OnceCell::new(),
        }
    }

    /// Creates an account for `email` and returns a token for it.
    ///
    /// Fails with `DuplicateAccount` when the email is taken, including when a
    /// concurrent sign-up wins the insert after our lookup.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        if self.accounts.find_by_email(email).await?.is_some() {
            log::warn!("sign-up rejected, email=`{}` already registered", email);
            return Err(AppError::DuplicateAccount(email.to_string()));
        }

        let id = self.ids.generate();
        let password_hash = self.hash(password).await?;

        match self.accounts.save(Account::new(id, email, password_hash)).await {
            Ok(_) => {}
            Err(StoreError::DuplicateEmail(_)) => {
                log::warn!("sign-up lost a race, email=`{}` already registered", email);
                return Err(AppError::DuplicateAccount(email.to_string()));
            }
            Err(e) => return Err(e.into()),
        }
        log::info!("account created, email=`{}`", email);

        let token = self.tokens.generate_token(email)?;
        Ok(AuthResponse {
            email: email.to_string(),
            token,
        })
    }

    /// Verifies the credentials and returns a fresh token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let account = self.authenticate(email, password).await?;
        log::info!("account authenticated, email=`{}`", account.email);

        let token = self.tokens.generate_token(&account.email)?;
        Ok(AuthResponse {
            email: account.email,
            token,
        })
    }

    /// The account attached to this request, or `None` for anonymous callers.
    pub fn current_principal(&self, context: &RequestContext) -> Option<Account> {
        let principal = context.principal().cloned();
        if principal.is_none() {
            log::debug!("anonymous session");
        }
        principal
    }

    /// Unknown email and wrong password both end in `BadCredentials`.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Account, AppError> {
        let Some(account) = self.accounts.find_by_email(email).await? else {
            let decoy = self
                .decoy_hash
                .get_or_try_init(|| self.hash(DECOY_PASSWORD))
                .await?;
            self.verify(password, decoy).await?;
            log::warn!("login failed, email=`{}`", email);
            return Err(AppError::BadCredentials);
        };

        if !self.verify(password, &account.password_hash).await? {
            log::warn!("login failed, email=`{}`", email);
            return Err(AppError::BadCredentials);
        }
        Ok(account)
    }

    // bcrypt is CPU-bound; run it on the blocking pool.
    async fn hash(&self, password: &str) -> Result<String, AppError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("password hashing task failed: {}", e)))?
    }

    async fn verify(&self, password: &str, hashed: &str) -> Result<bool, AppError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let hashed = hashed.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hashed))
            .await
            .map_err(|e| AppError::Internal(format!("password verification task failed: {}", e)))
    }
}
