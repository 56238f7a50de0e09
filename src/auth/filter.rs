use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::auth::context::{AuthFailure, RequestContext};
use crate::auth::token::TokenCodec;
use crate::error::AppError;
use crate::models::Account;
use crate::store::AccountStore;

/// Extracts the token from an `Authorization: Bearer <token>` header value.
/// Any other scheme counts as no token.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header.and_then(|value| value.strip_prefix("Bearer "))
}

/// Turns the bearer header of one request into a `RequestContext`.
///
/// `NoToken → Anonymous`; `TokenPresent → Decoding → {Authenticated, Failed}`.
/// Resolution never errors: failures are recorded in the returned context and
/// translated by whichever handler asks for a principal.
#[derive(Clone)]
pub struct IdentityFilter {
    tokens: Arc<TokenCodec>,
    accounts: Arc<dyn AccountStore>,
}

impl IdentityFilter {
    pub fn new(tokens: Arc<TokenCodec>, accounts: Arc<dyn AccountStore>) -> Self {
        Self { tokens, accounts }
    }

    pub async fn resolve(&self, authorization: Option<&str>, now: DateTime<Utc>) -> RequestContext {
        let Some(token) = bearer_token(authorization) else {
            return RequestContext::anonymous();
        };

        match self.authenticate(token, now).await {
            Ok(account) => RequestContext::authenticated(account),
            Err(AppError::Database(e)) => {
                log::error!("account lookup failed during token check: {}", e);
                RequestContext::failed(AuthFailure::Unavailable)
            }
            Err(e) => {
                log::debug!("bearer token rejected: {}", e);
                RequestContext::failed(AuthFailure::Rejected)
            }
        }
    }

    async fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Result<Account, AppError> {
        let claims = self.tokens.decode(token)?;

        // An unknown subject is indistinguishable from a bad token.
        let account = self
            .accounts
            .find_by_email(&claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !self.tokens.is_valid(token, &account.email, now) {
            return Err(AppError::InvalidToken);
        }
        Ok(account)
    }
}
