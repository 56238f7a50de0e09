use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::Account;

/// Why a presented bearer token did not yield a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// Malformed, forged or expired token, or a subject with no account.
    Rejected,
    /// The credential store could not be consulted.
    Unavailable,
}

/// Outcome of the identity filter for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum IdentityState {
    /// No bearer token was presented.
    #[default]
    Anonymous,
    Authenticated(Account),
    Failed(AuthFailure),
}

/// Request-scoped identity, attached by `IdentityMiddleware` and dropped with the request.
///
/// Handlers receive it explicitly (it implements `FromRequest`), so nothing about the
/// caller lives in global or thread-local state. A request that never passed through
/// the middleware is anonymous.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    state: IdentityState,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(account: Account) -> Self {
        Self {
            state: IdentityState::Authenticated(account),
        }
    }

    pub fn failed(reason: AuthFailure) -> Self {
        Self {
            state: IdentityState::Failed(reason),
        }
    }

    pub fn state(&self) -> &IdentityState {
        &self.state
    }

    /// The authenticated account, if any. Never fails.
    pub fn principal(&self) -> Option<&Account> {
        match &self.state {
            IdentityState::Authenticated(account) => Some(account),
            _ => None,
        }
    }

    /// The authenticated account, or the error a protected route should answer with.
    pub fn require_principal(&self) -> Result<&Account, AppError> {
        match &self.state {
            IdentityState::Authenticated(account) => Ok(account),
            IdentityState::Anonymous => Err(AppError::Unauthenticated),
            IdentityState::Failed(AuthFailure::Rejected) => Err(AppError::InvalidToken),
            IdentityState::Failed(AuthFailure::Unavailable) => Err(AppError::Internal(
                "credential store unavailable during token check".into(),
            )),
        }
    }

    /// Reads the context attached to `req`, defaulting to anonymous.
    pub fn of(req: &HttpRequest) -> Self {
        req.extensions()
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default()
    }
}

impl FromRequest for RequestContext {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(RequestContext::of(req)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;
    use uuid::Uuid;

    #[actix_rt::test]
    async fn test_missing_context_is_anonymous() {
        let req = test::TestRequest::default().to_http_request();

        let mut payload = Payload::None;
        let context = RequestContext::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(context.state(), &IdentityState::Anonymous);
        assert!(context.principal().is_none());
        assert!(matches!(context.require_principal(), Err(AppError::Unauthenticated)));
    }

    #[actix_rt::test]
    async fn test_attached_context_is_extracted() {
        let account = Account::new(Uuid::new_v4(), "jhondoe@test.in", "hash");
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut()
            .insert(RequestContext::authenticated(account.clone()));

        let mut payload = Payload::None;
        let context = RequestContext::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(context.principal(), Some(&account));
        assert_eq!(context.require_principal().unwrap(), &account);
    }

    #[::core::prelude::v1::test]
    fn test_failed_context_maps_to_errors() {
        let rejected = RequestContext::failed(AuthFailure::Rejected);
        assert!(rejected.principal().is_none());
        assert!(matches!(rejected.require_principal(), Err(AppError::InvalidToken)));

        let unavailable = RequestContext::failed(AuthFailure::Unavailable);
        assert!(matches!(unavailable.require_principal(), Err(AppError::Internal(_))));
    }
}
