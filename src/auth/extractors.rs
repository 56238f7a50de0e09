use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::context::RequestContext;
use crate::models::Account;

/// Extracts the authenticated account for routes that require one.
///
/// Reads the `RequestContext` attached by `IdentityMiddleware`. Anonymous requests are
/// answered with `AppError::Unauthenticated`, requests whose token failed validation with
/// `AppError::InvalidToken`; both render as 401 through `AppError`'s `ResponseError` impl.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

impl FromRequest for CurrentAccount {
    type Error = ActixError; // AppError will be converted into ActixError via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let context = RequestContext::of(req);
        let result = context
            .require_principal()
            .map(|account| CurrentAccount(account.clone()))
            .map_err(ActixError::from);
        ready(result)
    }
}
