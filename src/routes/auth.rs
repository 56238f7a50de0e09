use crate::{
    auth::{Authenticator, LoginRequest, SignUpRequest},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Sign up
///
/// Creates a new account and returns an authentication token for it.
///
/// ## Responses:
/// - `201 Created`: `{email, token}`.
/// - `400 Bad Request`: The email is already registered, or the body is not valid JSON.
/// - `422 Unprocessable Entity`: Invalid email format or password length.
#[post("/sign-up")]
pub async fn sign_up(
    authenticator: web::Data<Authenticator>,
    payload: web::Json<SignUpRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let response = authenticator
        .sign_up(&payload.email, &payload.password)
        .await?;

    Ok(HttpResponse::Created().json(response))
}

/// Login
///
/// Verifies the credentials and returns a fresh authentication token.
///
/// ## Responses:
/// - `200 OK`: `{email, token}`.
/// - `400 Bad Request`: Unknown email or wrong password (same body for both).
/// - `422 Unprocessable Entity`: Invalid email format or empty password.
#[post("/login")]
pub async fn login(
    authenticator: web::Data<Authenticator>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let response = authenticator
        .login(&payload.email, &payload.password)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}
