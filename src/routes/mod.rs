pub mod auth;
pub mod health;
pub mod todos;

use actix_web::{
    error::{JsonPayloadError, PathError},
    web, HttpRequest,
};

use crate::error::AppError;

/// Malformed JSON bodies get the same structured error body as everything else.
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Unparseable path segments (a bad id or an unknown status) are a missing resource.
fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::NotFound(err.to_string()).into()
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(health::health)
        .service(
            web::scope("/auth")
                .service(auth::sign_up)
                .service(auth::login),
        )
        .service(
            web::scope("/todos")
                .service(todos::list_todos)
                .service(todos::create_todo)
                .service(todos::get_todo)
                .service(todos::update_status)
                .service(todos::update_todo)
                .service(todos::delete_todo),
        );
}
