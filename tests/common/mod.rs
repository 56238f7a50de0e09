#![allow(dead_code)]

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{test, web, App, Error};
use chrono::Duration;
use serde_json::json;

use todoforge::auth::{
    AuthResponse, Authenticator, BcryptHasher, IdentityFilter, IdentityMiddleware, TokenCodec,
};
use todoforge::ids::{IdGenerator, UuidGenerator};
use todoforge::routes;
use todoforge::store::MemoryStore;
use todoforge::todos::TodoService;

pub const SECRET: &[u8] = b"integration_test_secret_0123456789abcdef";

/// Everything one test app needs, built over in-memory stores.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub tokens: Arc<TokenCodec>,
    pub authenticator: web::Data<Authenticator>,
    pub todos: web::Data<TodoService>,
    pub identity: IdentityFilter,
}

impl TestContext {
    pub fn new(ttl_seconds: i64) -> Self {
        let store = Arc::new(MemoryStore::new());
        let tokens = Arc::new(TokenCodec::new(SECRET, Duration::seconds(ttl_seconds)).unwrap());
        let ids: Arc<dyn IdGenerator> = Arc::new(UuidGenerator);

        let authenticator = web::Data::new(Authenticator::new(
            store.clone(),
            Arc::new(BcryptHasher::with_cost(4)),
            tokens.clone(),
            ids.clone(),
        ));
        let todos = web::Data::new(TodoService::new(store.clone(), ids));
        let identity = IdentityFilter::new(tokens.clone(), store.clone());

        Self {
            store,
            tokens,
            authenticator,
            todos,
            identity,
        }
    }

    /// The same app `main` builds, minus PostgreSQL.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Response = ServiceResponse<impl MessageBody>,
            Config = (),
            InitError = (),
            Error = Error,
        >,
    > {
        App::new()
            .app_data(self.authenticator.clone())
            .app_data(self.todos.clone())
            .wrap(IdentityMiddleware::new(self.identity.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub async fn sign_up(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> Result<AuthResponse, String> {
    let req = test::TestRequest::post()
        .uri("/auth/sign-up")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;

    if status != actix_web::http::StatusCode::CREATED {
        return Err(format!(
            "Failed to sign up. Status: {}. Body: {}",
            status,
            String::from_utf8_lossy(&body)
        ));
    }
    serde_json::from_slice(&body).map_err(|e| format!("Failed to parse sign-up response: {}", e))
}
