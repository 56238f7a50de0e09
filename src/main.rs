use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;

use todoforge::auth::{Authenticator, BcryptHasher, IdentityFilter, IdentityMiddleware, TokenCodec};
use todoforge::config::Config;
use todoforge::ids::{IdGenerator, UuidGenerator};
use todoforge::routes;
use todoforge::store::PgStore;
use todoforge::todos::TodoService;

fn startup_error<E: std::fmt::Display>(context: &str, e: E) -> io::Error {
    log::error!("{}: {}", context, e);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| startup_error("invalid configuration", e))?;

    let pool = PgPool::connect(&config.database_url)
        .await
        .map_err(|e| startup_error("failed to connect to database", e))?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| startup_error("failed to run migrations", e))?;

    let ttl = config.token_ttl();
    let tokens = Arc::new(
        TokenCodec::new(config.jwt_secret.as_bytes(), ttl)
            .map_err(|e| startup_error("invalid token settings", e))?,
    );
    let store = Arc::new(PgStore::new(pool));
    let ids: Arc<dyn IdGenerator> = Arc::new(UuidGenerator);

    let authenticator = web::Data::new(Authenticator::new(
        store.clone(),
        Arc::new(BcryptHasher::default()),
        tokens.clone(),
        ids.clone(),
    ));
    let todos = web::Data::new(TodoService::new(store.clone(), ids));
    let identity = IdentityFilter::new(tokens, store);

    log::info!("Starting todoforge server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(authenticator.clone())
            .app_data(todos.clone())
            .wrap(IdentityMiddleware::new(identity.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
