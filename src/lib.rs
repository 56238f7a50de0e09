#![doc = "The `todoforge` library crate."]
#![doc = ""]
#![doc = "A multi-user todo list service behind stateless bearer-token authentication."]
#![doc = "The library holds the authentication core (password hashing, token codec,"]
#![doc = "authenticator, per-request identity middleware), the persistence seams,"]
#![doc = "routing configuration and error handling. `main.rs` wires them into a server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod ids;
pub mod models;
pub mod routes;
pub mod store;
pub mod todos;

pub use crate::error::AppError;
