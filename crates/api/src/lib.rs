//! HTTP surface of the avatar service.
//!
//! The binary in `main.rs` wires configuration, logging, the database
//! facade and the file store together, then serves [`router::build_app_router`].

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod logging;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
