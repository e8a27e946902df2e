//! hero-api - Health-check API for the Hero function app
//!
//! Exposes `/Ping` and `/Healthy` and caches Key Vault secrets for the
//! lifetime of the process.

pub mod cache;
pub mod cli;
pub mod config;
pub mod dns;
pub mod error;
pub mod health;
pub mod secrets;
pub mod server;
pub mod tables;

pub use error::{HeroError, HeroResult};
