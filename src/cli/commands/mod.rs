//! CLI command implementations

pub mod config;
pub mod health;
pub mod secret;
pub mod serve;

pub use config::execute as config;
pub use health::execute as health;
pub use secret::execute as secret;
pub use serve::execute as serve;
