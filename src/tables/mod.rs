//! Table Storage access
//!
//! Only existence checks are needed: the health endpoint treats a present
//! `data` table as proof that the account is reachable and authorized.

pub mod storage;

pub use storage::TableStorageCli;

use crate::error::HeroResult;
use async_trait::async_trait;

/// Remote table store
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Whether a table with exactly this name exists
    async fn table_exists(&self, name: &str) -> HeroResult<bool>;
}
