//! In-process load-through cache
//!
//! Memoizes the result of an async loader per key for the lifetime of the
//! process. Used by the secret layer so each secret name is fetched from
//! Key Vault once.
//!
//! # Entry States
//!
//! | State | Description |
//! |-------|-------------|
//! | Absent | Never requested, or every load so far has failed |
//! | Loading | A loader call is in flight (single-flight mode only) |
//! | Present | Value stored, terminal; never updated or evicted |
//!
//! Failures are never stored: the next request for a failed key calls the
//! loader again.

pub mod loader;

pub use loader::{AsyncCache, LoadMode, Loader};
