//! Store for the Lean CLI
//!
//! A simple JSON-based key-value store that persists data to disk.
//! Each store manages exactly one file.
//!
//! # Features
//!
//! - Simple get/set/remove/clear operations
//! - Loaded once when the store is opened
//! - Every mutation is written straight through to disk
//! - The file is deleted as soon as the store becomes empty
//!
//! # Example
//!
//! ```no_run
//! use lean_store::{LeanDirs, Storage};
//!
//! # fn main() -> Result<(), lean_store::StoreError> {
//! let dirs = LeanDirs::new();
//! let mut credentials = Storage::new(dirs.credentials_path())?;
//!
//! credentials.set("user-id", "123")?;
//! assert!(credentials.has("user-id"));
//!
//! // Logging out removes ~/.lean/credentials entirely
//! credentials.clear()?;
//! # Ok(())
//! # }
//! ```

mod dirs;
mod error;
mod finite;
mod storage;

pub use dirs::LeanDirs;
pub use error::StoreError;
pub use storage::Storage;

/// Re-exported so callers can build values without depending on serde_json directly
pub use serde_json::Value;
