//! Configuration for the Lean CLI
//!
//! Two kinds of configuration live here:
//!
//! - [`CliConfigManager`]: named options persisted per user in `~/.lean`,
//!   split between a general settings store and a credentials store
//! - [`LeanConfigManager`]: the `lean.json` file at the root of a project,
//!   which is hand-edited and may contain comments
//!
//! # Example
//!
//! ```no_run
//! use lean_config::{CliConfigManager, DEFAULT_LANGUAGE};
//! use lean_store::LeanDirs;
//!
//! # fn main() -> Result<(), lean_config::ConfigError> {
//! let mut cli_config = CliConfigManager::open(&LeanDirs::new())?;
//!
//! if cli_config.get(&DEFAULT_LANGUAGE).is_none() {
//!     cli_config.set(&DEFAULT_LANGUAGE, "Python")?;
//! }
//!
//! assert_eq!(cli_config.default_language().as_deref(), Some("python"));
//! # Ok(())
//! # }
//! ```

mod cli_config;
mod error;
mod json;
mod lean_config;

pub use cli_config::{API_TOKEN, CliConfigManager, ConfigOption, DEFAULT_LANGUAGE, USER_ID};
pub use error::ConfigError;
pub use lean_config::{
    DEFAULT_DATA_DIRECTORY_NAME, DEFAULT_LEAN_CONFIG_FILE_NAME, LeanConfigManager,
    clean_lean_config,
};
