//! The `lean` command-line tool
//!
//! Bootstraps LEAN engine projects and manages QuantConnect credentials.
//! All persisted state goes through [`lean_store::Storage`]; the stores are
//! opened once per invocation and handed to commands through a [`Container`].

pub mod cli;
pub mod commands;
pub mod prompt;
mod templates;

use lean_config::{CliConfigManager, ConfigError, DEFAULT_LEAN_CONFIG_FILE_NAME, LeanConfigManager};
use lean_store::LeanDirs;
use std::path::{Path, PathBuf};

/// Everything a command needs, built once in `main`
///
/// Commands receive the container by reference instead of reaching for
/// process-wide state, so tests can point it at temporary directories.
#[derive(Debug)]
pub struct Container {
    pub dirs: LeanDirs,
    pub cli_config: CliConfigManager,
    pub lean_config: LeanConfigManager,
    working_dir: PathBuf,
}

impl Container {
    /// Open the user's stores under `dirs` for a command run in `working_dir`
    pub fn new(dirs: LeanDirs, working_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let working_dir = working_dir.into();
        let cli_config = CliConfigManager::open(&dirs)?;
        let lean_config = LeanConfigManager::new(&working_dir, DEFAULT_LEAN_CONFIG_FILE_NAME);

        Ok(Self {
            dirs,
            cli_config,
            lean_config,
            working_dir,
        })
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}
