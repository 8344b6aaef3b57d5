use lean_store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("There doesn't exist an option with key '{0}'")]
    UnknownOption(String),

    #[error("Invalid value '{value}' for option '{key}', allowed values: {}", .allowed.join(", "))]
    InvalidValue {
        key: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error(
        "This command should be executed in a Lean CLI project, run `lean init` in an empty directory to create one"
    )]
    NotInProject,

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{key}' is not set in {}", .path.display())]
    MissingKey { key: &'static str, path: PathBuf },

    #[error("{} is not inside the project at {}", .file.display(), .project.display())]
    OutsideProject { file: PathBuf, project: PathBuf },

    #[error("No algorithm class found in {}", .0.display())]
    NoAlgorithmClass(PathBuf),
}
