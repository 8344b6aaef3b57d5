//! Utilities for files containing LEAN engine configuration

use crate::cli_config::CliConfigManager;
use crate::error::ConfigError;
use crate::json::parse_commented;
use lean_store::Value;
use serde_json::Map;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the engine configuration file at the root of a project
pub const DEFAULT_LEAN_CONFIG_FILE_NAME: &str = "lean.json";

/// Name of the directory `lean init` copies the sample data into
pub const DEFAULT_DATA_DIRECTORY_NAME: &str = "data";

/// Keys the CLI fills in itself depending on the command being run
const AUTO_CONFIGURED_KEYS: [&str; 9] = [
    "environment",
    "composer-dll-directory",
    "debugging",
    "debugging-method",
    "job-user-id",
    "api-access-token",
    "algorithm-type-name",
    "algorithm-language",
    "algorithm-location",
];

/// Project root as seen from inside the engine container
const CONTAINER_PROJECT_ROOT: &str = "/LeanCLI";

/// Locates and reads the `lean.json` of the current project
#[derive(Clone, Debug)]
pub struct LeanConfigManager {
    working_dir: PathBuf,
    file_name: String,
    default_path: Option<PathBuf>,
}

impl LeanConfigManager {
    /// Create a manager that searches for `file_name` upwards from `working_dir`
    pub fn new(working_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            working_dir: working_dir.into(),
            file_name: file_name.into(),
            default_path: None,
        }
    }

    /// Path to the closest Lean config file
    ///
    /// Walks up from the working directory unless a path was set with
    /// [`set_default_lean_config_path`](Self::set_default_lean_config_path).
    pub fn lean_config_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.default_path {
            return Ok(path.clone());
        }

        for dir in self.working_dir.ancestors() {
            let candidate = dir.join(&self.file_name);
            if candidate.is_file() {
                log::debug!("Using Lean config at {}", candidate.display());
                return Ok(candidate);
            }
        }

        Err(ConfigError::NotInProject)
    }

    /// Skip the upward search and always use `path`
    pub fn set_default_lean_config_path(&mut self, path: impl Into<PathBuf>) {
        self.default_path = Some(path.into());
    }

    /// The data directory configured in the Lean config
    pub fn data_directory(&self) -> Result<PathBuf, ConfigError> {
        let config_path = self.lean_config_path()?;
        let config = read_lean_config(&config_path)?;

        let data_folder = config
            .get("data-folder")
            .and_then(Value::as_str)
            .ok_or_else(|| ConfigError::MissingKey {
                key: "data-folder",
                path: config_path.clone(),
            })?;

        Ok(project_root(&config_path).join(data_folder))
    }

    /// A Lean config with every property the engine needs to run
    ///
    /// Reads the project's config and adds back everything
    /// [`clean_lean_config`] removed. Assumes the project is mounted at
    /// `/LeanCLI` inside the engine container.
    pub fn complete_lean_config(
        &self,
        cli_config: &CliConfigManager,
        environment: &str,
        algorithm_file: &Path,
        debugging_method: Option<&str>,
    ) -> Result<Map<String, Value>, ConfigError> {
        let config_path = self.lean_config_path()?;
        let mut config = read_lean_config(&config_path)?;

        config.insert("environment".into(), environment.into());
        config.insert("close-automatically".into(), true.into());

        config.insert("composer-dll-directory".into(), ".".into());

        config.insert("debugging".into(), debugging_method.is_some().into());
        config.insert(
            "debugging-method".into(),
            debugging_method.unwrap_or("LocalCmdline").into(),
        );

        config.insert(
            "job-user-id".into(),
            cli_config.user_id().unwrap_or_else(|| "0".to_string()).into(),
        );
        config.insert(
            "api-access-token".into(),
            cli_config.api_token().unwrap_or_default().into(),
        );

        let (type_name, language, location) = if is_python(algorithm_file) {
            let root = project_root(&config_path);
            let relative = algorithm_file.strip_prefix(root).map_err(|_| {
                ConfigError::OutsideProject {
                    file: algorithm_file.to_path_buf(),
                    project: root.to_path_buf(),
                }
            })?;

            let type_name = algorithm_file
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.split('.').next())
                .unwrap_or_default()
                .to_string();

            (
                type_name,
                "Python",
                format!("{}/{}", CONTAINER_PROJECT_ROOT, to_posix(relative)),
            )
        } else {
            let source = fs::read_to_string(algorithm_file).map_err(|source| ConfigError::Read {
                path: algorithm_file.to_path_buf(),
                source,
            })?;

            let type_name = first_class_name(&source)
                .ok_or_else(|| ConfigError::NoAlgorithmClass(algorithm_file.to_path_buf()))?;

            (
                type_name.to_string(),
                "CSharp",
                "QuantConnect.Algorithm.CSharp.dll".to_string(),
            )
        };

        config.insert("algorithm-type-name".into(), type_name.into());
        config.insert("algorithm-language".into(), language.into());
        config.insert("algorithm-location".into(), location.into());

        Ok(config)
    }
}

/// Remove the properties the CLI configures automatically from a Lean config
///
/// The config contains comments, so this works on the text instead of a
/// parsed document: it is split into blank-line separated sections and every
/// section mentioning one of the auto-configured keys is dropped, together with
/// the comments documenting it.
///
/// ```
/// let config = "{\n\n    // Environment docs\n    \"environment\": \"backtesting\",\n\n    // Key2 docs\n    \"key2\": \"value2\"\n}";
///
/// assert_eq!(
///     lean_config::clean_lean_config(config),
///     "{\n\n    // Key2 docs\n    \"key2\": \"value2\"\n}",
/// );
/// ```
pub fn clean_lean_config(config: &str) -> String {
    sections(config)
        .into_iter()
        .filter(|section| {
            !AUTO_CONFIGURED_KEYS
                .iter()
                .any(|key| section.contains(&format!("\"{key}\": ")))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Split wherever a newline is followed by whitespace containing another newline
///
/// Text outside the separators is returned untouched, including leading
/// indentation and a trailing newline.
fn sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut start = 0;
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('\n') {
        let newline = pos + offset;
        let rest = &text[newline + 1..];
        let blank = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());

        match rest[..blank].rfind('\n') {
            Some(last) => {
                sections.push(&text[start..newline]);
                start = newline + 1 + last + 1;
                pos = start;
            }
            None => pos = newline + 1,
        }
    }

    sections.push(&text[start..]);
    sections
}

fn read_lean_config(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_commented(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn project_root(config_path: &Path) -> &Path {
    config_path.parent().unwrap_or_else(|| Path::new("."))
}

fn is_python(file: &Path) -> bool {
    file.extension().is_some_and(|ext| ext == "py")
}

fn to_posix(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Name of the first `class <Name>` declaration in `source`
fn first_class_name(source: &str) -> Option<&str> {
    source.match_indices("class ").find_map(|(index, _)| {
        let rest = &source[index + "class ".len()..];
        let end = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        (end > 0).then(|| &rest[..end])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_split_on_blank_line_runs() {
        assert_eq!(sections("a\nb\n\n  \n\nc\n"), vec!["a\nb", "c\n"]);
        assert_eq!(sections("\n\n  a"), vec!["", "  a"]);
        assert_eq!(sections("a  \n\t\n"), vec!["a  ", ""]);
        assert_eq!(sections(""), vec![""]);
    }

    #[test]
    fn config_without_auto_configured_keys_is_unchanged() {
        let config = "{\n  // docs\n  \"log-handler\": \"x\",\n\n  \"data-folder\": \"data\"\n}\n";

        assert_eq!(clean_lean_config(config), config);
    }

    #[test]
    fn trailing_newline_survives_cleaning() {
        let config = "{\n\n  \"environment\": \"backtesting\",\n\n  \"log-handler\": \"x\"\n}\n";

        assert_eq!(clean_lean_config(config), "{\n\n  \"log-handler\": \"x\"\n}\n");
    }

    #[test]
    fn clean_lean_config_keeps_unrelated_sections() {
        let config = r#"{

    // Environment docs
    "environment": "backtesting",

    // Algorithm docs
    "algorithm-type-name": "BasicTemplateAlgorithm",
    "algorithm-language": "CSharp",

    // Data docs
    "data-folder": "../../../Data/",

    "debugging": false,
    "debugging-method": "LocalCmdline",

    "log-handler": "ConsoleLogHandler"
}"#;

        let cleaned = clean_lean_config(config);

        assert_eq!(
            cleaned,
            "{\n\n    // Data docs\n    \"data-folder\": \"../../../Data/\",\n\n    \"log-handler\": \"ConsoleLogHandler\"\n}"
        );
    }

    #[test]
    fn similar_key_names_are_kept() {
        let config = "{\n    \"environment-name\": \"x\",\n\n    \"my-debugging\": true\n}";

        assert_eq!(clean_lean_config(config), config);
    }

    #[test]
    fn first_class_name_skips_empty_matches() {
        assert_eq!(first_class_name("// class \nclass Foo : Bar {}"), Some("Foo"));
        assert_eq!(first_class_name("namespace X {}"), None);
    }

    #[test]
    fn to_posix_joins_with_forward_slashes() {
        let path: PathBuf = ["My Project", "main.py"].iter().collect();
        assert_eq!(to_posix(&path), "My Project/main.py");
    }
}
