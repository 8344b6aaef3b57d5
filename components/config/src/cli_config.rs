//! User-wide CLI options persisted in `~/.lean`

use crate::error::ConfigError;
use lean_store::{LeanDirs, Storage, Value};
use std::path::Path;

/// Which of the two stores an option lives in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Location {
    General,
    Credentials,
}

/// A named option that can be read and written through [`CliConfigManager`]
#[derive(Clone, Copy, Debug)]
pub struct ConfigOption {
    pub key: &'static str,
    pub description: &'static str,
    /// Sensitive values are masked whenever they are shown
    pub sensitive: bool,
    /// When set, only these values (case-insensitive) are accepted
    pub allowed_values: Option<&'static [&'static str]>,
    location: Location,
}

pub const USER_ID: ConfigOption = ConfigOption {
    key: "user-id",
    description: "The user id used when making authenticated requests to the QuantConnect API.",
    sensitive: true,
    allowed_values: None,
    location: Location::Credentials,
};

pub const API_TOKEN: ConfigOption = ConfigOption {
    key: "api-token",
    description: "The API token used when making authenticated requests to the QuantConnect API.",
    sensitive: true,
    allowed_values: None,
    location: Location::Credentials,
};

pub const DEFAULT_LANGUAGE: ConfigOption = ConfigOption {
    key: "default-language",
    description: "The default language used when creating new projects.",
    sensitive: false,
    allowed_values: Some(&["python", "csharp"]),
    location: Location::General,
};

static ALL_OPTIONS: [ConfigOption; 3] = [USER_ID, API_TOKEN, DEFAULT_LANGUAGE];

impl ConfigOption {
    /// Check `value` against the allowed values and return the form to store
    ///
    /// Choice options are matched case-insensitively and stored using the
    /// spelling from `allowed_values`.
    pub fn validate(&self, value: &str) -> Result<String, ConfigError> {
        let Some(allowed) = self.allowed_values else {
            return Ok(value.to_string());
        };

        allowed
            .iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(value))
            .map(|candidate| candidate.to_string())
            .ok_or_else(|| ConfigError::InvalidValue {
                key: self.key,
                value: value.to_string(),
                allowed,
            })
    }

    /// Format `value` for display, masking it if the option is sensitive
    pub fn display_value(&self, value: &str) -> String {
        if self.sensitive {
            "*".repeat(value.chars().count())
        } else {
            value.to_string()
        }
    }
}

/// Reads and writes the user-wide CLI options
///
/// General settings and credentials are kept in separate stores so logging
/// out can delete the credentials file without touching anything else.
#[derive(Debug)]
pub struct CliConfigManager {
    general: Storage,
    credentials: Storage,
}

impl CliConfigManager {
    pub fn new(general: Storage, credentials: Storage) -> Self {
        Self {
            general,
            credentials,
        }
    }

    /// Open both stores under `dirs`
    pub fn open(dirs: &LeanDirs) -> Result<Self, ConfigError> {
        let general = Storage::new(dirs.config_path())?;
        let credentials = Storage::new(dirs.credentials_path())?;
        Ok(Self::new(general, credentials))
    }

    pub fn options(&self) -> &'static [ConfigOption] {
        &ALL_OPTIONS
    }

    /// Look up an option by its key
    pub fn option(&self, key: &str) -> Result<&'static ConfigOption, ConfigError> {
        ALL_OPTIONS
            .iter()
            .find(|option| option.key == key)
            .ok_or_else(|| ConfigError::UnknownOption(key.to_string()))
    }

    /// The current value of `option`, if set
    pub fn get(&self, option: &ConfigOption) -> Option<String> {
        match self.storage(option).get(option.key)? {
            Value::String(value) => Some(value.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Validate and persist a new value for `option`
    pub fn set(&mut self, option: &ConfigOption, value: &str) -> Result<(), ConfigError> {
        let value = option.validate(value)?;
        self.storage_mut(option).set(option.key, value)?;
        log::debug!("Set {} in {}", option.key, self.storage(option).file().display());
        Ok(())
    }

    /// Remove the value of `option`, returning whether it was set
    pub fn unset(&mut self, option: &ConfigOption) -> Result<bool, ConfigError> {
        Ok(self.storage_mut(option).remove(option.key)?)
    }

    pub fn user_id(&self) -> Option<String> {
        self.get(&USER_ID)
    }

    pub fn api_token(&self) -> Option<String> {
        self.get(&API_TOKEN)
    }

    pub fn default_language(&self) -> Option<String> {
        self.get(&DEFAULT_LANGUAGE)
    }

    /// Where the user id and API token are saved
    pub fn credentials_file(&self) -> &Path {
        self.credentials.file()
    }

    /// Forget the stored credentials and delete their file
    pub fn logout(&mut self) -> Result<(), ConfigError> {
        self.credentials.clear()?;
        Ok(())
    }

    fn storage(&self, option: &ConfigOption) -> &Storage {
        match option.location {
            Location::General => &self.general,
            Location::Credentials => &self.credentials,
        }
    }

    fn storage_mut(&mut self, option: &ConfigOption) -> &mut Storage {
        match option.location {
            Location::General => &mut self.general,
            Location::Credentials => &mut self.credentials,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(dirs: &LeanDirs) -> CliConfigManager {
        CliConfigManager::open(dirs).unwrap()
    }

    #[test]
    fn credentials_and_settings_use_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = LeanDirs::at(dir.path());
        let mut config = manager(&dirs);

        config.set(&USER_ID, "123").unwrap();
        config.set(&DEFAULT_LANGUAGE, "csharp").unwrap();

        let general = Storage::new(dirs.config_path()).unwrap();
        let credentials = Storage::new(dirs.credentials_path()).unwrap();
        assert!(general.has("default-language"));
        assert!(!general.has("user-id"));
        assert!(credentials.has("user-id"));
        assert_eq!(config.credentials_file(), dirs.credentials_path());
    }

    #[test]
    fn choice_option_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = manager(&LeanDirs::at(dir.path()));

        config.set(&DEFAULT_LANGUAGE, "CSharp").unwrap();

        assert_eq!(config.default_language().as_deref(), Some("csharp"));
    }

    #[test]
    fn choice_option_rejects_unknown_value() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = LeanDirs::at(dir.path());
        let mut config = manager(&dirs);

        let err = config.set(&DEFAULT_LANGUAGE, "fsharp").unwrap_err();

        assert!(matches!(err, ConfigError::InvalidValue { key: "default-language", .. }));
        assert!(config.default_language().is_none());
        assert!(!dirs.config_path().exists());
    }

    #[test]
    fn option_lookup_by_key() {
        let dir = tempfile::tempdir().unwrap();
        let config = manager(&LeanDirs::at(dir.path()));

        assert_eq!(config.option("api-token").unwrap().key, "api-token");
        assert!(matches!(
            config.option("nope"),
            Err(ConfigError::UnknownOption(key)) if key == "nope"
        ));
        assert_eq!(config.options().len(), 3);
    }

    #[test]
    fn non_string_values_are_rendered_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = LeanDirs::at(dir.path());
        std::fs::create_dir_all(dirs.root()).unwrap();
        std::fs::write(dirs.credentials_path(), r#"{ "user-id": 123 }"#).unwrap();

        let config = manager(&dirs);

        assert_eq!(config.user_id().as_deref(), Some("123"));
    }

    #[test]
    fn sensitive_values_are_masked() {
        assert_eq!(API_TOKEN.display_value("abcd"), "****");
        assert_eq!(DEFAULT_LANGUAGE.display_value("python"), "python");
    }

    #[test]
    fn logout_deletes_credentials_only() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = LeanDirs::at(dir.path());
        let mut config = manager(&dirs);
        config.set(&USER_ID, "123").unwrap();
        config.set(&API_TOKEN, "secret").unwrap();
        config.set(&DEFAULT_LANGUAGE, "python").unwrap();

        config.logout().unwrap();

        assert!(!dirs.credentials_path().exists());
        assert!(config.user_id().is_none());
        assert!(config.api_token().is_none());
        assert_eq!(config.default_language().as_deref(), Some("python"));

        // Logging out twice is fine
        config.logout().unwrap();
    }

    #[test]
    fn unset_removes_value() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = LeanDirs::at(dir.path());
        let mut config = manager(&dirs);
        config.set(&DEFAULT_LANGUAGE, "python").unwrap();

        assert!(config.unset(&DEFAULT_LANGUAGE).unwrap());
        assert!(!config.unset(&DEFAULT_LANGUAGE).unwrap());
        assert!(!dirs.config_path().exists());
    }
}
