use crate::Container;
use crate::cli::ConfigCommand;
use anyhow::bail;
use lean_config::CliConfigManager;

/// Read or change the user-wide CLI options
pub fn run(container: &mut Container, command: ConfigCommand) -> anyhow::Result<()> {
    let cli_config = &mut container.cli_config;

    match command {
        ConfigCommand::List => {
            for line in list(cli_config) {
                println!("{}", line);
            }
        }
        ConfigCommand::Get { key } => println!("{}", get(cli_config, &key)?),
        ConfigCommand::Set { key, value } => {
            let option = cli_config.option(&key)?;
            cli_config.set(option, &value)?;
            log::info!("Successfully updated the value of '{}'", key);
        }
        ConfigCommand::Unset { key } => {
            let option = cli_config.option(&key)?;
            if cli_config.unset(option)? {
                log::info!("Successfully removed the value of '{}'", key);
            } else {
                log::info!("'{}' was not set", key);
            }
        }
    }

    Ok(())
}

/// One line per option: key, displayed value and description
fn list(cli_config: &CliConfigManager) -> Vec<String> {
    cli_config
        .options()
        .iter()
        .map(|option| {
            let value = cli_config
                .get(option)
                .map(|value| option.display_value(&value))
                .unwrap_or_else(|| "<not set>".to_string());
            format!("{} = {}  ({})", option.key, value, option.description)
        })
        .collect()
}

fn get(cli_config: &CliConfigManager, key: &str) -> anyhow::Result<String> {
    let option = cli_config.option(key)?;

    if option.sensitive {
        bail!("The value of '{}' is sensitive and cannot be printed", key);
    }

    match cli_config.get(option) {
        Some(value) => Ok(value),
        None => bail!("'{}' is not set", key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lean_config::{API_TOKEN, DEFAULT_LANGUAGE};
    use lean_store::LeanDirs;

    fn container(home: &std::path::Path) -> Container {
        Container::new(LeanDirs::at(home), home).unwrap()
    }

    #[test]
    fn list_masks_sensitive_values() {
        let home = tempfile::tempdir().unwrap();
        let mut container = container(home.path());
        container.cli_config.set(&API_TOKEN, "secret").unwrap();

        let lines = list(&container.cli_config);

        assert!(lines.iter().any(|line| line.starts_with("api-token = ******  (")));
        assert!(lines.iter().any(|line| line.starts_with("default-language = <not set>")));
        assert!(!lines.iter().any(|line| line.contains("secret")));
    }

    #[test]
    fn get_refuses_sensitive_options() {
        let home = tempfile::tempdir().unwrap();
        let mut container = container(home.path());
        container.cli_config.set(&API_TOKEN, "secret").unwrap();
        container.cli_config.set(&DEFAULT_LANGUAGE, "python").unwrap();

        assert!(get(&container.cli_config, "api-token").is_err());
        assert_eq!(get(&container.cli_config, "default-language").unwrap(), "python");
    }

    #[test]
    fn set_and_unset_through_command() {
        let home = tempfile::tempdir().unwrap();
        let mut container = container(home.path());

        run(
            &mut container,
            ConfigCommand::Set {
                key: "default-language".to_string(),
                value: "CSHARP".to_string(),
            },
        )
        .unwrap();
        assert_eq!(container.cli_config.default_language().as_deref(), Some("csharp"));

        run(
            &mut container,
            ConfigCommand::Unset {
                key: "default-language".to_string(),
            },
        )
        .unwrap();
        assert!(container.cli_config.default_language().is_none());
        assert!(!container.dirs.config_path().exists());
    }

    #[test]
    fn unknown_key_is_an_error() {
        let home = tempfile::tempdir().unwrap();
        let mut container = container(home.path());

        let err = run(
            &mut container,
            ConfigCommand::Set {
                key: "theme".to_string(),
                value: "dark".to_string(),
            },
        )
        .unwrap_err();

        assert!(err.to_string().contains("theme"));
    }
}
