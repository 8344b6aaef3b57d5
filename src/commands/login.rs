use crate::Container;
use crate::cli::LoginArgs;
use crate::prompt::Prompt;
use anyhow::{Context, bail};
use lean_api::ApiClient;
use lean_config::{API_TOKEN, CliConfigManager, USER_ID};

/// Log in with a QuantConnect account
///
/// Missing credentials are asked for interactively. They are checked against
/// the API before anything is saved.
pub async fn run(
    container: &mut Container,
    prompt: &mut dyn Prompt,
    args: LoginArgs,
) -> anyhow::Result<()> {
    if args.user_id.is_none() || args.api_token.is_none() {
        log::info!(
            "Your user id and API token are needed to make authenticated requests to the QuantConnect API"
        );
        log::info!("You can request these credentials on https://www.quantconnect.com/account");
        log::info!(
            "Both will be saved in {}",
            container.cli_config.credentials_file().display()
        );
    }

    let user_id = match args.user_id {
        Some(user_id) => user_id,
        None => prompt.text("User id")?,
    };

    let api_token = match args.api_token {
        Some(api_token) => api_token,
        None => prompt.text("API token")?,
    };

    let authenticated = ApiClient::new(&user_id, &api_token)
        .is_authenticated()
        .await
        .context("Could not verify credentials")?;

    if !authenticated {
        bail!("Credentials are invalid");
    }

    save_credentials(&mut container.cli_config, &user_id, &api_token)?;
    log::info!("Successfully logged in");

    Ok(())
}

fn save_credentials(
    cli_config: &mut CliConfigManager,
    user_id: &str,
    api_token: &str,
) -> anyhow::Result<()> {
    cli_config
        .set(&USER_ID, user_id)
        .and_then(|()| cli_config.set(&API_TOKEN, api_token))
        .with_context(|| {
            format!(
                "Failed to save credentials to {}",
                cli_config.credentials_file().display()
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lean_store::{LeanDirs, Storage};

    #[test]
    fn saved_credentials_land_in_credentials_file() {
        let home = tempfile::tempdir().unwrap();
        let dirs = LeanDirs::at(home.path());
        let mut container = Container::new(dirs.clone(), home.path()).unwrap();

        save_credentials(&mut container.cli_config, "123", "secret").unwrap();

        let credentials = Storage::new(dirs.credentials_path()).unwrap();
        assert_eq!(credentials.get_as::<String>("user-id").unwrap().as_deref(), Some("123"));
        assert_eq!(credentials.get_as::<String>("api-token").unwrap().as_deref(), Some("secret"));
        assert!(!dirs.config_path().exists());
    }
}
