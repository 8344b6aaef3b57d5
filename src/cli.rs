//! Command-line interface definition

use crate::Container;
use crate::commands;
use crate::prompt::Prompt;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "lean", version, about = "Bootstrap and manage LEAN engine projects")]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Bootstrap a Lean CLI project
    Init,

    /// Log in with a QuantConnect account
    ///
    /// If user id or API token is not provided an interactive prompt will show.
    /// Credentials are stored in ~/.lean/credentials and are removed upon running `lean logout`.
    Login(LoginArgs),

    /// Log out and remove stored credentials
    Logout,

    /// Configure Lean CLI options
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// QuantConnect.com user id
    #[arg(short = 'u', long)]
    pub user_id: Option<String>,

    /// QuantConnect.com API token
    #[arg(short = 't', long)]
    pub api_token: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// List the configurable options and their current values
    List,

    /// Print the value of an option
    Get { key: String },

    /// Change the value of an option
    Set { key: String, value: String },

    /// Remove the value of an option
    Unset { key: String },
}

impl Command {
    /// Run the command against the stores in `container`
    pub async fn run(
        self,
        container: &mut Container,
        prompt: &mut dyn Prompt,
    ) -> anyhow::Result<()> {
        match self {
            Command::Init => commands::init::run(container, prompt).await,
            Command::Login(args) => commands::login::run(container, prompt, args).await,
            Command::Logout => commands::logout::run(container),
            Command::Config(command) => commands::config::run(container, command),
        }
    }
}
