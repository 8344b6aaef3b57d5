use clap::Parser;
use lean_cli::Container;
use lean_cli::cli::Cli;
use lean_cli::prompt::TerminalPrompt;
use lean_store::LeanDirs;
use log::{Level, LevelFilter};
use std::io::Write;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let working_dir = std::env::current_dir()?;
    let mut container = Container::new(LeanDirs::new(), working_dir)?;
    let mut prompt = TerminalPrompt::stdio();

    cli.command.run(&mut container, &mut prompt).await
}

/// Info messages are printed as-is, everything else gets its level in front
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| match record.level() {
            Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "[{}] {}", level, record.args()),
        })
        .init();
}
