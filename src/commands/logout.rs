use crate::Container;

/// Remove the stored credentials
pub fn run(container: &mut Container) -> anyhow::Result<()> {
    container.cli_config.logout()?;
    log::info!("Successfully logged out");
    Ok(())
}
