//! `lean init`: bootstrap a Lean CLI project in the working directory

use crate::Container;
use crate::prompt::Prompt;
use crate::templates::PROJECT_FILES;
use anyhow::{Context, bail};
use lean_config::{
    CliConfigManager, DEFAULT_DATA_DIRECTORY_NAME, DEFAULT_LANGUAGE, DEFAULT_LEAN_CONFIG_FILE_NAME,
    clean_lean_config,
};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// GitHub doesn't allow downloading a single directory, so the whole
/// repository is fetched. The data is most of it anyway.
const LEAN_REPOSITORY_ZIP: &str = "https://github.com/QuantConnect/Lean/archive/master.zip";

/// Top-level directory inside the repository archive
const ARCHIVE_ROOT: &str = "Lean-master";

/// How the launcher config points at the data directory in the repository
const LAUNCHER_DATA_FOLDER: &str = r#""data-folder": "../../../Data/""#;

pub async fn run(container: &mut Container, prompt: &mut dyn Prompt) -> anyhow::Result<()> {
    let project_dir = container.working_dir().to_path_buf();
    ensure_can_bootstrap(&project_dir)?;

    if !is_empty_dir(&project_dir).await? {
        log::info!("This command will bootstrap a Lean CLI project in the current directory");
        if !prompt.confirm("The current directory is not empty, continue?", false)? {
            bail!("Aborted!");
        }
    }

    log::info!("Downloading latest sample data from the Lean repository...");
    let download_dir = container.dirs.cache_dir().join("init");
    if fs::try_exists(&download_dir).await.unwrap_or(false) {
        fs::remove_dir_all(&download_dir)
            .await
            .with_context(|| format!("Failed to clean {}", download_dir.display()))?;
    }

    let archive = download_file(LEAN_REPOSITORY_ZIP, &download_dir.join("master.zip")).await?;
    let extract_dir = download_dir.join("master");
    extract_zip(&archive, &extract_dir).await?;

    bootstrap_from(&extract_dir.join(ARCHIVE_ROOT), &project_dir).await?;

    if let Err(e) = fs::remove_dir_all(&download_dir).await {
        log::debug!("Failed to remove {}: {}", download_dir.display(), e);
    }

    ask_default_language(&mut container.cli_config, prompt)?;

    log::info!(
        "\
Successfully bootstrapped your Lean CLI project!

The following structure has been created:
- {config} contains the configuration used when running the LEAN engine locally
- {data}/ contains the data that is used when running the LEAN engine locally

Here are some commands to get you going:
- Run `lean create-project \"My Project\"` to create a new project with starter code
- Run `lean backtest \"My Project\"` to backtest a project locally with the data in {data}/",
        config = DEFAULT_LEAN_CONFIG_FILE_NAME,
        data = DEFAULT_DATA_DIRECTORY_NAME,
    );

    Ok(())
}

/// Refuse to overwrite the files this command creates
fn ensure_can_bootstrap(project_dir: &Path) -> anyhow::Result<()> {
    for name in [DEFAULT_DATA_DIRECTORY_NAME, DEFAULT_LEAN_CONFIG_FILE_NAME] {
        if project_dir.join(name).exists() {
            bail!(
                "{} already exists, please run this command in an empty directory",
                name
            );
        }
    }
    Ok(())
}

async fn is_empty_dir(dir: &Path) -> anyhow::Result<bool> {
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read {}", dir.display()))?;
    Ok(entries.next_entry().await?.is_none())
}

/// Copy the data and write the project files from an extracted repository
async fn bootstrap_from(repository: &Path, project_dir: &Path) -> anyhow::Result<()> {
    copy_dir(
        &repository.join("Data"),
        &project_dir.join(DEFAULT_DATA_DIRECTORY_NAME),
    )
    .await?;

    let launcher_config_path = repository.join("Launcher").join("config.json");
    let launcher_config = fs::read_to_string(&launcher_config_path)
        .await
        .with_context(|| format!("Failed to read {}", launcher_config_path.display()))?;

    let config_path = project_dir.join(DEFAULT_LEAN_CONFIG_FILE_NAME);
    fs::write(&config_path, project_lean_config(&launcher_config))
        .await
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    write_project_files(project_dir).await
}

/// The launcher config with auto-configured keys removed and the data folder
/// pointing at the project's data directory
fn project_lean_config(launcher_config: &str) -> String {
    clean_lean_config(launcher_config).replace(
        LAUNCHER_DATA_FOLDER,
        &format!(r#""data-folder": "{}""#, DEFAULT_DATA_DIRECTORY_NAME),
    )
}

/// Write the files which make debugging and autocompletion possible
async fn write_project_files(project_dir: &Path) -> anyhow::Result<()> {
    for (location, content) in PROJECT_FILES {
        let path = project_dir.join(location);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

fn ask_default_language(
    cli_config: &mut CliConfigManager,
    prompt: &mut dyn Prompt,
) -> anyhow::Result<()> {
    if cli_config.get(&DEFAULT_LANGUAGE).is_some() {
        return Ok(());
    }

    let allowed = DEFAULT_LANGUAGE.allowed_values.unwrap_or_default();
    let language = prompt.choice(
        "What should the default language for new projects be?",
        allowed,
    )?;
    cli_config.set(&DEFAULT_LANGUAGE, &language)?;

    Ok(())
}

async fn download_file(url: &str, dest_path: &Path) -> anyhow::Result<PathBuf> {
    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        bail!("Download failed with status: {}", response.status());
    }

    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent)
            .await
            .context("Failed to create download directory")?;
    }

    let bytes = response.bytes().await.context("Failed to read response")?;
    log::debug!("Downloaded {} bytes from {}", bytes.len(), url);

    let mut file = fs::File::create(dest_path)
        .await
        .with_context(|| format!("Failed to create {}", dest_path.display()))?;
    file.write_all(&bytes).await?;
    file.flush().await?;

    Ok(dest_path.to_path_buf())
}

async fn extract_zip(zip_path: &Path, extract_dir: &Path) -> anyhow::Result<()> {
    let output = Command::new("unzip")
        .args(["-o", "-q"])
        .arg(zip_path)
        .arg("-d")
        .arg(extract_dir)
        .output()
        .await
        .context("Failed to run unzip")?;

    if !output.status.success() {
        bail!(
            "Failed to extract {}: {}",
            zip_path.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(())
}

async fn copy_dir(source: &Path, dest: &Path) -> anyhow::Result<()> {
    let output = Command::new("cp")
        .arg("-R")
        .arg(source)
        .arg(dest)
        .output()
        .await
        .context("Failed to run cp")?;

    if !output.status.success() {
        bail!(
            "Failed to copy {} to {}: {}",
            source.display(),
            dest.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::TerminalPrompt;
    use lean_store::LeanDirs;

    fn fake_repository(root: &Path) -> PathBuf {
        let repository = root.join(ARCHIVE_ROOT);
        std::fs::create_dir_all(repository.join("Data").join("equity").join("usa")).unwrap();
        std::fs::write(
            repository.join("Data").join("equity").join("usa").join("spy.csv"),
            "1,2,3",
        )
        .unwrap();
        std::fs::create_dir_all(repository.join("Launcher")).unwrap();
        std::fs::write(
            repository.join("Launcher").join("config.json"),
            "{\n  // top\n\n  \"environment\": \"backtesting\",\n\n  \"data-folder\": \"../../../Data/\",\n\n  \"log-handler\": \"ConsoleLogHandler\"\n}",
        )
        .unwrap();
        repository
    }

    #[test]
    fn project_config_points_at_local_data() {
        let config = project_lean_config(
            "{\n\n  \"environment\": \"backtesting\",\n\n  \"data-folder\": \"../../../Data/\"\n}",
        );

        assert_eq!(config, "{\n\n  \"data-folder\": \"data\"\n}");
    }

    #[test]
    fn refuses_existing_project() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_LEAN_CONFIG_FILE_NAME), "{}").unwrap();

        let err = ensure_can_bootstrap(dir.path()).unwrap_err();
        assert!(err.to_string().starts_with("lean.json already exists"));
    }

    #[tokio::test]
    async fn bootstraps_from_extracted_repository() {
        let download = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        let repository = fake_repository(download.path());

        bootstrap_from(&repository, project.path()).await.unwrap();

        let data = project.path().join("data").join("equity").join("usa").join("spy.csv");
        assert_eq!(std::fs::read_to_string(data).unwrap(), "1,2,3");

        let config = std::fs::read_to_string(project.path().join("lean.json")).unwrap();
        assert!(!config.contains("environment"));
        assert!(config.contains("\"data-folder\": \"data\""));

        for (location, content) in PROJECT_FILES {
            assert_eq!(std::fs::read_to_string(project.path().join(location)).unwrap(), content);
        }
    }

    #[tokio::test]
    async fn empty_dir_detection() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_empty_dir(dir.path()).await.unwrap());

        std::fs::write(dir.path().join("README.md"), "").unwrap();
        assert!(!is_empty_dir(dir.path()).await.unwrap());
    }

    #[test]
    fn default_language_is_asked_once() {
        let home = tempfile::tempdir().unwrap();
        let mut container = Container::new(LeanDirs::at(home.path()), home.path()).unwrap();

        let mut prompt = TerminalPrompt::new("Python\n".as_bytes(), Vec::new());
        ask_default_language(&mut container.cli_config, &mut prompt).unwrap();
        assert_eq!(container.cli_config.default_language().as_deref(), Some("python"));

        // No input left: a second prompt would fail
        let mut prompt = TerminalPrompt::new("".as_bytes(), Vec::new());
        ask_default_language(&mut container.cli_config, &mut prompt).unwrap();
    }

    #[tokio::test]
    async fn declining_confirmation_aborts_before_download() {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        std::fs::write(project.path().join("notes.txt"), "").unwrap();

        let mut container = Container::new(LeanDirs::at(home.path()), project.path()).unwrap();
        let mut prompt = TerminalPrompt::new("n\n".as_bytes(), Vec::new());

        let err = run(&mut container, &mut prompt).await.unwrap_err();

        assert_eq!(err.to_string(), "Aborted!");
        assert!(!container.dirs.cache_dir().exists());
    }
}
