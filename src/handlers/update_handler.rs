use anyhow::{Result, anyhow};
use dialoguer::Confirm;
use futures_util::stream::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::cmp::min;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use super::{CheckResult, check_handler};
use crate::config::Config;
use crate::helpers::{checksum, directories, processes, replace};
use crate::manifest::UpdateInfo;

/// Starts the update process: check, confirm, download, verify, hand off.
///
/// # Arguments
///
/// * `assume_yes` - Skips the confirmation prompt when true.
/// * `client` - The HTTP client to be used for network requests.
/// * `config` - The configuration settings.
///
/// # Behavior
///
/// When the manifest does not supersede the running binary, the function logs
/// that and returns. Otherwise it downloads the release asset next to the
/// current executable as `<name>_new`, verifies the manifest checksum when one
/// is present, launches the new binary with `--replace-old <current>` and exits
/// this process, leaving the new version to delete the superseded file.
///
/// # Errors
///
/// This function will return an error if the manifest cannot be fetched, the
/// current executable path cannot be resolved, the download fails, or the
/// downloaded file does not match the manifest checksum.
pub async fn start(assume_yes: bool, client: &Client, config: Config) -> Result<()> {
    let info = match check_handler::run(client, &config).await? {
        CheckResult::UpToDate { current } => {
            info!("You already have the latest version ({current})");
            return Ok(());
        }
        CheckResult::UpdateAvailable { current, info } => {
            info!(
                "Version {} is available, you have {current}",
                info.version
            );
            info
        }
    };

    let skip_prompt = assume_yes || config.skip_update_prompt.unwrap_or(false);
    if !skip_prompt {
        let confirmed = Confirm::new()
            .with_prompt(format!("Download and install version {} now?", info.version))
            .default(true)
            .interact()?;

        if !confirmed {
            info!("Update cancelled");
            return Ok(());
        }
    }

    let current_exe = directories::get_current_exe()?;
    let exe_stem = current_exe
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("The current executable has no file name"))?;

    if processes::is_other_instance_running(&exe_stem) {
        warn!("Another instance of {exe_stem} appears to be running, it will keep the old version until restarted");
    }

    let install_dir = directories::get_install_dir()?;
    let new_exe = install_dir.join(replace::replacement_name(&current_exe));
    download_asset(client, &info, &new_exe).await?;

    if let Some(expected) = &info.sha256 {
        enforce_checksum(&new_exe, expected).await?;
        info!("Checksum verified");
    }

    cfg_if::cfg_if! {
        if #[cfg(unix)] {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = tokio::fs::metadata(&new_exe).await?.permissions();
            perms.set_mode(0o755);
            tokio::fs::set_permissions(&new_exe, perms).await?;
        }
    }

    processes::spawn_replacement(&new_exe, &current_exe)?;
    info!(
        "Handing over to version {}, this process will now exit",
        info.version
    );

    std::process::exit(0);
}

async fn download_asset(client: &Client, info: &UpdateInfo, destination: &Path) -> Result<()> {
    let response = client
        .get(&info.download_url)
        .header("user-agent", "alpha-updater")
        .send()
        .await?;

    if response.status() != 200 {
        return Err(anyhow!(
            "Could not download the new version, server answered {} for {}",
            response.status(),
            info.download_url
        ));
    }

    let total_size = response.content_length().unwrap_or(0);
    let mut response_bytes = response.bytes_stream();

    // Progress Bar Setup
    let pb = ProgressBar::new(total_size);
    pb.set_style(ProgressStyle::default_bar()
        .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")?
        .progress_chars("█  "));
    pb.set_message(format!("Downloading version {}", info.version));

    let mut file = File::create(destination).await?;
    let mut downloaded: u64 = 0;

    while let Some(item) = response_bytes.next().await {
        let chunk = match item {
            Ok(chunk) => chunk,
            Err(error) => {
                discard_partial(file, destination).await;
                return Err(anyhow!("Download was interrupted: {error}"));
            }
        };

        if let Err(error) = file.write_all(&chunk).await {
            discard_partial(file, destination).await;
            return Err(anyhow!("Could not write the download to disk: {error}"));
        }
        downloaded += chunk.len() as u64;
        if total_size > 0 {
            downloaded = min(downloaded, total_size);
        }
        pb.set_position(downloaded);
    }

    file.flush().await?;
    pb.finish_with_message(format!(
        "Downloaded version {} to {}",
        info.version,
        destination.display()
    ));

    Ok(())
}

/// Fails the update when the download does not match the manifest digest,
/// deleting the file so a corrupted binary never gets handed over to.
async fn enforce_checksum(path: &Path, expected: &str) -> Result<()> {
    if checksum::sha256_matches(path, expected)? {
        return Ok(());
    }

    tokio::fs::remove_file(path).await?;
    Err(anyhow!(
        "Downloaded file does not match the checksum in the manifest"
    ))
}

/// Drops the half-written download and removes it from disk. The handle must
/// be closed first so the delete works on Windows too.
async fn discard_partial(file: File, destination: &Path) {
    drop(file);
    let _ = tokio::fs::remove_file(destination).await;
}
