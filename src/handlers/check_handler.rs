use anyhow::Result;
use reqwest::Client;
use tracing::info;
use yansi::Paint;

use super::CheckResult;
use crate::config::Config;
use crate::consts::DEFAULT_MANIFEST_URL;
use crate::helpers::version::is_remote_newer;
use crate::manifest::fetch_update_info;

/// Stringified version this binary was built with, the baseline every check
/// compares against.
pub fn current_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Fetches the hosted manifest and decides whether it supersedes the running
/// binary. Shared by `check` and `update`.
///
/// # Arguments
///
/// * `client` - The HTTP client to be used for network requests.
/// * `config` - The configuration, consulted for a `manifest_url` override.
///
/// # Returns
///
/// * `Result<CheckResult>` - Whether an update is available, carrying the
///   manifest when one is. Errors when the manifest cannot be fetched or parsed.
pub async fn run(client: &Client, config: &Config) -> Result<CheckResult> {
    let manifest_url = config
        .manifest_url
        .as_deref()
        .unwrap_or(DEFAULT_MANIFEST_URL);

    info!("Checking {manifest_url}");
    let update_info = fetch_update_info(client, manifest_url).await?;

    let current = current_version();
    if is_remote_newer(&current, &update_info.version) {
        Ok(CheckResult::UpdateAvailable {
            current,
            info: update_info,
        })
    } else {
        Ok(CheckResult::UpToDate { current })
    }
}

/// Starts the check process and reports the outcome.
pub async fn start(client: &Client, config: Config) -> Result<()> {
    match run(client, &config).await? {
        CheckResult::UpToDate { current } => {
            info!("You already have the latest version ({current})");
        }
        CheckResult::UpdateAvailable { current, info } => {
            println!(
                "Version {} is available, you have {}",
                Paint::green(&info.version).bold(),
                Paint::yellow(&current)
            );
            println!("Run `alpha-updater update` to install it");
        }
    }

    Ok(())
}
