use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;
use tracing::info;

use crate::cli::Publish;
use crate::config::Config;
use crate::consts::{DEFAULT_ASSET_NAME, DEFAULT_REPOSITORY};
use crate::helpers::{checksum, version};
use crate::manifest::UpdateInfo;

/// Starts the publish process: renders a fresh `update_info.json` for a tagged
/// release and writes it to disk.
///
/// # Arguments
///
/// * `data` - The publish arguments: version, optional explicit download URL,
///   asset name, checksum source and output path.
/// * `config` - The configuration, consulted for the repository and mirror.
///
/// # Behavior
///
/// The version must parse as semver; the manifest stores it without the tag
/// prefix. When no explicit download URL is given, one is derived from the
/// release convention `{host}/{repository}/releases/download/v{version}/{asset}`.
/// With `--checksum <file>` the SHA-256 of a local build artifact is stamped
/// into the manifest. The written file is read back before reporting success,
/// so a manifest that cannot be parsed again never goes unnoticed.
pub async fn start(data: Publish, config: Config) -> Result<()> {
    let parsed = version::parse_lenient(&data.version)?;
    let version = parsed.to_string();

    let download_url = match data.download_url {
        Some(url) => url,
        None => {
            let asset = data.asset.as_deref().unwrap_or(DEFAULT_ASSET_NAME);
            derive_download_url(&config, &version, asset)
        }
    };

    let sha256 = match &data.checksum {
        Some(artifact) => Some(checksum::sha256_file(artifact)?),
        None => None,
    };

    let update_info = UpdateInfo {
        version,
        download_url,
        sha256,
        published_at: Some(Utc::now()),
    };

    let path = data
        .manifest
        .unwrap_or_else(|| PathBuf::from("update_info.json"));

    update_info.write(&path).await?;

    // Read back what was written so a serialization problem surfaces here,
    // not on the first client poll.
    let written = UpdateInfo::read(&path).await?;
    info!(
        "Wrote manifest for {} ({}) to {}",
        written.tag_name(),
        written.download_url,
        path.display()
    );

    Ok(())
}

/// Derives the asset URL from the one-asset-per-tagged-release convention.
pub fn derive_download_url(config: &Config, version: &str, asset: &str) -> String {
    let host = config
        .github_mirror
        .as_deref()
        .map(|mirror| mirror.trim_end_matches('/').to_string())
        .unwrap_or_else(|| "https://github.com".to_string());
    let repository = config.repository.as_deref().unwrap_or(DEFAULT_REPOSITORY);

    format!("{host}/{repository}/releases/download/v{version}/{asset}")
}
