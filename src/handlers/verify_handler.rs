use anyhow::{Result, anyhow};
use reqwest::Client;
use std::path::PathBuf;
use tracing::{info, warn};
use yansi::Paint;

use crate::config::Config;
use crate::consts::{DEFAULT_MANIFEST_URL, DEFAULT_REPOSITORY};
use crate::github_requests::{GithubRelease, get_release_by_tag};
use crate::helpers::version;
use crate::manifest::{UpdateInfo, fetch_update_info};

/// Starts the verify process: checks that a manifest is internally consistent
/// and matches the release it points at.
///
/// # Arguments
///
/// * `manifest` - A local manifest path; when absent the hosted manifest is
///   fetched instead.
/// * `client` - The HTTP client to be used for network requests.
/// * `config` - The configuration, consulted for the manifest URL and repository.
///
/// # Behavior
///
/// The manifest is first checked on its own: the version must parse as semver
/// and the download URL must embed the release tag. Then the release for tag
/// `v{version}` is looked up; it must exist, carry exactly one asset, and that
/// asset's download URL must equal the manifest's. When the release API cannot
/// be reached the local checks still count, with a warning that the release
/// side went unchecked.
///
/// # Errors
///
/// Returns an error listing every problem found, so a maintainer fixes them
/// in one pass rather than one per run.
pub async fn start(manifest: Option<PathBuf>, client: &Client, config: Config) -> Result<()> {
    let update_info = match &manifest {
        Some(path) => UpdateInfo::read(path).await?,
        None => {
            let url = config
                .manifest_url
                .as_deref()
                .unwrap_or(DEFAULT_MANIFEST_URL);
            info!("Verifying hosted manifest {url}");
            fetch_update_info(client, url).await?
        }
    };

    let mut problems = consistency_problems(&update_info);

    let repository = config.repository.as_deref().unwrap_or(DEFAULT_REPOSITORY);
    let tag = update_info.tag_name();
    match get_release_by_tag(client, repository, &tag).await {
        Ok(release) => problems.extend(release_problems(&update_info, &release)),
        Err(error) => warn!("Could not check release {tag} on {repository}: {error}"),
    }

    if problems.is_empty() {
        println!(
            "{} manifest for {} is consistent",
            Paint::green("OK").bold(),
            tag
        );
        return Ok(());
    }

    for problem in &problems {
        println!("{} {problem}", Paint::red("PROBLEM").bold());
    }

    Err(anyhow!("Found {} problem(s) in the manifest", problems.len()))
}

/// Checks the manifest against nothing but itself and the tag convention.
fn consistency_problems(info: &UpdateInfo) -> Vec<String> {
    let mut problems = Vec::new();

    if let Err(error) = version::parse_lenient(&info.version) {
        problems.push(format!("version does not parse: {error}"));
    }

    if info.download_url.is_empty() {
        problems.push("download_url is empty".to_string());
    } else if !info
        .download_url
        .contains(&format!("/{}/", info.tag_name()))
    {
        problems.push(format!(
            "download_url does not point at the {} release: {}",
            info.tag_name(),
            info.download_url
        ));
    }

    problems
}

/// Checks the manifest against the release it claims to describe.
fn release_problems(info: &UpdateInfo, release: &GithubRelease) -> Vec<String> {
    let mut problems = Vec::new();

    match release.assets.len() {
        0 => problems.push(format!("release {} has no assets", release.tag_name)),
        1 => {
            let asset = &release.assets[0];
            if asset.browser_download_url != info.download_url {
                problems.push(format!(
                    "download_url does not match the release asset: manifest has {}, release has {}",
                    info.download_url, asset.browser_download_url
                ));
            }
        }
        count => problems.push(format!(
            "release {} has {count} assets, expected exactly one",
            release.tag_name
        )),
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github_requests::ReleaseAsset;
    use chrono::Utc;

    fn manifest(version: &str, url: &str) -> UpdateInfo {
        UpdateInfo {
            version: version.to_string(),
            download_url: url.to_string(),
            sha256: None,
            published_at: None,
        }
    }

    fn release(tag: &str, urls: &[&str]) -> GithubRelease {
        GithubRelease {
            tag_name: tag.to_string(),
            published_at: Utc::now(),
            assets: urls
                .iter()
                .map(|url| ReleaseAsset {
                    name: "AlphaAnalysisApp.exe".to_string(),
                    browser_download_url: url.to_string(),
                    size: 1024,
                })
                .collect(),
        }
    }

    const GOOD_URL: &str =
        "https://github.com/EthanTEC/Dual-Frequency-Alpha/releases/download/v1.2.3/AlphaAnalysisApp.exe";

    #[test]
    fn consistent_manifest_has_no_problems() {
        assert!(consistency_problems(&manifest("1.2.3", GOOD_URL)).is_empty());
    }

    #[test]
    fn flags_bad_version_and_stale_url() {
        let problems = consistency_problems(&manifest(
            "1.2.4",
            "https://github.com/EthanTEC/Dual-Frequency-Alpha/releases/download/v1.2.3/AlphaAnalysisApp.exe",
        ));
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("v1.2.4"));

        let problems = consistency_problems(&manifest("latest", ""));
        assert_eq!(problems.len(), 2);
    }

    #[test]
    fn matching_release_has_no_problems() {
        let info = manifest("1.2.3", GOOD_URL);
        let release = release("v1.2.3", &[GOOD_URL]);
        assert!(release_problems(&info, &release).is_empty());
    }

    #[test]
    fn flags_asset_count_violations() {
        let info = manifest("1.2.3", GOOD_URL);

        let empty = release("v1.2.3", &[]);
        assert_eq!(release_problems(&info, &empty).len(), 1);

        let crowded = release("v1.2.3", &[GOOD_URL, "https://example.com/extra.zip"]);
        let problems = release_problems(&info, &crowded);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("expected exactly one"));
    }

    #[test]
    fn flags_url_drift_against_release() {
        let info = manifest("1.2.3", GOOD_URL);
        let moved = release(
            "v1.2.3",
            &["https://github.com/EthanTEC/Dual-Frequency-Alpha/releases/download/v1.2.3/AlphaApp.exe"],
        );

        let problems = release_problems(&info, &moved);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("does not match the release asset"));
    }
}
