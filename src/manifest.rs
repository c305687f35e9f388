use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;

/// Timeout for fetching the manifest itself. The document is a few hundred
/// bytes, so anything slower means the host is unreachable.
const MANIFEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The `update_info.json` record a client polls to learn about new releases.
///
/// `version` is stored without the `v` prefix; the release tag is always
/// `v{version}`. Older manifests spelled the asset location `patch_url`, which
/// is accepted as an alias on the way in but always written as `download_url`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateInfo {
    pub version: String,
    #[serde(alias = "patch_url")]
    pub download_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl UpdateInfo {
    /// Tag name of the release this manifest describes.
    pub fn tag_name(&self) -> String {
        format!("v{}", self.version.trim_start_matches('v'))
    }

    pub async fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .context(format!("Could not read manifest {}", path.display()))?;

        serde_json::from_str(&contents)
            .context(format!("Manifest {} is not valid JSON", path.display()))
    }

    /// Writes the manifest as pretty-printed JSON, the shape maintainers are
    /// used to editing by hand.
    pub async fn write(&self, path: &Path) -> Result<()> {
        let mut contents = serde_json::to_string_pretty(self)?;
        contents.push('\n');

        fs::write(path, contents)
            .await
            .context(format!("Could not write manifest {}", path.display()))
    }
}

/// Fetches and parses the hosted manifest.
pub async fn fetch_update_info(client: &Client, url: &str) -> Result<UpdateInfo> {
    let response = client
        .get(url)
        .header("user-agent", "alpha-updater")
        .timeout(MANIFEST_TIMEOUT)
        .send()
        .await
        .context("Could not reach the update server")?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "Update server answered {} for {url}",
            response.status()
        ));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).context("The update manifest is not valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_manifest() {
        let info: UpdateInfo = serde_json::from_str(
            r#"{"version": "1.2.3", "download_url": "https://example.com/AlphaAnalysisApp.exe"}"#,
        )
        .unwrap();

        assert_eq!(info.version, "1.2.3");
        assert_eq!(info.download_url, "https://example.com/AlphaAnalysisApp.exe");
        assert!(info.sha256.is_none());
        assert!(info.published_at.is_none());
    }

    #[test]
    fn accepts_legacy_patch_url_key() {
        let info: UpdateInfo = serde_json::from_str(
            r#"{"version": "0.9.0", "patch_url": "https://example.com/patch.exe"}"#,
        )
        .unwrap();

        assert_eq!(info.download_url, "https://example.com/patch.exe");
    }

    #[test]
    fn rejects_manifest_without_url() {
        let result: Result<UpdateInfo, _> = serde_json::from_str(r#"{"version": "1.0.0"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn tag_name_never_doubles_the_prefix() {
        let mut info: UpdateInfo =
            serde_json::from_str(r#"{"version": "1.2.3", "download_url": "u"}"#).unwrap();
        assert_eq!(info.tag_name(), "v1.2.3");

        info.version = "v1.2.3".to_string();
        assert_eq!(info.tag_name(), "v1.2.3");
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let info: UpdateInfo =
            serde_json::from_str(r#"{"version": "1.2.3", "download_url": "u"}"#).unwrap();
        let rendered = serde_json::to_string(&info).unwrap();

        assert!(!rendered.contains("sha256"));
        assert!(!rendered.contains("published_at"));
    }

    #[tokio::test]
    async fn roundtrips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("update_info.json");

        let info: UpdateInfo = serde_json::from_str(
            r#"{"version": "2.0.0", "download_url": "https://example.com/a.exe", "sha256": "aa"}"#,
        )
        .unwrap();

        info.write(&path).await.unwrap();
        let read_back = UpdateInfo::read(&path).await.unwrap();

        assert_eq!(read_back.version, "2.0.0");
        assert_eq!(read_back.sha256.as_deref(), Some("aa"));
    }
}
