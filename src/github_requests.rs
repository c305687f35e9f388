use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GithubRelease {
    pub tag_name: String,
    pub published_at: DateTime<Utc>,
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
    pub size: u64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub documentation_url: String,
}

pub async fn make_github_request<T: AsRef<str> + reqwest::IntoUrl>(
    client: &Client,
    url: T,
) -> Result<String> {
    let response = client
        .get(url)
        .header("user-agent", "alpha-updater")
        .header("Accept", "application/vnd.github.v3+json")
        .send()
        .await?
        .text()
        .await?;

    Ok(response)
}

/// Fetches the release published under the given tag, e.g. `v1.2.3`.
pub async fn get_release_by_tag(
    client: &Client,
    repository: &str,
    tag: &str,
) -> Result<GithubRelease> {
    let response = make_github_request(
        client,
        format!("https://api.github.com/repos/{repository}/releases/tags/{tag}"),
    )
    .await?;

    deserialize_response(response)
}

pub fn deserialize_response<T: DeserializeOwned>(response: String) -> Result<T> {
    let value: serde_json::Value = serde_json::from_str(&response)?;

    if value.get("message").is_some() {
        let result: ErrorResponse = serde_json::from_value(value)?;

        if result.documentation_url.contains("rate-limiting") {
            return Err(anyhow!(
                "Github API rate limit has been reached, either wait an hour or set the GITHUB_TOKEN environment variable"
            ));
        }

        return Err(anyhow!(result.message));
    }

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_release_with_single_asset() {
        let response = r#"{
            "tag_name": "v1.2.3",
            "published_at": "2026-01-15T12:00:00Z",
            "assets": [{
                "name": "AlphaAnalysisApp.exe",
                "browser_download_url": "https://github.com/EthanTEC/Dual-Frequency-Alpha/releases/download/v1.2.3/AlphaAnalysisApp.exe",
                "size": 41943040
            }]
        }"#;

        let release: GithubRelease = deserialize_response(response.to_string()).unwrap();
        assert_eq!(release.tag_name, "v1.2.3");
        assert_eq!(release.assets.len(), 1);
        assert_eq!(release.assets[0].name, "AlphaAnalysisApp.exe");
    }

    #[test]
    fn surfaces_github_error_message() {
        let response = r#"{"message": "Not Found", "documentation_url": "https://docs.github.com/rest"}"#;

        let result: Result<GithubRelease> = deserialize_response(response.to_string());
        assert_eq!(result.unwrap_err().to_string(), "Not Found");
    }

    #[test]
    fn detects_rate_limiting() {
        let response = r#"{"message": "API rate limit exceeded", "documentation_url": "https://docs.github.com/rest/overview/rate-limiting"}"#;

        let result: Result<GithubRelease> = deserialize_response(response.to_string());
        assert!(result.unwrap_err().to_string().contains("rate limit"));
    }
}
