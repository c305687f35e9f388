use regex::Regex;
use std::sync::LazyLock;

/// Raw-content URL of the hosted manifest, used when the config file does not
/// override `manifest_url`.
pub const DEFAULT_MANIFEST_URL: &str =
    "https://raw.githubusercontent.com/EthanTEC/Dual-Frequency-Alpha/main/Python/update_info.json";

/// Repository the release assets are published under, in `owner/name` form.
pub const DEFAULT_REPOSITORY: &str = "EthanTEC/Dual-Frequency-Alpha";

/// Name of the single binary asset attached to each tagged release.
#[cfg(target_family = "windows")]
pub const DEFAULT_ASSET_NAME: &str = "AlphaAnalysisApp.exe";

/// Name of the single binary asset attached to each tagged release.
#[cfg(target_family = "unix")]
pub const DEFAULT_ASSET_NAME: &str = "AlphaAnalysisApp";

/// Environment variable regex to match environment variables in the format `$VAR_NAME`.
/// Used to match user configuration variables and substitute them with their actual
/// values from the host environment.
///
/// # Example
///
/// ```rust
/// let var = std::env::var("HOME").unwrap_or_else(|_| "/home/user".to_string());
/// assert!(ENVIRONMENT_VAR_REGEX.is_match(&format!("$HOME={}", var)));
/// ```
pub static ENVIRONMENT_VAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Z_]+)").expect("Failed to compile static ENVIRONMENT_VAR_REGEX")
});
