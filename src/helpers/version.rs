use anyhow::{Context, Result};
use semver::Version;

/// Parses a version string, tolerating the `v` tag prefix used by releases.
///
/// # Arguments
///
/// * `version` - The version string, with or without a leading `v`.
///
/// # Returns
///
/// * `Result<Version>` - The parsed semantic version, or an error if the string
///   is not valid semver once the prefix is stripped.
///
/// # Example
///
/// ```rust
/// let version = parse_lenient("v1.2.3")?;
/// assert_eq!(version, semver::Version::new(1, 2, 3));
/// ```
pub fn parse_lenient(version: &str) -> Result<Version> {
    let trimmed = version.trim().trim_start_matches('v');
    Version::parse(trimmed).context(format!("\"{version}\" is not a valid version string"))
}

/// Decides whether the version advertised by the manifest supersedes the one
/// this binary was built with.
///
/// When both strings parse as semver the comparison is numeric. When either
/// does not, only exact string equality counts as up to date, so a manifest
/// with an unconventional version still triggers an update offer.
pub fn is_remote_newer(current: &str, remote: &str) -> bool {
    match (parse_lenient(current), parse_lenient(remote)) {
        (Ok(current), Ok(remote)) => remote > current,
        _ => current.trim() != remote.trim(),
    }
}
