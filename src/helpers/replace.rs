use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{info, warn};

pub const REPLACE_OLD_FLAG: &str = "--replace-old";

/// How long to wait before deleting the superseded executable, so the OS has
/// released any locks the exiting process still held on it.
const OLD_EXE_LOCK_GRACE: Duration = Duration::from_secs(1);

/// Splits a `--replace-old <path>` request out of the raw argument list.
///
/// Returns the arguments with the flag and its value removed, plus the path of
/// the executable to delete when the flag was present. A trailing flag with no
/// value is dropped and treated as absent.
///
/// # Example
///
/// ```rust
/// let args = vec!["app".into(), "--replace-old".into(), "/tmp/old".into()];
/// let (rest, old) = extract_replace_request(&args);
/// assert_eq!(rest, vec!["app".to_string()]);
/// assert_eq!(old, Some(std::path::PathBuf::from("/tmp/old")));
/// ```
pub fn extract_replace_request(args: &[String]) -> (Vec<String>, Option<PathBuf>) {
    let Some(index) = args.iter().position(|arg| arg == REPLACE_OLD_FLAG) else {
        return (args.to_vec(), None);
    };

    let old_path = args.get(index + 1).map(PathBuf::from);
    let mut rest = args.to_vec();
    rest.drain(index..(index + 2).min(rest.len()));

    (rest, old_path)
}

/// Deletes the executable this process replaced. Failure to delete is logged
/// and swallowed: a stale binary on disk must never stop the new version from
/// starting.
pub async fn delete_old_executable(path: &Path) {
    tokio::time::sleep(OLD_EXE_LOCK_GRACE).await;

    match fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => match fs::remove_file(path).await {
            Ok(()) => info!("Removed previous executable {}", path.display()),
            Err(error) => warn!(
                "Could not remove previous executable {}: {error}",
                path.display()
            ),
        },
        _ => (),
    }
}

/// File name the replacement binary is downloaded under: the current
/// executable's name with `_new` appended before the extension. Joined with
/// the install directory by the update handler.
pub fn replacement_name(current_exe: &Path) -> String {
    let stem = current_exe
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "alpha-updater".to_string());

    let mut name = format!("{stem}_new");
    if let Some(extension) = current_exe.extension() {
        name.push('.');
        name.push_str(&extension.to_string_lossy());
    }

    name
}
