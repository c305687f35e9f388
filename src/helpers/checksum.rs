use anyhow::Result;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::{fs, io};

/// Computes the SHA-256 digest of the file at `path` as a lowercase hex string.
///
/// # Arguments
///
/// * `path` - A reference to a `&Path` object representing the file to hash.
///
/// # Returns
///
/// This function returns a `Result` containing the hex digest, or `Err(error)`
/// if the file cannot be opened or read.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut file = fs::File::open(path)?;
    io::copy(&mut file, &mut hasher)?;

    let hash = hasher.finalize();
    Ok(format!("{hash:x}"))
}

/// Checks whether the file at `path` matches the digest recorded in the
/// manifest. The comparison is case-insensitive since maintainers paste
/// digests from a variety of tools.
pub fn sha256_matches(path: &Path, expected: &str) -> Result<bool> {
    let hash = sha256_file(path)?;
    Ok(hash.eq_ignore_ascii_case(expected.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // sha256 of the ASCII string "alpha"
    const ALPHA_DIGEST: &str = "8ed3f6ad685b959ead7022518e1af76cd816f8e8ec7ccdda1ed4018e8f2223f8";

    #[test]
    fn hashes_known_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"alpha").unwrap();

        let hash = sha256_file(file.path()).unwrap();
        assert_eq!(hash, ALPHA_DIGEST);
    }

    #[test]
    fn matches_ignores_case_and_whitespace() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"alpha").unwrap();

        assert!(sha256_matches(file.path(), &ALPHA_DIGEST.to_uppercase()).unwrap());
        assert!(sha256_matches(file.path(), &format!(" {ALPHA_DIGEST}\n")).unwrap());
        assert!(!sha256_matches(file.path(), "deadbeef").unwrap());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(sha256_file(Path::new("/definitely/not/here")).is_err());
    }
}
