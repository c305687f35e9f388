use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;

pub fn get_home_dir() -> Result<PathBuf> {
    if cfg!(windows) {
        let home_str = std::env::var("USERPROFILE")?;
        return Ok(PathBuf::from(home_str));
    }

    let mut home_str = "/home/".to_string();
    if let Ok(value) = std::env::var("SUDO_USER") {
        home_str.push_str(&value);

        return Ok(PathBuf::from(home_str));
    }

    let env_value = std::env::var("USER")?;
    home_str.push_str(&env_value);

    Ok(PathBuf::from(home_str))
}

pub fn get_config_file() -> Result<PathBuf> {
    let mut home_dir = get_home_dir()?;

    if cfg!(target_os = "macos") {
        home_dir.push("Library/Application Support");
    } else if cfg!(windows) {
        home_dir.push("AppData/Roaming");
    } else {
        home_dir.push(".config");
    }

    home_dir.push("alpha-updater/config.json");

    Ok(home_dir)
}

/// Path of the executable this process is running from. The replacement dance
/// only makes sense when this can be resolved.
pub fn get_current_exe() -> Result<PathBuf> {
    std::env::current_exe().context("Could not determine the current executable path")
}

/// Directory the running executable lives in, which is where the replacement
/// binary is downloaded to.
pub fn get_install_dir() -> Result<PathBuf> {
    let exe = get_current_exe()?;
    exe.parent()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("The current executable has no parent directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_dir_contains_current_exe() {
        let exe = get_current_exe().unwrap();
        let dir = get_install_dir().unwrap();
        assert!(exe.starts_with(&dir));
    }

    #[test]
    fn config_file_is_under_home() {
        let config = get_config_file().unwrap();
        assert!(config.ends_with("alpha-updater/config.json"));
    }
}
