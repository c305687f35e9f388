use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use tokio::fs;

use crate::consts::ENVIRONMENT_VAR_REGEX;

/// User configuration, read from `alpha-updater/config.json` in the platform
/// config directory. Every field is optional; a missing file means defaults.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Config {
    /// Overrides the built-in manifest URL, for testing against a staging copy.
    pub manifest_url: Option<String>,
    /// Repository the releases live under, in `owner/name` form.
    pub repository: Option<String>,
    /// Alternative host serving the release downloads.
    pub github_mirror: Option<String>,
    /// When true, `update` never asks for confirmation before downloading.
    pub skip_update_prompt: Option<bool>,
}

pub async fn handle_config() -> Result<Config> {
    let config_file = crate::helpers::directories::get_config_file()?;
    let config = match fs::read_to_string(config_file).await {
        Ok(config) => {
            let mut config: Config = serde_json::from_str(&config)?;
            handle_envars(&mut config)?;
            config
        }
        Err(_) => Config::default(),
    };

    Ok(config)
}

fn handle_envars(config: &mut Config) -> Result<()> {
    let re = &ENVIRONMENT_VAR_REGEX;

    handle_envar(&mut config.manifest_url, re)?;

    handle_envar(&mut config.repository, re)?;

    handle_envar(&mut config.github_mirror, re)?;

    Ok(())
}

fn handle_envar(item: &mut Option<String>, re: &Regex) -> Result<()> {
    let value = if let Some(value) = item.as_ref() {
        value
    } else {
        return Ok(());
    };

    if re.is_match(value) {
        let extract = re.captures(value).unwrap().get(1).unwrap().as_str();
        let var =
            env::var(extract).unwrap_or(format!("Couldn't find {extract} environment variable"));

        *item = Some(value.replace(&format!("${extract}"), &var))
    }

    Ok(())
}
