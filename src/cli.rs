use crate::{
    config::Config,
    handlers::{check_handler, publish_handler, update_handler, verify_handler},
};
use anyhow::Result;
use clap::{Args, CommandFactory, Parser};
use clap_complete::Shell;
use reqwest::{Client, Error};
use std::path::PathBuf;

fn create_reqwest_client() -> Result<Client, Error> {
    // fetch env variable
    let github_token = match std::env::var("GITHUB_TOKEN") {
        Ok(token) => token,
        Err(_) => String::new(),
    };

    let mut headers = reqwest::header::HeaderMap::new();
    if !github_token.is_empty() {
        let auth_header_value =
            reqwest::header::HeaderValue::from_str(&format!("Bearer {}", github_token))
                .expect("Invalid header value");
        headers.insert(reqwest::header::AUTHORIZATION, auth_header_value);
    }

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .build()?;

    Ok(client)
}

#[derive(Debug, Parser)]
#[command(version)]
enum Cli {
    /// Check the hosted manifest and report whether a newer version exists
    Check,

    /// Download the latest version and hand over to it
    Update {
        /// Do not ask for confirmation before downloading
        #[arg(short, long)]
        yes: bool,
    },

    /// Write a fresh update_info.json for a tagged release
    Publish(Publish),

    /// Check that a manifest matches the release it points at
    Verify {
        /// Verify a local manifest file instead of the hosted one
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },

    /// Generate shell completion
    Complete {
        /// Shell to generate completion for
        shell: Shell,
    },
}

#[derive(Args, Debug)]
pub struct Publish {
    /// Version being released, with or without the `v` prefix
    pub version: String,

    /// Full asset URL, overriding the one derived from the release tag
    #[arg(short, long)]
    pub download_url: Option<String>,

    /// Asset file name used when deriving the URL from the release tag
    #[arg(short, long, conflicts_with = "download_url")]
    pub asset: Option<String>,

    /// Local build artifact whose SHA-256 is stamped into the manifest
    #[arg(short, long)]
    pub checksum: Option<PathBuf>,

    /// Where to write the manifest (defaults to ./update_info.json)
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,
}

pub async fn start(config: Config, args: Vec<String>) -> Result<()> {
    let client = create_reqwest_client()?;
    let cli = Cli::parse_from(args);

    match cli {
        Cli::Check => check_handler::start(&client, config).await?,
        Cli::Update { yes } => update_handler::start(yes, &client, config).await?,
        Cli::Publish(data) => publish_handler::start(data, config).await?,
        Cli::Verify { manifest } => verify_handler::start(manifest, &client, config).await?,
        Cli::Complete { shell } => clap_complete::generate(
            shell,
            &mut Cli::command(),
            "alpha-updater",
            &mut std::io::stdout(),
        ),
    }

    Ok(())
}
