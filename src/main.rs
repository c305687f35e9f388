mod cli;
mod config;
mod consts;
pub mod github_requests;
mod handlers;
mod helpers;
mod manifest;

use anyhow::Result;
use std::{env, process::exit};
use tracing::{Level, error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let collector = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(collector)?;
    if let Err(error) = run().await {
        error!("Error: {error}");
        exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    // A freshly installed binary is launched with `--replace-old <path>` so it
    // can delete the version it replaced once the old process has exited.
    let (rest_args, old_exe) = helpers::replace::extract_replace_request(&args);
    if let Some(old_exe) = old_exe {
        helpers::replace::delete_old_executable(&old_exe).await;

        if rest_args.len() <= 1 {
            info!(
                "Update complete, now running version {}",
                env!("CARGO_PKG_VERSION")
            );
            return Ok(());
        }
    }

    let config = config::handle_config().await?;

    cli::start(config, rest_args).await?;
    Ok(())
}
