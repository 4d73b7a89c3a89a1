//! clubsearch - connect, ping and load the demo clubs.

use clap::Parser;
use clubsearch::settings::DEFAULT_CONFIG_PATH;
use clubsearch::scenario;
use clubsearch_log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

/// Load the demo clubs into the search engine
#[derive(Parser)]
#[command(name = "clubsearch")]
#[command(version)]
#[command(about = "Connect to the search engine and load the demo clubs")]
struct Cli {
    /// Settings file (yaml, json or toml)
    #[arg(short, long, env = "CLUBSEARCH_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

async fn run(cli: Cli) -> clubsearch::Result<()> {
    let client = scenario::connect(&cli.config)?;
    let stats = scenario::run(&client).await?;
    info!("Loaded {} demo clubs", stats.num_indexed);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    clubsearch_log::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
