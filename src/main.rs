use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cherry_offers::config::{Config, General};
use cherry_offers::fetcher;

/// Extract offers from a deals category page and print them as JSON.
#[derive(Parser)]
struct Args {
    /// Category label, as listed in the config's [categories] table.
    category: String,
    #[arg(long, default_value = "categories.toml")]
    config: String,
    /// Parse a saved page instead of fetching the category URL.
    #[arg(long)]
    input: Option<PathBuf>,
}

/// The config is only required when fetching; a local `--input` file can run without one.
fn load_config(args: &Args) -> Result<Option<Config>> {
    if args.input.is_some() && !Path::new(&args.config).exists() {
        return Ok(None);
    }
    Config::load(&args.config).map(Some)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    let log_level = config
        .as_ref()
        .map(|c| c.general.log_level.clone())
        .unwrap_or_else(|| General::default().log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match &args.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            cherry_offers::parse_from_reader(&args.category, BufReader::new(file))?
        }
        None => {
            let config = config.as_ref().context("fetching needs a config file")?;
            fetcher::fetch_category(config, &args.category)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
