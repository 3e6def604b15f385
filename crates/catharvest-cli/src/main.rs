mod extract;
mod harvest;
mod output;

use std::path::PathBuf;

use catharvest_core::{ConfigError, HarvestConfig};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "catharvest")]
#[command(about = "Harvest catalog identifiers and extract normalized product documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect product identifiers from the paginated listing.
    Harvest {
        #[command(flatten)]
        options: HarvestArgs,
        /// Where to write the identifier list (defaults to `CATHARVEST_IDS_PATH`).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Render and normalize every identifier in a saved identifier list.
    Extract {
        /// Identifier list to read (defaults to `CATHARVEST_IDS_PATH`).
        #[arg(long)]
        input: Option<PathBuf>,
        /// Where to write the documents (defaults to `CATHARVEST_OUTPUT_PATH`).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Harvest, then extract, writing both files.
    Run {
        #[command(flatten)]
        options: HarvestArgs,
    },
    /// Normalize one saved page (HTML or raw JSON) and print the document.
    Normalize {
        file: PathBuf,
        /// Id of the script element holding the payload.
        #[arg(long)]
        element_id: Option<String>,
    },
}

/// Per-run overrides of the harvest configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
struct HarvestArgs {
    /// Number of unique identifiers to collect.
    #[arg(long)]
    target: Option<usize>,
    /// First listing page to request.
    #[arg(long)]
    start_page: Option<u32>,
    /// Maximum concurrent page fetches.
    #[arg(long)]
    workers: Option<usize>,
    /// Consecutive empty pages that end the harvest.
    #[arg(long)]
    max_empty: Option<u32>,
}

impl HarvestArgs {
    /// Applies the overrides and re-validates the result.
    fn apply(&self, config: &mut HarvestConfig) -> Result<(), ConfigError> {
        if let Some(target) = self.target {
            config.target_count = target;
        }
        if let Some(start_page) = self.start_page {
            config.start_page = start_page;
        }
        if let Some(workers) = self.workers {
            config.max_workers = workers;
        }
        if let Some(max_empty) = self.max_empty {
            config.max_empty_pages = max_empty;
        }
        config.validate()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = catharvest_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Harvest { options, output } => {
            options.apply(&mut config.harvest)?;
            let identifiers = harvest::run_harvest(&config).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(&config.extract.ids_path));
            output::write_json(&path, &identifiers)?;
            println!("collected {} identifiers -> {}", identifiers.len(), path.display());
        }
        Commands::Extract { input, output } => {
            let input = input.unwrap_or_else(|| PathBuf::from(&config.extract.ids_path));
            let identifiers = output::read_identifiers(&input)?;
            let documents = extract::run_extract(&config, &identifiers).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(&config.extract.output_path));
            output::write_json(&path, &documents)?;
            println!("extracted {} documents -> {}", documents.len(), path.display());
        }
        Commands::Run { options } => {
            options.apply(&mut config.harvest)?;
            let identifiers = harvest::run_harvest(&config).await?;
            let ids_path = PathBuf::from(&config.extract.ids_path);
            output::write_json(&ids_path, &identifiers)?;
            println!("collected {} identifiers -> {}", identifiers.len(), ids_path.display());

            let documents = extract::run_extract(&config, &identifiers).await?;
            let out_path = PathBuf::from(&config.extract.output_path);
            output::write_json(&out_path, &documents)?;
            println!("extracted {} documents -> {}", documents.len(), out_path.display());
        }
        Commands::Normalize { file, element_id } => {
            let element_id = element_id.unwrap_or_else(|| config.extract.payload_element_id.clone());
            let document = extract::run_normalize(&file, &element_id, &config.harvest.base_url)?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }

    Ok(())
}
