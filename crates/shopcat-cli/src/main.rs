mod output;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use shopcat_scraper::{normalize_site_url, CollectionFilter};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "shopcat")]
#[command(about = "Export a Shopify store's product catalog as CSV or JSON")]
struct Cli {
    /// Storefront address, e.g. `shop.example.com`
    site: String,

    /// Print each collection handle, one per line, and exit
    #[arg(long)]
    list_collections: bool,

    /// Only export these collections (comma separated handles)
    #[arg(short, long, value_name = "HANDLES")]
    collections: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Write output to this file instead of standard output
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Omit the Body column from CSV output
    #[arg(long)]
    no_body: bool,

    /// Check whether the site exposes a storefront catalog, then exit
    #[arg(long, conflicts_with = "list_collections")]
    check: bool,

    /// Give up after this many retries of a blocked request (default: never)
    #[arg(long, value_name = "N")]
    max_retries: Option<u32>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = shopcat_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let site = normalize_site_url(&cli.site);
    let client = run::build_shopify_client(&config, cli.max_retries)?;

    if cli.check {
        return Ok(if client.is_storefront(&site).await {
            println!("{site}: storefront catalog available");
            ExitCode::SUCCESS
        } else {
            println!("{site}: no storefront catalog found");
            ExitCode::FAILURE
        });
    }

    if cli.list_collections {
        let mut stdout = std::io::stdout().lock();
        run::run_list_collections(&client, &site, &mut stdout).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let filter = cli
        .collections
        .as_deref()
        .map_or_else(CollectionFilter::all, CollectionFilter::parse);

    run::run_export(
        &client,
        &site,
        filter,
        cli.format,
        cli.output.as_deref(),
        !cli.no_body,
    )
    .await?;

    Ok(ExitCode::SUCCESS)
}
