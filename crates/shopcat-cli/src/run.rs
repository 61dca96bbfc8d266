//! Command handlers for the CLI.
//!
//! These are called from `main` once configuration is loaded and the site
//! URL has been normalized.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::pin::pin;
use std::time::Duration;

use anyhow::Context;
use futures::TryStreamExt;
use shopcat_core::AppConfig;
use shopcat_scraper::{
    CatalogExtractor, CollectionFilter, ExtractSummary, RetryPolicy, ShopifyClient,
};

use crate::output::{OutputFormat, RowWriter};

/// Retry policy from configuration. `max_retries_override` comes from
/// `--max-retries` and takes precedence over the environment.
fn retry_policy(config: &AppConfig, max_retries_override: Option<u32>) -> RetryPolicy {
    RetryPolicy::new(
        Duration::from_secs(config.retry_cooldown_secs),
        max_retries_override.or(config.max_retries),
    )
}

/// Builds the storefront client from configuration.
pub(crate) fn build_shopify_client(
    config: &AppConfig,
    max_retries_override: Option<u32>,
) -> anyhow::Result<ShopifyClient> {
    let retry = retry_policy(config, max_retries_override);
    let client = ShopifyClient::new(config.request_timeout_secs, &config.user_agent, retry)
        .map_err(|e| anyhow::anyhow!("failed to build Shopify client: {e}"))?
        .with_inter_request_delay(Duration::from_millis(config.inter_request_delay_ms));
    Ok(client)
}

/// Opens `path` for writing, or standard output when `None`.
pub(crate) fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(std::io::stdout().lock()))),
    }
}

/// Prints every collection handle, one per line.
pub(crate) async fn run_list_collections<W: Write>(
    client: &ShopifyClient,
    site: &str,
    out: &mut W,
) -> anyhow::Result<usize> {
    let mut collections = pin!(client.collections(site));
    let mut count = 0usize;
    while let Some(collection) = collections.try_next().await? {
        writeln!(out, "{}", collection.handle)?;
        count += 1;
    }
    out.flush()?;
    Ok(count)
}

/// Extracts the catalog of `site` and streams it through `writer`.
///
/// Returns the underlying output and the run summary. A fatal error leaves
/// whatever rows were already written in place.
pub(crate) async fn run_extract<W: Write>(
    client: &ShopifyClient,
    site: &str,
    filter: CollectionFilter,
    mut writer: RowWriter<W>,
) -> anyhow::Result<(W, ExtractSummary)> {
    let mut extractor = CatalogExtractor::new(client, site, filter);
    while let Some(row) = extractor.next_row().await? {
        writer.write_row(&row)?;
    }
    let out = writer.finish()?;

    let summary = extractor.summary();
    tracing::info!(
        site,
        collections_visited = summary.collections_visited,
        collections_skipped = summary.collections_skipped,
        rows = summary.rows_emitted,
        duplicates = summary.duplicates_skipped,
        "extraction complete"
    );
    Ok((out, summary))
}

/// Extracts `site` in `format` to `output` (or stdout).
pub(crate) async fn run_export(
    client: &ShopifyClient,
    site: &str,
    filter: CollectionFilter,
    format: OutputFormat,
    output: Option<&Path>,
    include_body: bool,
) -> anyhow::Result<ExtractSummary> {
    let writer = RowWriter::new(format, open_output(output)?, include_body)?;
    let (_, summary) = run_extract(client, site, filter, writer).await?;
    Ok(summary)
}
