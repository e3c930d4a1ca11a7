//! Scientific American latest-issue RSS generator.
//!
//! Fetches the latest-issue landing page through a FlareSolverr bypass
//! service, extracts the article records embedded in the page (the
//! `window.__DATA__` blob when available, JSON-LD `PublicationIssue`
//! metadata otherwise), normalizes them into one schema, and renders an
//! RSS 2.0 document.
//!
//! The pipeline is synchronous and runs once per invocation: fetch, one
//! extraction pass, one render, one file write.

pub mod config;
pub mod error;
pub mod extractors;
pub mod feed;
pub mod fetcher;
pub mod fields;
pub mod model;
pub mod normalize;

use chrono::Utc;
use log::info;
use std::time::Duration;
use url::Url;

pub use crate::config::FeedConfig;
pub use crate::error::FeedError;
pub use crate::model::{Article, Extraction, ExtractionStage, RunSummary};

/// Fetch the configured landing page through the bypass service.
pub fn fetch_page(config: &FeedConfig) -> Result<String, FeedError> {
    let fetcher = fetcher::FlareSolverr::new(
        &config.flaresolverr_url,
        Duration::from_secs(config.timeout),
    )?;
    fetcher.fetch(&config.page_url)
}

/// Run both extraction stages over raw page text.
///
/// Never fails: a page without usable data yields an empty extraction
/// with no stage recorded.
pub fn extract_articles(page: &str, config: &FeedConfig) -> Result<Extraction, FeedError> {
    let base = Url::parse(&config.base_url)?;
    Ok(extractors::extract_articles(page, &base))
}

/// Run the whole pipeline: fetch, extract, render, write.
///
/// The run succeeds only if the page was fetched, at least one article was
/// extracted, and the output file was written.
pub fn generate_feed(config: &FeedConfig) -> Result<RunSummary, FeedError> {
    let page = fetch_page(config)?;
    let extraction = extract_articles(&page, config)?;
    let stage = extraction.stage.ok_or(FeedError::NoArticles)?;

    let document = feed::render(&extraction.articles, config, Utc::now())?;
    feed::write_feed(&config.output_file, &document)?;

    info!(
        "feed complete: {} items via {stage}",
        extraction.articles.len()
    );
    Ok(RunSummary {
        items: extraction.articles.len(),
        stage,
        output_file: config.output_file.clone(),
    })
}
