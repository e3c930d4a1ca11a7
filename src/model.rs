use serde::Serialize;
use std::fmt;

/// A normalized article, ready for serialization.
///
/// `url` and `image_url` are absolute when non-empty; `headline` is never
/// empty; `published_at` keeps the source's ISO-8601 text (or is empty) and
/// is converted at serialization time.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Article {
    pub headline: String,
    pub summary: String,
    pub published_at: String,
    pub url: String,
    pub image_url: String,
    pub authors: Vec<String>,
    pub source_tags: Option<SourceTags>,
}

/// Section provenance preserved from the issue data for diagnostics.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SourceTags {
    pub column: String,
    pub category: String,
}

/// Which locator produced the articles for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStage {
    /// The embedded `window.__DATA__` blob (rich metadata, real URLs)
    WindowData,
    /// JSON-LD `PublicationIssue` metadata (no article URLs)
    JsonLd,
}

impl fmt::Display for ExtractionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionStage::WindowData => write!(f, "window data"),
            ExtractionStage::JsonLd => write!(f, "JSON-LD"),
        }
    }
}

/// Result of running the two-stage extraction over a page.
///
/// `stage` is `Some` exactly when `articles` is non-empty, so callers and
/// tests can check which locator won without reading logs.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub articles: Vec<Article>,
    pub stage: Option<ExtractionStage>,
}

/// Outcome of a successful end-to-end run.
#[derive(Debug)]
pub struct RunSummary {
    pub items: usize,
    pub stage: ExtractionStage,
    pub output_file: String,
}
