//! Two-stage article extraction.
//!
//! The `window.__DATA__` blob is the primary source; JSON-LD
//! `PublicationIssue` metadata is only consulted when the blob yields
//! nothing. Extractors never fail: malformed input produces an empty list
//! and the pipeline moves on.

use log::{info, warn};
use serde_json::Value;
use url::Url;

use crate::model::{Extraction, ExtractionStage};
use crate::normalize;

mod json_ld;
mod window_data;

pub use self::json_ld::JsonLdExtractor;
pub use self::window_data::WindowDataExtractor;

/// A strategy for locating raw article records in page text.
pub trait Extractor {
    fn stage(&self) -> ExtractionStage;
    fn extract(&self, page: &str) -> Vec<Value>;
}

/// Run the extraction stages in order and normalize what the first
/// productive stage returns.
pub fn extract_articles(page: &str, base: &Url) -> Extraction {
    let extractors: Vec<Box<dyn Extractor>> =
        vec![Box::new(WindowDataExtractor), Box::new(JsonLdExtractor)];

    for extractor in extractors {
        let stage = extractor.stage();
        let records = extractor.extract(page);
        if records.is_empty() {
            warn!("{stage} extraction yielded no records");
            continue;
        }
        let articles = normalize::canonicalize_all(&records, stage, base);
        if articles.is_empty() {
            warn!("{stage} records did not survive normalization");
            continue;
        }
        info!("extracted {} articles via {stage}", articles.len());
        return Extraction {
            articles,
            stage: Some(stage),
        };
    }

    Extraction::default()
}
