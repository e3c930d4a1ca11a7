use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::Extractor;
use crate::model::ExtractionStage;

/// Primary locator: the `window.__DATA__` assignment embedded in the page.
///
/// The blob carries the issue's full article metadata, including real
/// article URLs, so this stage is always tried first.
pub struct WindowDataExtractor;

// The site ships the blob as `JSON.parse(`...`)` with the JSON document in
// a template literal; some revisions assign the object directly.
static WRAPPED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)window\.__DATA__\s*=\s*JSON\.parse\(`(.*?)`\)\s*;").unwrap()
});
static BARE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)window\.__DATA__\s*=\s*(\{.*?\})\s*;").unwrap());

#[derive(Debug, Default, Deserialize)]
struct WindowData {
    #[serde(rename = "initialData", default)]
    initial_data: InitialData,
}

#[derive(Debug, Default, Deserialize)]
struct InitialData {
    #[serde(rename = "issueData", default)]
    issue_data: IssueData,
}

#[derive(Debug, Default, Deserialize)]
struct IssueData {
    #[serde(rename = "article_previews", default)]
    article_previews: ArticlePreviews,
}

/// The issue's preview groupings. Flattening keeps declaration order:
/// advances, then departments, then features.
#[derive(Debug, Default, Deserialize)]
struct ArticlePreviews {
    #[serde(default)]
    advances: Vec<Value>,
    #[serde(default)]
    departments: Vec<Value>,
    #[serde(default)]
    features: Vec<Value>,
}

fn find_raw_document(page: &str) -> Option<String> {
    if let Some(caps) = WRAPPED_RE.captures(page) {
        // The template literal escapes backticks; that is the only
        // embedding artifact between us and plain JSON.
        return Some(caps[1].replace("\\`", "`"));
    }
    BARE_RE.captures(page).map(|caps| caps[1].to_string())
}

impl Extractor for WindowDataExtractor {
    fn stage(&self) -> ExtractionStage {
        ExtractionStage::WindowData
    }

    fn extract(&self, page: &str) -> Vec<Value> {
        let Some(raw) = find_raw_document(page) else {
            warn!("window.__DATA__ not found in page");
            return Vec::new();
        };

        let data: WindowData = match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(e) => {
                warn!("failed to parse window.__DATA__: {e}");
                return Vec::new();
            }
        };

        let previews = data.initial_data.issue_data.article_previews;
        let records: Vec<Value> = previews
            .advances
            .into_iter()
            .chain(previews.departments)
            .chain(previews.features)
            .collect();
        debug!("window.__DATA__ held {} preview records", records.len());
        records
    }
}
