use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

use super::Extractor;
use crate::model::ExtractionStage;

/// Fallback locator: JSON-LD structured data, searched for the issue
/// container.
///
/// `hasPart` entries carry image URLs but no article URLs; the normalizer
/// is expected to tolerate the gap.
pub struct JsonLdExtractor;

const ISSUE_TYPE: &str = "PublicationIssue";

// The fixed repair rewrites: a trailing comma before an object or array
// closer. Nothing else is repaired.
static TRAILING_OBJECT_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*\}").unwrap());
static TRAILING_ARRAY_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*\]").unwrap());

/// Strict parse first, one repair pass, then give up on the block.
fn parse_tolerant(raw: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(raw) {
        return Some(value);
    }
    let repaired = TRAILING_OBJECT_COMMA.replace_all(raw, "}");
    let repaired = TRAILING_ARRAY_COMMA.replace_all(&repaired, "]");
    match serde_json::from_str(&repaired) {
        Ok(value) => {
            debug!("JSON-LD block recovered after trailing-comma repair");
            Some(value)
        }
        Err(e) => {
            debug!("skipping unparseable JSON-LD block: {e}");
            None
        }
    }
}

fn is_issue(item: &Value) -> bool {
    item.get("@type").and_then(Value::as_str) == Some(ISSUE_TYPE)
}

/// Find the issue container in a parsed block and return its `hasPart`
/// list. The container may be the document itself, an entry of its
/// `@graph`, or an entry of a top-level array.
fn issue_parts(document: &Value) -> Option<Vec<Value>> {
    let candidates: &[Value] = match document {
        Value::Object(_) => match document.get("@graph").and_then(Value::as_array) {
            Some(graph) => graph.as_slice(),
            None => std::slice::from_ref(document),
        },
        Value::Array(items) => items.as_slice(),
        _ => return None,
    };

    candidates
        .iter()
        .find(|item| is_issue(item))
        .and_then(|issue| issue.get("hasPart").and_then(Value::as_array).cloned())
}

impl Extractor for JsonLdExtractor {
    fn stage(&self) -> ExtractionStage {
        ExtractionStage::JsonLd
    }

    fn extract(&self, page: &str) -> Vec<Value> {
        let document = Html::parse_document(page);
        let selector = Selector::parse("script[type='application/ld+json']").unwrap();

        for script in document.select(&selector) {
            let raw = script.inner_html();
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let Some(value) = parse_tolerant(raw) else {
                continue;
            };
            if let Some(parts) = issue_parts(&value) {
                if !parts.is_empty() {
                    debug!("found {} articles in JSON-LD issue container", parts.len());
                    return parts;
                }
            }
        }

        warn!("no JSON-LD issue container found");
        Vec::new()
    }
}
