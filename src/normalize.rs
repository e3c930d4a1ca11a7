//! Mapping from raw records to the canonical [`Article`] schema.
//!
//! Records arrive from either locator as untyped JSON objects; everything
//! here degrades per field instead of failing, and a record is dropped
//! only when it is not an object at all.

use html_escape::decode_html_entities;
use log::debug;
use serde_json::{Map, Value};
use url::Url;

use crate::fields;
use crate::model::{Article, ExtractionStage, SourceTags};

/// Placeholder used when every headline source field is absent or empty.
pub const DEFAULT_HEADLINE: &str = "Untitled Article";

/// Normalize a batch of raw records from one locator.
pub fn canonicalize_all(records: &[Value], stage: ExtractionStage, base: &Url) -> Vec<Article> {
    records
        .iter()
        .filter_map(|record| canonicalize(record, stage, base))
        .collect()
}

/// Map one raw record into the canonical schema.
///
/// Returns `None` for records that cannot be interpreted as an object;
/// heterogeneous input streams are expected to contain noise.
pub fn canonicalize(record: &Value, stage: ExtractionStage, base: &Url) -> Option<Article> {
    let Some(rec) = record.as_object() else {
        debug!("skipping non-object record: {record}");
        return None;
    };
    Some(match stage {
        ExtractionStage::WindowData => from_preview(rec, base),
        ExtractionStage::JsonLd => from_issue_part(rec, base),
    })
}

/// An article preview from the `window.__DATA__` issue data.
fn from_preview(rec: &Map<String, Value>, base: &Url) -> Article {
    let authors = rec
        .get("authors")
        .map(fields::author_names)
        .unwrap_or_default();

    Article {
        headline: headline_or_default(first_text(rec, &["title", "display_title"])),
        summary: clean_text(&first_text(rec, &["summary"])),
        published_at: first_text(rec, &["date_published", "release_date"]),
        url: resolve(base, &first_text(rec, &["url"])),
        image_url: resolve(base, &first_text(rec, &["image_url"])),
        authors,
        source_tags: Some(SourceTags {
            column: first_text(rec, &["column"]),
            category: first_text(rec, &["category"]),
        }),
    }
}

/// A `hasPart` entry from the JSON-LD issue container. These carry no
/// article URLs, so `url` is usually empty here.
fn from_issue_part(rec: &Map<String, Value>, base: &Url) -> Article {
    let authors = rec
        .get("author")
        .and_then(fields::first_author)
        .map(|name| vec![name])
        .unwrap_or_default();

    let image = rec.get("image").map(fields::image_url).unwrap_or_default();

    Article {
        headline: headline_or_default(first_text(rec, &["headline", "name"])),
        summary: clean_text(&description_of(rec)),
        published_at: first_text(rec, &["datePublished", "dateCreated"]),
        url: resolve(base, &first_text(rec, &["url", "@id"])),
        image_url: resolve(base, &image),
        authors,
        source_tags: None,
    }
}

/// First non-empty string value among `keys`.
fn first_text(rec: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| rec.get(*key))
        .filter_map(Value::as_str)
        .find(|text| !text.is_empty())
        .map(str::to_string)
        .unwrap_or_default()
}

/// Description precedence for issue parts: `about`, then `description`,
/// then `dek`; each goes through the polymorphic description normalizer.
fn description_of(rec: &Map<String, Value>) -> String {
    for key in ["about", "description", "dek"] {
        if let Some(value) = rec.get(key) {
            let text = fields::description_text(value);
            if !text.is_empty() {
                return text;
            }
        }
    }
    String::new()
}

/// Strip markup, then decode entities the CMS left behind. The XML writer
/// re-escapes on output.
fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    decode_html_entities(&fields::strip_html(text)).into_owned()
}

fn headline_or_default(raw: String) -> String {
    let cleaned = clean_text(&raw);
    if cleaned.is_empty() {
        DEFAULT_HEADLINE.to_string()
    } else {
        cleaned
    }
}

/// Resolve a possibly-relative URL against the site base. Unresolvable
/// values normalize to empty so nothing relative reaches the serializer.
fn resolve(base: &Url, raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match base.join(raw) {
        Ok(url) => url.into(),
        Err(e) => {
            debug!("could not resolve URL {raw:?}: {e}");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("https://www.scientificamerican.com").unwrap()
    }

    #[test]
    fn test_preview_prefers_title_over_display_title() {
        let record = json!({"title": "Real Title", "display_title": "Display"});
        let article = canonicalize(&record, ExtractionStage::WindowData, &base()).unwrap();
        assert_eq!(article.headline, "Real Title");

        let record = json!({"display_title": "Display Only"});
        let article = canonicalize(&record, ExtractionStage::WindowData, &base()).unwrap();
        assert_eq!(article.headline, "Display Only");
    }

    #[test]
    fn test_missing_headline_gets_placeholder() {
        let record = json!({"summary": "text but no title"});
        let article = canonicalize(&record, ExtractionStage::WindowData, &base()).unwrap();
        assert_eq!(article.headline, DEFAULT_HEADLINE);

        let record = json!({"about": "an issue part with no headline"});
        let article = canonicalize(&record, ExtractionStage::JsonLd, &base()).unwrap();
        assert_eq!(article.headline, DEFAULT_HEADLINE);
    }

    #[test]
    fn test_relative_urls_are_resolved() {
        let record = json!({
            "title": "Linked",
            "url": "/article/linked/",
            "image_url": "/cdn/linked.jpg"
        });
        let article = canonicalize(&record, ExtractionStage::WindowData, &base()).unwrap();
        assert_eq!(article.url, "https://www.scientificamerican.com/article/linked/");
        assert_eq!(article.image_url, "https://www.scientificamerican.com/cdn/linked.jpg");
    }

    #[test]
    fn test_absolute_urls_pass_through() {
        let record = json!({"title": "Hosted", "url": "https://cdn.example.com/a"});
        let article = canonicalize(&record, ExtractionStage::WindowData, &base()).unwrap();
        assert_eq!(article.url, "https://cdn.example.com/a");
    }

    #[test]
    fn test_preview_keeps_all_author_names() {
        let record = json!({
            "title": "Team Effort",
            "authors": [{"name": "A"}, {"name": "B"}, {"role": "illustrator"}]
        });
        let article = canonicalize(&record, ExtractionStage::WindowData, &base()).unwrap();
        assert_eq!(article.authors, vec!["A", "B"]);
    }

    #[test]
    fn test_issue_part_keeps_first_author_only() {
        let record = json!({
            "headline": "Solo Credit",
            "author": [{"name": "A"}, {"name": "B"}]
        });
        let article = canonicalize(&record, ExtractionStage::JsonLd, &base()).unwrap();
        assert_eq!(article.authors, vec!["A"]);
    }

    #[test]
    fn test_issue_part_without_url_stays_empty() {
        let record = json!({"headline": "No Link", "image": "https://img.example.com/x.jpg"});
        let article = canonicalize(&record, ExtractionStage::JsonLd, &base()).unwrap();
        assert_eq!(article.url, "");
        assert_eq!(article.image_url, "https://img.example.com/x.jpg");
    }

    #[test]
    fn test_summary_is_stripped_and_decoded() {
        let record = json!({"title": "Clean", "summary": "<p>Q&amp;A with <em>someone</em></p>"});
        let article = canonicalize(&record, ExtractionStage::WindowData, &base()).unwrap();
        assert_eq!(article.summary, "Q&A with someone");
    }

    #[test]
    fn test_description_precedence_for_issue_parts() {
        let record = json!({
            "headline": "Ordered",
            "about": {"description": "from about"},
            "description": "from description"
        });
        let article = canonicalize(&record, ExtractionStage::JsonLd, &base()).unwrap();
        assert_eq!(article.summary, "from about");

        let record = json!({"headline": "Ordered", "dek": "from dek"});
        let article = canonicalize(&record, ExtractionStage::JsonLd, &base()).unwrap();
        assert_eq!(article.summary, "from dek");
    }

    #[test]
    fn test_provenance_tags() {
        let record = json!({"title": "Tagged", "column": "Advances", "category": "Physics"});
        let article = canonicalize(&record, ExtractionStage::WindowData, &base()).unwrap();
        let tags = article.source_tags.unwrap();
        assert_eq!(tags.column, "Advances");
        assert_eq!(tags.category, "Physics");

        let record = json!({"headline": "Untagged"});
        let article = canonicalize(&record, ExtractionStage::JsonLd, &base()).unwrap();
        assert!(article.source_tags.is_none());
    }

    #[test]
    fn test_non_object_records_are_skipped() {
        assert!(canonicalize(&json!("just a string"), ExtractionStage::JsonLd, &base()).is_none());
        assert!(canonicalize(&json!(null), ExtractionStage::WindowData, &base()).is_none());

        let records = vec![json!({"title": "Kept"}), json!(42)];
        let articles = canonicalize_all(&records, ExtractionStage::WindowData, &base());
        assert_eq!(articles.len(), 1);
    }
}
