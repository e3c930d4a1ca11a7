use chrono::{TimeZone, Utc};
use sciam_feed::{extract_articles, feed, ExtractionStage, FeedConfig};

fn page_with_window_data(issue_json: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Latest Issue</title>
    <script>window.__DATA__ = JSON.parse(`{}`);</script>
</head>
<body><h1>Latest Issue</h1></body>
</html>"#,
        issue_json
    )
}

const AUTHORLESS_ISSUE: &str = r#"{
    "initialData": {
        "issueData": {
            "article_previews": {
                "advances": [],
                "departments": [],
                "features": [{
                    "title": "The Quantum Century",
                    "display_title": "Quantum!",
                    "summary": "<p>A century of quantum mechanics</p>",
                    "date_published": "2025-06-01T09:00:00Z",
                    "url": "/article/the-quantum-century/",
                    "image_url": "/cdn/quantum.jpg",
                    "column": "Features",
                    "category": "Physics"
                }]
            }
        }
    }
}"#;

#[test]
fn test_authorless_primary_article_renders_without_author_elements() {
    let page = page_with_window_data(AUTHORLESS_ISSUE);
    let config = FeedConfig::default();

    let extraction = extract_articles(&page, &config).unwrap();
    assert_eq!(extraction.stage, Some(ExtractionStage::WindowData));
    assert_eq!(extraction.articles.len(), 1);

    let article = &extraction.articles[0];
    assert_eq!(article.headline, "The Quantum Century");
    assert!(article.authors.is_empty());
    assert_eq!(
        article.url,
        "https://www.scientificamerican.com/article/the-quantum-century/"
    );

    let build_date = Utc.with_ymd_and_hms(2025, 6, 20, 12, 0, 0).unwrap();
    let document = feed::render(&extraction.articles, &config, build_date).unwrap();

    assert_eq!(document.matches("<item>").count(), 1);
    assert!(document.contains("<title>The Quantum Century</title>"));
    assert!(!document.contains("<dc:creator>"));
    assert!(!document.contains("<author>"));
    assert!(document.contains("<pubDate>Sun, 01 Jun 2025 09:00:00 +0000</pubDate>"));
    assert!(document.contains(
        "<guid isPermaLink=\"true\">https://www.scientificamerican.com/article/the-quantum-century/</guid>"
    ));
}

#[test]
fn test_fallback_is_not_consulted_when_primary_succeeds() {
    // the JSON-LD issue here would produce a different headline; it must lose
    let page = format!(
        r#"{}<script type="application/ld+json">{{"@type": "PublicationIssue", "hasPart": [{{"headline": "Shadow Article"}}]}}</script>"#,
        page_with_window_data(AUTHORLESS_ISSUE)
    );
    let extraction = extract_articles(&page, &FeedConfig::default()).unwrap();

    assert_eq!(extraction.stage, Some(ExtractionStage::WindowData));
    assert_eq!(extraction.articles.len(), 1);
    assert_eq!(extraction.articles[0].headline, "The Quantum Century");
}

#[test]
fn test_preview_categories_are_flattened_in_declaration_order() {
    let issue = r#"{
        "initialData": {
            "issueData": {
                "article_previews": {
                    "advances": [{"title": "Advance"}],
                    "departments": [{"title": "Department"}],
                    "features": [{"title": "Feature"}]
                }
            }
        }
    }"#;
    let extraction =
        extract_articles(&page_with_window_data(issue), &FeedConfig::default()).unwrap();

    let headlines: Vec<&str> = extraction
        .articles
        .iter()
        .map(|a| a.headline.as_str())
        .collect();
    assert_eq!(headlines, vec!["Advance", "Department", "Feature"]);
}
