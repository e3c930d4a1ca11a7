//! RSS 2.0 serialization.
//!
//! One pass over the canonical article list, in source order. Optional
//! elements are omitted rather than emitted empty, and per-item problems
//! (an unparseable date, a missing author) degrade the item instead of
//! aborting the document.

use chrono::{DateTime, Utc};
use log::info;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs;
use std::io;
use std::path::Path;

use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::fields;
use crate::model::Article;

const CHANNEL_TITLE: &str = "Scientific American - Latest Issue";
const CHANNEL_DESCRIPTION: &str = "Latest articles from Scientific American magazine";
const CHANNEL_LANGUAGE: &str = "en-us";
/// Issue imagery is JPEG in practice; declared as a static best effort.
const IMAGE_MIME: &str = "image/jpeg";

/// Remove characters that are not legal in XML 1.0 text. Entity escaping
/// itself is the writer's job.
fn sanitize_text(input: &str) -> String {
    input
        .chars()
        .filter(|&c| {
            let code = c as u32;
            code == 0x09 || code == 0x0A || code == 0x0D || code >= 0x20
        })
        .collect()
}

fn write_text_element<W: io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> io::Result<()> {
    let sanitized = sanitize_text(text);
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(&sanitized)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_item<W: io::Write>(writer: &mut Writer<W>, article: &Article) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new("item")))?;

    write_text_element(writer, "title", &article.headline)?;
    if !article.url.is_empty() {
        write_text_element(writer, "link", &article.url)?;
    }
    if !article.summary.is_empty() {
        write_text_element(writer, "description", &article.summary)?;
    }
    let pub_date = fields::iso_to_rfc822(&article.published_at);
    if !pub_date.is_empty() {
        write_text_element(writer, "pubDate", &pub_date)?;
    }
    if let Some(author) = article.authors.first().filter(|name| !name.is_empty()) {
        write_text_element(writer, "dc:creator", author)?;
        write_text_element(writer, "author", author)?;
    }

    let guid = if article.url.is_empty() {
        &article.headline
    } else {
        &article.url
    };
    let permalink = if guid.starts_with("http") { "true" } else { "false" };
    let mut guid_start = BytesStart::new("guid");
    guid_start.push_attribute(("isPermaLink", permalink));
    let sanitized_guid = sanitize_text(guid);
    writer.write_event(Event::Start(guid_start))?;
    writer.write_event(Event::Text(BytesText::new(&sanitized_guid)))?;
    writer.write_event(Event::End(BytesEnd::new("guid")))?;

    if !article.image_url.is_empty() {
        let mut thumbnail = BytesStart::new("media:thumbnail");
        thumbnail.push_attribute(("url", article.image_url.as_str()));
        writer.write_event(Event::Empty(thumbnail))?;

        let mut content = BytesStart::new("media:content");
        content.push_attribute(("url", article.image_url.as_str()));
        content.push_attribute(("medium", "image"));
        writer.write_event(Event::Empty(content))?;

        let mut enclosure = BytesStart::new("enclosure");
        enclosure.push_attribute(("url", article.image_url.as_str()));
        enclosure.push_attribute(("type", IMAGE_MIME));
        writer.write_event(Event::Empty(enclosure))?;
    }

    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

/// Render the article list into a complete RSS 2.0 document.
///
/// The build timestamp is injected so that runs over identical input are
/// byte-identical apart from `lastBuildDate`.
pub fn render(
    articles: &[Article],
    config: &FeedConfig,
    build_date: DateTime<Utc>,
) -> Result<String, FeedError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:atom", "http://www.w3.org/2005/Atom"));
    rss.push_attribute(("xmlns:dc", "http://purl.org/dc/elements/1.1/"));
    rss.push_attribute(("xmlns:media", "http://search.yahoo.com/mrss/"));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", CHANNEL_TITLE)?;
    write_text_element(&mut writer, "link", &config.page_url)?;
    write_text_element(&mut writer, "description", CHANNEL_DESCRIPTION)?;
    write_text_element(&mut writer, "language", CHANNEL_LANGUAGE)?;
    let build_date = build_date.format("%a, %d %b %Y %H:%M:%S +0000").to_string();
    write_text_element(&mut writer, "lastBuildDate", &build_date)?;

    let mut self_link = BytesStart::new("atom:link");
    self_link.push_attribute(("href", config.self_link.as_str()));
    self_link.push_attribute(("rel", "self"));
    self_link.push_attribute(("type", "application/rss+xml"));
    writer.write_event(Event::Empty(self_link))?;

    for article in articles {
        write_item(&mut writer, article)?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    let document = writer.into_inner();
    Ok(String::from_utf8_lossy(&document).into_owned())
}

/// Write the rendered document, replacing any previous feed.
pub fn write_feed(path: impl AsRef<Path>, document: &str) -> Result<(), FeedError> {
    fs::write(path.as_ref(), document)?;
    info!("RSS feed written to {}", path.as_ref().display());
    Ok(())
}
