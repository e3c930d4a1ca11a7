//! Normalizers for the polymorphic field shapes found in the wild.
//!
//! The same logical field arrives as a plain string on one article, an
//! object on the next, and a list on a third. Each shape set is a closed
//! `#[serde(untagged)]` union with a fixed extraction rule per variant;
//! values that match none of the variants normalize to empty.

use chrono::{DateTime, NaiveDateTime};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

/// Author metadata: a bare name, a person object, or a list mixing both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AuthorField {
    Name(String),
    Person(Person),
    Multiple(Vec<AuthorEntry>),
}

#[derive(Debug, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AuthorEntry {
    Name(String),
    Person(Person),
}

impl AuthorField {
    /// Every resolvable display name, in source order.
    pub fn names(&self) -> Vec<String> {
        let names: Vec<String> = match self {
            AuthorField::Name(name) => vec![name.clone()],
            AuthorField::Person(person) => person.name.iter().cloned().collect(),
            AuthorField::Multiple(entries) => entries
                .iter()
                .filter_map(|entry| match entry {
                    AuthorEntry::Name(name) => Some(name.clone()),
                    AuthorEntry::Person(person) => person.name.clone(),
                })
                .collect(),
        };
        names.into_iter().filter(|name| !name.is_empty()).collect()
    }

    /// The first resolvable display name, if any.
    pub fn first_name(&self) -> Option<String> {
        self.names().into_iter().next()
    }
}

/// All resolvable author names from an untyped value.
pub fn author_names(value: &Value) -> Vec<String> {
    serde_json::from_value::<AuthorField>(value.clone())
        .map(|field| field.names())
        .unwrap_or_default()
}

/// The first resolvable author name from an untyped value.
pub fn first_author(value: &Value) -> Option<String> {
    serde_json::from_value::<AuthorField>(value.clone())
        .ok()
        .and_then(|field| field.first_name())
}

/// Description metadata: plain text, an object with `description`/`name`
/// sub-fields, or a list of strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DescriptionField {
    Text(String),
    Object(DescriptionObject),
    Many(Vec<Value>),
}

#[derive(Debug, Deserialize)]
pub struct DescriptionObject {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Lists of description fragments are joined and capped at this length.
const MAX_DESCRIPTION_CHARS: usize = 500;

impl DescriptionField {
    pub fn text(&self) -> String {
        match self {
            DescriptionField::Text(text) => text.clone(),
            DescriptionField::Object(object) => object
                .description
                .clone()
                .filter(|d| !d.is_empty())
                .or_else(|| object.name.clone())
                .unwrap_or_default(),
            DescriptionField::Many(items) => {
                let joined = items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(" ");
                joined.chars().take(MAX_DESCRIPTION_CHARS).collect()
            }
        }
    }
}

/// Description text from an untyped value; unrecognized shapes yield empty.
pub fn description_text(value: &Value) -> String {
    serde_json::from_value::<DescriptionField>(value.clone())
        .map(|field| field.text())
        .unwrap_or_default()
}

/// Image metadata: a URL string, an object with `url` or `@id`, or a list
/// of either (first element wins).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ImageField {
    Url(String),
    Object(ImageObject),
    Multiple(Vec<ImageEntry>),
}

#[derive(Debug, Deserialize)]
pub struct ImageObject {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "@id", default)]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ImageEntry {
    Url(String),
    Object(ImageObject),
}

impl ImageObject {
    fn best_url(&self) -> String {
        self.url
            .clone()
            .filter(|u| !u.is_empty())
            .or_else(|| self.id.clone())
            .unwrap_or_default()
    }
}

impl ImageField {
    pub fn url(&self) -> String {
        match self {
            ImageField::Url(url) => url.clone(),
            ImageField::Object(object) => object.best_url(),
            ImageField::Multiple(entries) => match entries.first() {
                Some(ImageEntry::Url(url)) => url.clone(),
                Some(ImageEntry::Object(object)) => object.best_url(),
                None => String::new(),
            },
        }
    }
}

/// Image URL from an untyped value; unrecognized shapes yield empty.
pub fn image_url(value: &Value) -> String {
    serde_json::from_value::<ImageField>(value.clone())
        .map(|field| field.url())
        .unwrap_or_default()
}

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Remove markup tags from a text value. Entities are left as-is.
pub fn strip_html(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    TAG_RE.replace_all(text, "").trim().to_string()
}

/// Convert an ISO-8601 timestamp to the RFC-822 form RSS expects.
///
/// Accepts a trailing `Z`, an explicit offset, or no timezone at all
/// (treated as UTC). Anything else yields an empty string; the feed's
/// `pubDate` is optional, so this never fails.
pub fn iso_to_rfc822(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let parsed = DateTime::parse_from_rfc3339(raw).or_else(|_| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
            .map(|naive| naive.and_utc().fixed_offset())
    });
    match parsed {
        Ok(date) => date.format("%a, %d %b %Y %H:%M:%S %z").to_string(),
        Err(e) => {
            debug!("could not parse date {raw:?}: {e}");
            String::new()
        }
    }
}
