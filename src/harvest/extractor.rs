//! Record extraction from detail pages
//!
//! Extraction is a pure function of the page URL and its parsed document, so
//! workers call it concurrently without any shared state. It never fails: a
//! field whose selector does not match, or whose text cannot be interpreted,
//! is left empty and reported as a [`FieldIssue`].
//!
//! # Page layout
//!
//! | Field | Source |
//! |-------|--------|
//! | title | `div.title_wrapper > h1`, year suffix and `&nbsp;` removed |
//! | summary | `div.summary_text` |
//! | primary credit | credit group labelled `Director:` (falls back to group 0) |
//! | cast | credit group labelled `Stars:` (falls back to group 2) |
//! | categories, date, country | `div.subtext`, a `|`-separated metadata line |
//! | image | `src` of `div.poster > a > img` |

use crate::harvest::document::Document;
use crate::record::{Extraction, Field, FieldIssue, Record};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::Selector;

lazy_static! {
    static ref TITLE: Selector = Selector::parse("div.title_wrapper > h1").unwrap();
    static ref SUMMARY: Selector = Selector::parse("div.summary_text").unwrap();
    static ref CREDIT_GROUPS: Selector = Selector::parse("div.credit_summary_item").unwrap();
    static ref METADATA: Selector = Selector::parse("div.subtext").unwrap();
    static ref POSTER: Selector = Selector::parse("div.poster > a > img").unwrap();

    // Release year appended to the title, e.g. "(1994)"
    static ref YEAR_SUFFIX: Regex = Regex::new(r"\(\d+\)").unwrap();

    // Release region appended to the date, e.g. "(USA)"
    static ref PARENTHETICAL: Regex = Regex::new(r"\(.+\)").unwrap();
}

const PRIMARY_CREDIT_LABELS: &[&str] = &["Directors:", "Director:", "Creators:", "Creator:"];
const CAST_LABELS: &[&str] = &["Stars:", "Star:"];

const PRIMARY_CREDIT_POSITION: usize = 0;
const CAST_POSITION: usize = 2;

/// Format of the free-text release date, e.g. "15 June 2001"
const RELEASE_DATE_FORMAT: &str = "%d %B %Y";

/// Extracts one record from a parsed detail page
///
/// # Example
///
/// ```
/// use catalog_harvest::harvest::{extract_record, Document};
///
/// let html = r#"<div class="title_wrapper"><h1>Example Movie&nbsp;(1999)</h1></div>"#;
/// let doc = Document::parse("https://example.com/title/tt1/", html).unwrap();
/// let extraction = extract_record("https://example.com/title/tt1/", &doc);
/// assert_eq!(extraction.record.title, "Example Movie");
/// assert!(!extraction.is_complete());
/// ```
pub fn extract_record(url: &str, document: &Document) -> Extraction {
    let mut issues = Vec::new();

    let title = document
        .text(&TITLE)
        .map(|text| clean_title(&text))
        .unwrap_or_default();
    if title.is_empty() {
        issues.push(FieldIssue::new(Field::Title, "title element missing or empty"));
    }

    let summary = document
        .text(&SUMMARY)
        .map(|text| clean_summary(&text))
        .unwrap_or_default();
    if summary.is_empty() {
        issues.push(FieldIssue::new(Field::Summary, "summary block missing or empty"));
    }

    let groups = document.texts(&CREDIT_GROUPS);

    let primary_credit =
        credit_group(&groups, PRIMARY_CREDIT_LABELS, PRIMARY_CREDIT_POSITION)
            .map(parse_primary_credit)
            .unwrap_or_default();
    if primary_credit.is_empty() {
        issues.push(FieldIssue::new(
            Field::PrimaryCredit,
            "no director credit group",
        ));
    }

    let cast = credit_group(&groups, CAST_LABELS, CAST_POSITION)
        .map(parse_cast)
        .unwrap_or_default();
    if cast.is_empty() {
        issues.push(FieldIssue::new(Field::Cast, "no stars credit group"));
    }

    let metadata = document.text(&METADATA).unwrap_or_default();
    let segments: Vec<&str> = metadata.split('|').collect();

    let categories = if segments.len() >= 2 {
        split_list(segments[segments.len() - 2])
    } else {
        Vec::new()
    };
    if categories.is_empty() {
        issues.push(FieldIssue::new(
            Field::Categories,
            "metadata line has no category segment",
        ));
    }

    // The last segment carries both the date and the release country
    let release = segments.last().copied().unwrap_or_default();

    let release_date = match parse_release_date(release) {
        Some(date) => date,
        None => {
            issues.push(FieldIssue::new(
                Field::ReleaseDate,
                format!("unparsable release date '{}'", release.trim()),
            ));
            String::new()
        }
    };

    let country = parse_country(release).unwrap_or_default();
    if country.is_empty() {
        issues.push(FieldIssue::new(
            Field::Country,
            "release segment has no parenthesized country",
        ));
    }

    let image_src = document.attr(&POSTER, "src").unwrap_or_default();
    if image_src.is_empty() {
        issues.push(FieldIssue::new(Field::ImageSrc, "poster image missing"));
    }

    Extraction {
        record: Record {
            title,
            summary,
            primary_credit,
            country,
            cast,
            categories,
            release_date,
            image_src,
            source_url: url.to_string(),
        },
        issues,
    }
}

/// Removes `(<digits>)` year suffixes and non-breaking spaces, then trims
pub fn clean_title(text: &str) -> String {
    YEAR_SUFFIX
        .replace_all(text, "")
        .replace('\u{a0}', "")
        .trim()
        .to_string()
}

/// Removes embedded newlines and trims
pub fn clean_summary(text: &str) -> String {
    strip_newlines(text).trim().to_string()
}

/// Finds a credit group by its label, falling back to a fixed position
///
/// The label is matched against the start of each group's trimmed text. When
/// no group carries any of `labels`, the group at `position` is used with
/// whatever label it has stripped. Returns the group text without its label.
pub fn credit_group<'a>(groups: &'a [String], labels: &[&str], position: usize) -> Option<&'a str> {
    for group in groups {
        let trimmed = group.trim_start();
        for label in labels {
            if let Some(rest) = trimmed.strip_prefix(*label) {
                return Some(rest);
            }
        }
    }

    groups.get(position).map(|group| strip_label(group))
}

/// First credited name of a credit group: text before any `|` or `,`
pub fn parse_primary_credit(text: &str) -> String {
    let names = text.split('|').next().unwrap_or_default();
    let first = names.split(',').next().unwrap_or_default();
    strip_newlines(first).trim().to_string()
}

/// Comma-separated names before the first `|` (which precedes "See full cast")
pub fn parse_cast(text: &str) -> Vec<String> {
    split_list(text.split('|').next().unwrap_or_default())
}

/// Parses "15 June 2001 (USA)" into "2001-06-15"
///
/// Returns `None` when the text without its parenthetical is not a date in
/// "DD Month YYYY" form.
pub fn parse_release_date(segment: &str) -> Option<String> {
    let flattened = strip_newlines(segment);
    let text = PARENTHETICAL.replace_all(&flattened, "");
    NaiveDate::parse_from_str(text.trim(), RELEASE_DATE_FORMAT)
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}

/// Parses the parenthesized country out of "15 June 2001 (USA)"
///
/// Only the first parenthetical counts: the text between the first and the
/// second `(`, with `)` and newlines removed.
pub fn parse_country(segment: &str) -> Option<String> {
    let (_, rest) = segment.split_once('(')?;
    let first = rest.split('(').next().unwrap_or_default();
    let country = strip_newlines(first).replace(')', "");
    let country = country.trim();
    if country.is_empty() {
        None
    } else {
        Some(country.to_string())
    }
}

/// Comma-splits `text` into trimmed, newline-free, non-empty entries
fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(|entry| strip_newlines(entry).trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Drops a leading "Label:" prefix
fn strip_label(text: &str) -> &str {
    match text.split_once(':') {
        Some((head, rest)) if is_label(head) => rest,
        _ => text,
    }
}

fn is_label(head: &str) -> bool {
    let head = head.trim();
    !head.is_empty() && head.chars().all(|c| c.is_alphabetic() || c == ' ')
}

fn strip_newlines(text: &str) -> String {
    text.replace('\n', "")
}
