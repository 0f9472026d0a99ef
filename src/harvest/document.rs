//! Parsed page documents
//!
//! [`Document`] wraps a `scraper` HTML tree and exposes the handful of
//! selector queries the extractor and index collector need. The markup
//! engine is lenient, so the only hard parse failure is an empty body.

use scraper::{Html, Selector};
use thiserror::Error;

/// Errors that can occur while parsing a fetched page
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Empty document from {url}")]
    EmptyDocument { url: String },
}

/// A queryable HTML tree
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a raw page body fetched from `url`
    pub fn parse(url: &str, raw: &str) -> Result<Self, ParseError> {
        if raw.trim().is_empty() {
            return Err(ParseError::EmptyDocument {
                url: url.to_string(),
            });
        }

        Ok(Self {
            html: Html::parse_document(raw),
        })
    }

    /// Text content of the first element matching `selector`
    pub fn text(&self, selector: &Selector) -> Option<String> {
        self.html
            .select(selector)
            .next()
            .map(|element| element.text().collect::<String>())
    }

    /// Text content of every element matching `selector`, in document order
    pub fn texts(&self, selector: &Selector) -> Vec<String> {
        self.html
            .select(selector)
            .map(|element| element.text().collect::<String>())
            .collect()
    }

    /// Attribute `name` of the first element matching `selector`
    pub fn attr(&self, selector: &Selector, name: &str) -> Option<String> {
        self.html
            .select(selector)
            .next()
            .and_then(|element| element.value().attr(name))
            .map(str::to_string)
    }

    /// Attribute `name` of every matching element that carries it
    pub fn attrs(&self, selector: &Selector, name: &str) -> Vec<String> {
        self.html
            .select(selector)
            .filter_map(|element| element.value().attr(name))
            .map(str::to_string)
            .collect()
    }
}
