//! Record types produced by extraction
//!
//! A [`Record`] is immutable once built. Extraction is best-effort, so every
//! record travels with the list of fields that could not be filled, wrapped
//! together in an [`Extraction`].

use serde::Serialize;
use std::fmt;

/// One normalized catalog item
///
/// Serialized field order and names are the bulk document's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub title: String,
    pub summary: String,
    #[serde(rename = "director")]
    pub primary_credit: String,
    pub country: String,
    #[serde(rename = "actors")]
    pub cast: Vec<String>,
    #[serde(rename = "genre")]
    pub categories: Vec<String>,
    /// ISO 8601 date, empty when the page date could not be parsed
    #[serde(rename = "date")]
    pub release_date: String,
    #[serde(rename = "src")]
    pub image_src: String,
    /// Detail page URL; identity of the record within a run
    #[serde(rename = "url")]
    pub source_url: String,
}

/// Record fields that extraction can fail to fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Summary,
    PrimaryCredit,
    Country,
    Cast,
    Categories,
    ReleaseDate,
    ImageSrc,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Summary => "summary",
            Field::PrimaryCredit => "primary_credit",
            Field::Country => "country",
            Field::Cast => "cast",
            Field::Categories => "categories",
            Field::ReleaseDate => "release_date",
            Field::ImageSrc => "image_src",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single field was left empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: Field,
    pub reason: String,
}

impl FieldIssue {
    pub fn new(field: Field, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// A record together with the outcome of each field that fell back to empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub record: Record,
    pub issues: Vec<FieldIssue>,
}

impl Extraction {
    /// True when every field was extracted
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns the issue recorded for `field`, if any
    pub fn issue(&self, field: Field) -> Option<&FieldIssue> {
        self.issues.iter().find(|issue| issue.field == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> Record {
        Record {
            title: "Example Movie".to_string(),
            summary: "A summary.".to_string(),
            primary_credit: "Jane Doe".to_string(),
            country: "USA".to_string(),
            cast: vec!["A".to_string(), "B".to_string()],
            categories: vec!["Drama".to_string()],
            release_date: "2001-06-15".to_string(),
            image_src: "https://img.example.com/p.jpg".to_string(),
            source_url: "https://www.example.com/title/tt0000001/".to_string(),
        }
    }

    #[test]
    fn test_serialized_field_order_and_names() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        let keys = [
            "\"title\"",
            "\"summary\"",
            "\"director\"",
            "\"country\"",
            "\"actors\"",
            "\"genre\"",
            "\"date\"",
            "\"src\"",
            "\"url\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_extraction_completeness() {
        let mut extraction = Extraction {
            record: sample_record(),
            issues: vec![],
        };
        assert!(extraction.is_complete());

        extraction
            .issues
            .push(FieldIssue::new(Field::ReleaseDate, "unparsable date"));
        assert!(!extraction.is_complete());
        assert_eq!(
            extraction.issue(Field::ReleaseDate).map(|i| i.reason.as_str()),
            Some("unparsable date")
        );
        assert!(extraction.issue(Field::Title).is_none());
    }

    #[test]
    fn test_field_issue_display() {
        let issue = FieldIssue::new(Field::Cast, "no credit group labelled Stars");
        assert_eq!(issue.to_string(), "cast: no credit group labelled Stars");
    }
}
