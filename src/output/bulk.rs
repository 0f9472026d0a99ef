//! Bulk-load document output
//!
//! Each record becomes two lines: an index action naming the document id,
//! followed by the record itself as compact JSON.
//!
//! ```text
//! {"index":{"_id": "tt0111161"}}
//! {"title":"The Shawshank Redemption","summary":"...","director":"Frank Darabont",...}
//! ```

use crate::output::OutputResult;
use crate::record::Record;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Position of the id in the URL split on `/`:
/// `https:` / `` / host / `title` / **id** / ...
const ID_SEGMENT: usize = 4;

/// Returns the document id embedded in a detail-page URL
///
/// `https://www.imdb.com/title/tt0111161/` gives `tt0111161`. Returns `None`
/// when the URL is too short or the segment is empty.
pub fn document_id(source_url: &str) -> Option<&str> {
    source_url
        .split('/')
        .nth(ID_SEGMENT)
        .filter(|segment| !segment.is_empty())
}

/// Index action for one document, `{"index":{"_id": "<id>"}}`
///
/// The id is JSON-escaped; the surrounding layout is fixed.
fn action_line(id: &str) -> OutputResult<String> {
    Ok(format!(r#"{{"index":{{"_id": {}}}}}"#, serde_json::to_string(id)?))
}

/// Writes `records` as bulk-load lines to any writer
///
/// A record whose URL carries no id segment is indexed under its full URL.
pub fn write_bulk<W: Write>(mut writer: W, records: &[Record]) -> OutputResult<()> {
    for record in records {
        let id = match document_id(&record.source_url) {
            Some(id) => id,
            None => {
                tracing::warn!(
                    "No id segment in {}, using the full URL as document id",
                    record.source_url
                );
                record.source_url.as_str()
            }
        };

        writeln!(writer, "{}", action_line(id)?)?;

        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}

/// Formats `records` as a bulk-load document in memory
pub fn format_bulk(records: &[Record]) -> OutputResult<String> {
    let mut buffer = Vec::new();
    write_bulk(&mut buffer, records)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Writes the bulk-load document to a fixed path
#[derive(Debug, Clone)]
pub struct BulkWriter {
    path: PathBuf,
}

impl BulkWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates or truncates the file and writes every record
    pub fn write(&self, records: &[Record]) -> OutputResult<()> {
        let file = File::create(&self.path)?;
        write_bulk(BufWriter::new(file), records)
    }
}
