//! `---` delimited `key: value` headers at the top of knowledge-base files

use crate::models::{Document, DocumentMetadata};
use std::collections::BTreeMap;

const DELIMITER: &str = "---";

/// Split a leading frontmatter block from the body
///
/// Returns empty fields and the whole input when there is no opening
/// delimiter or the block is never closed.
pub fn split(text: &str) -> (BTreeMap<String, String>, &str) {
    let mut fields = BTreeMap::new();

    let trimmed = text.trim_start_matches('\u{feff}');
    let Some(rest) = strip_delimiter_line(trimmed) else {
        return (fields, text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        offset += line.len();
        let content = line.trim_end_matches(['\r', '\n']);
        if content.trim() == DELIMITER {
            return (fields, &rest[offset..]);
        }
        if let Some((key, value)) = content.split_once(':') {
            let key = key.trim().to_lowercase();
            if !key.is_empty() {
                fields.insert(key, unquote(value.trim()).to_string());
            }
        }
    }

    (BTreeMap::new(), text)
}

/// Build a document from a file's text, filling metadata from frontmatter
pub fn parse_document(filename: &str, text: &str) -> Document {
    let (fields, body) = split(text);
    let mut metadata = DocumentMetadata::new(filename);
    apply_fields(&mut metadata, fields);
    Document::new(body, metadata)
}

pub fn apply_fields(metadata: &mut DocumentMetadata, fields: BTreeMap<String, String>) {
    for (key, value) in fields {
        match key.as_str() {
            "title" => metadata.title = Some(value),
            "url" => metadata.url = Some(value),
            "source" => metadata.source = Some(value),
            "date" => metadata.date = Some(value),
            _ => {
                metadata.extra.insert(key, value);
            }
        }
    }
}

fn strip_delimiter_line(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(DELIMITER)?;
    let rest = rest.trim_start_matches([' ', '\t']);
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

fn unquote(value: &str) -> &str {
    let stripped = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')));
    stripped.unwrap_or(value)
}
