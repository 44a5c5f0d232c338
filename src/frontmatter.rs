//! Frontmatter extraction.
//!
//! A document may open with a flat `key: value` block between two `---` lines:
//!
//! ```text
//! ---
//! title: "Why does SGD generalize?"
//! date: 2024-03-01
//! sequence: quickstart
//! sequence_order: 2
//! ---
//! Body markdown…
//! ```
//!
//! There is no nesting: each line is split at its first colon and surrounding
//! quotes are stripped from the value. Documents without a (closed) block are
//! still accepted; every field then comes from the filename and the body, see
//! [`crate::metadata`] for the fallback chains.

use crate::metadata;
use crate::naming;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed metadata: `{field}` has value {value:?}, expected {expected}")]
    MalformedMetadata {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Per-document metadata as read from one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMeta {
    pub slug: String,
    pub title: String,
    pub date: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    /// Explicit sequence membership, if the document declares one.
    pub sequence: Option<String>,
    pub sequence_order: i64,
    /// Shorter title for tables of contents and member lists.
    pub toc_title: Option<String>,
    pub emoji: Option<String>,
    /// Markdown body with the frontmatter block removed.
    pub body: String,
}

/// Read one document from disk and extract its metadata.
pub fn extract(path: &Path) -> Result<DocumentMeta, ExtractError> {
    let text = fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse(&stem, &text)
}

/// Pure parse of a document's raw text, given its filename stem.
pub fn parse(stem: &str, text: &str) -> Result<DocumentMeta, ExtractError> {
    let (fields, body) = match split_frontmatter(text) {
        Some((block, body)) => (parse_fields(block), body),
        None => (HashMap::new(), text),
    };
    let get = |key: &str| fields.get(key).map(String::as_str);

    let parsed = naming::parse_stem(stem);
    let slug = metadata::resolve_slug(get("slug"), &parsed);
    let title = metadata::resolve_title(get("title"), body, &slug);
    let sequence_order = match get("sequence_order") {
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ExtractError::MalformedMetadata {
                field: "sequence_order",
                value: raw.to_string(),
                expected: "an integer",
            })?,
        None => 1,
    };
    let sequence = metadata::resolve(&[get("sequence")]);
    path_segment("slug", &slug)?;
    if let Some(key) = &sequence {
        path_segment("sequence", key)?;
    }

    Ok(DocumentMeta {
        date: metadata::resolve_date(get("date"), &parsed),
        author: metadata::resolve(&[get("author")]),
        description: metadata::resolve(&[get("description")]),
        sequence,
        toc_title: metadata::resolve(&[get("toc_title")]),
        emoji: metadata::resolve(&[get("emoji")]),
        slug,
        title,
        sequence_order,
        body: body.to_string(),
    })
}

/// Slugs and sequence keys become output path components.
fn path_segment(field: &'static str, value: &str) -> Result<(), ExtractError> {
    if value.trim().is_empty() || value.contains(['/', '\\']) || value.contains("..") {
        return Err(ExtractError::MalformedMetadata {
            field,
            value: value.to_string(),
            expected: "a single path segment",
        });
    }
    Ok(())
}

/// Split `---\n<block>\n---\n<body>` into `(block, body)`.
///
/// Returns `None` when the text doesn't open with a delimiter line or the
/// block is never closed.
fn split_frontmatter(text: &str) -> Option<(&str, &str)> {
    let after_open = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let block = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return Some((block, body));
        }
        offset += line.len();
    }
    None
}

fn parse_fields(block: &str) -> HashMap<String, String> {
    block
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| {
            let value = value.trim().trim_matches(['"', '\'']);
            (key.trim().to_string(), value.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn frontmatter_fields_are_read() {
        let text = "---\ntitle: \"Hello: World\"\ndate: 2024-03-01\nauthor: 'Ada, Bob'\nsequence: s1\nsequence_order: 3\ntoc_title: Hi\n---\nBody text\n";
        let meta = parse("2024-03-01-hello", text).unwrap();
        assert_eq!(meta.title, "Hello: World");
        assert_eq!(meta.date.as_deref(), Some("2024-03-01"));
        assert_eq!(meta.author.as_deref(), Some("Ada, Bob"));
        assert_eq!(meta.sequence.as_deref(), Some("s1"));
        assert_eq!(meta.sequence_order, 3);
        assert_eq!(meta.toc_title.as_deref(), Some("Hi"));
        assert_eq!(meta.slug, "hello");
        assert_eq!(meta.body, "Body text\n");
    }

    #[test]
    fn explicit_slug_wins() {
        let meta = parse("2024-03-01-hello", "---\nslug: custom\n---\n").unwrap();
        assert_eq!(meta.slug, "custom");
    }

    #[test]
    fn numeric_prefix_stripped_from_slug() {
        let meta = parse("02-setup", "---\ntitle: Setup\n---\n").unwrap();
        assert_eq!(meta.slug, "setup");
    }

    #[test]
    fn sequence_order_defaults_to_one() {
        let meta = parse("a", "---\ntitle: A\n---\n").unwrap();
        assert_eq!(meta.sequence_order, 1);
    }

    #[test]
    fn non_numeric_sequence_order_is_malformed() {
        let err = parse("a", "---\nsequence_order: second\n---\n").unwrap_err();
        assert!(matches!(
            err,
            ExtractError::MalformedMetadata { field: "sequence_order", ref value, .. } if value == "second"
        ));
    }

    #[test]
    fn sequence_key_escaping_output_dir_is_malformed() {
        for key in ["../escaped", "a/b", "a\\b", ".."] {
            let text = format!("---\nsequence: \"{key}\"\n---\n");
            let err = parse("x", &text).unwrap_err();
            assert!(
                matches!(err, ExtractError::MalformedMetadata { field: "sequence", .. }),
                "{key:?} accepted"
            );
        }
    }

    #[test]
    fn slug_with_path_separator_is_malformed() {
        let err = parse("x", "---\nslug: ../../etc/x\n---\n").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedMetadata { field: "slug", .. }));
        assert!(err.to_string().contains("single path segment"));
    }

    #[test]
    fn no_frontmatter_derives_from_filename_and_heading() {
        let meta = parse("2023-05-06-derived", "Intro line\n# The Heading\n\ntext").unwrap();
        assert_eq!(meta.slug, "derived");
        assert_eq!(meta.title, "The Heading");
        assert_eq!(meta.date.as_deref(), Some("2023-05-06"));
        assert_eq!(meta.sequence, None);
        assert_eq!(meta.sequence_order, 1);
    }

    #[test]
    fn no_heading_title_cases_slug() {
        let meta = parse("open-problems", "just text").unwrap();
        assert_eq!(meta.title, "Open Problems");
        assert_eq!(meta.date, None);
    }

    #[test]
    fn unclosed_block_falls_back() {
        let meta = parse("orphan", "---\ntitle: Never closed\n# Real Title\n").unwrap();
        assert_eq!(meta.title, "Real Title");
        assert_eq!(meta.slug, "orphan");
    }

    #[test]
    fn crlf_frontmatter_accepted() {
        let meta = parse("x", "---\r\ntitle: Windows\r\n---\r\nbody").unwrap();
        assert_eq!(meta.title, "Windows");
        assert_eq!(meta.body, "body");
    }

    #[test]
    fn lines_without_colon_and_empty_values_ignored() {
        let meta = parse("x", "---\njust words\nsequence:\n---\n").unwrap();
        assert_eq!(meta.sequence, None);
    }

    #[test]
    fn extract_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("01-first.md");
        fs::write(&path, "---\nsequence: s1\n---\n# First\n").unwrap();
        let meta = extract(&path).unwrap();
        assert_eq!(meta.slug, "first");
        assert_eq!(meta.title, "First");
    }

    #[test]
    fn extract_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = extract(&tmp.path().join("missing.md")).unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
    }
}
