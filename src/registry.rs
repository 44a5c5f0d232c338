//! Sequence registry.
//!
//! Every directory under the posts root may hold a `sequence-metadata.yaml`
//! describing the sequence its documents belong to:
//!
//! ```yaml
//! sequence_id: quickstart
//! title: Quickstart
//! description: Five short essays to get oriented.
//! authors: [Ada Lovelace, Charles Babbage]
//! date: 2024-02-01
//! sequence_color: [230, 240, 255]
//! sequence_color_dark: [20, 30, 60]
//! sequence_emoji: fa-rocket
//! ```
//!
//! Loading never fails the build: a file that can't be read, isn't valid YAML,
//! or lacks `sequence_id` is skipped with a warning and the sequence falls back
//! to metadata derived from its documents.

use crate::types::Rgb;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// File name of a sequence description.
pub const SEQUENCE_FILE: &str = "sequence-metadata.yaml";

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("missing `sequence_id` in {0}")]
    MissingSequenceIdentifier(PathBuf),
}

/// Raw on-disk shape. Colors stay untyped so a bad triple only drops the color.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRecord {
    sequence_id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    authors: Vec<String>,
    date: Option<String>,
    sequence_color: Option<serde_yaml::Value>,
    sequence_color_dark: Option<serde_yaml::Value>,
    sequence_emoji: Option<String>,
}

/// One parsed sequence description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceRecord {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub authors: Vec<String>,
    pub date: Option<String>,
    pub color: Option<Rgb>,
    pub color_dark: Option<Rgb>,
    pub emoji: Option<String>,
}

/// Read-only lookup of sequence descriptions by identifier.
#[derive(Debug, Clone, Default)]
pub struct SequenceRegistry {
    records: HashMap<String, SequenceRecord>,
}

impl SequenceRegistry {
    /// Scan `root` recursively for sequence description files.
    ///
    /// Files are visited in sorted path order; if two files declare the same
    /// identifier the later one wins.
    pub fn load(root: &Path) -> Self {
        let mut registry = Self::default();
        let files = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(err) => {
                    warn!(%err, "skipping unreadable entry while scanning for sequences");
                    None
                }
            })
            .filter(|e| e.file_type().is_file() && e.file_name() == SEQUENCE_FILE);

        for entry in files {
            match load_record(entry.path()) {
                Ok(record) => {
                    debug!(id = %record.id, path = %entry.path().display(), "loaded sequence");
                    registry.insert(record);
                }
                Err(err) => {
                    warn!(path = %entry.path().display(), %err, "skipping sequence description");
                }
            }
        }
        registry
    }

    pub fn insert(&mut self, record: SequenceRecord) {
        if let Some(previous) = self.records.insert(record.id.clone(), record) {
            warn!(id = %previous.id, "sequence declared more than once; the later description wins");
        }
    }

    pub fn get(&self, id: &str) -> Option<&SequenceRecord> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse a single sequence description file.
pub fn load_record(path: &Path) -> Result<SequenceRecord, RegistryError> {
    let content = fs::read_to_string(path)?;
    parse_record(&content).map_err(|err| match err {
        RegistryError::MissingSequenceIdentifier(_) => {
            RegistryError::MissingSequenceIdentifier(path.to_path_buf())
        }
        other => other,
    })
}

fn parse_record(content: &str) -> Result<SequenceRecord, RegistryError> {
    let raw: RawRecord = if content.trim().is_empty() {
        RawRecord::default()
    } else {
        // A null document (e.g. `~`) reads like an empty mapping.
        serde_yaml::from_str::<Option<RawRecord>>(content)?.unwrap_or_default()
    };
    let id = raw
        .sequence_id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RegistryError::MissingSequenceIdentifier(PathBuf::new()))?;

    Ok(SequenceRecord {
        id,
        title: raw.title,
        description: raw.description,
        authors: raw.authors,
        date: raw.date,
        color: raw.sequence_color.as_ref().and_then(Rgb::from_yaml),
        color_dark: raw.sequence_color_dark.as_ref().and_then(Rgb::from_yaml),
        emoji: raw.sequence_emoji,
    })
}
