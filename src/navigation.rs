//! Sequence navigation: prev/next edges and tables of contents.
//!
//! Only sequences with more than one member get navigation. For the member
//! at 0-based index `i` of `n`:
//!
//! ```text
//! previous = members[i-1]  if i > 0
//! next     = members[i+1]  if i < n-1
//! ```
//!
//! The table is a pure function of the frozen graph and must be resolved for
//! every document before any document is rendered, because each page links
//! to its siblings.

use crate::graph::{ContentGraph, DocId};
use std::collections::HashMap;

/// A neighbouring member of the same sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct NavLink {
    pub title: String,
    pub slug: String,
    /// URL path relative to the site root.
    pub url: String,
    /// 1-based position in the sequence.
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    pub title: String,
    pub url: String,
    pub current: bool,
}

/// Everything a page needs to link itself into its sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceNav {
    pub sequence_title: String,
    /// 1-based position of this document.
    pub position: usize,
    pub total: usize,
    pub first_url: String,
    pub prev: Option<NavLink>,
    pub next: Option<NavLink>,
    pub toc: Vec<TocEntry>,
}

/// Navigation for every document that has any; standalone and other
/// single-member sequences have no entry.
#[derive(Debug, Clone, Default)]
pub struct NavigationTable {
    entries: HashMap<DocId, SequenceNav>,
}

impl NavigationTable {
    pub fn resolve(graph: &ContentGraph) -> Self {
        let mut entries = HashMap::new();
        for sequence in graph.sequences.iter().filter(|s| s.members.len() > 1) {
            let total = sequence.members.len();
            let link = |idx: usize| {
                let doc = graph.document(sequence.members[idx]);
                NavLink {
                    title: doc.title().to_string(),
                    slug: doc.slug().to_string(),
                    url: doc.url_path.clone(),
                    position: idx + 1,
                }
            };
            let first_url = graph.document(sequence.members[0]).url_path.clone();

            for (idx, &id) in sequence.members.iter().enumerate() {
                let toc = sequence
                    .members
                    .iter()
                    .map(|&member| {
                        let doc = graph.document(member);
                        TocEntry {
                            title: doc.toc_title().to_string(),
                            url: doc.url_path.clone(),
                            current: member == id,
                        }
                    })
                    .collect();
                entries.insert(
                    id,
                    SequenceNav {
                        sequence_title: sequence.title.clone(),
                        position: idx + 1,
                        total,
                        first_url: first_url.clone(),
                        prev: (idx > 0).then(|| link(idx - 1)),
                        next: (idx + 1 < total).then(|| link(idx + 1)),
                        toc,
                    },
                );
            }
        }
        Self { entries }
    }

    pub fn get(&self, id: DocId) -> Option<&SequenceNav> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
