//! Content graph: documents grouped into ordered sequences with resolved URLs.
//!
//! The graph is built once, in pass 1, from every document's metadata and the
//! sequence registry. After [`ContentGraph::build`] returns it is read-only;
//! navigation, rendering, and every aggregate view are projections of it.
//!
//! ## URL rule
//!
//! ```text
//! sequence key == standalone-<slug>   →  <slug>.html              prefix ""
//! any other sequence key              →  <sequence>/<slug>.html   prefix "../"
//! ```
//!
//! Aggregate outputs (`index.html`, `openquestions.html`, `feed.xml`) are
//! reserved; a document resolving to one of them is dropped like any other
//! collision.
//!
//! ## Ordering
//!
//! Members are sorted by `sequence_order` with a stable sort, so equal orders
//! keep encounter order (the sorted source path order the pipeline feeds in).
//! Sequences themselves are kept in encounter order of their first document.

use crate::annotate::OPEN_QUESTIONS_PAGE;
use crate::frontmatter::DocumentMeta;
use crate::metadata;
use crate::registry::SequenceRegistry;
use crate::types::Accent;
use crate::views::{feed::FEED_FILE, home::HOME_PAGE};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::warn;

/// Index of a document in [`ContentGraph::documents`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocId(pub usize);

/// Index of a sequence in [`ContentGraph::sequences`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeqId(pub usize);

#[derive(Debug, Clone)]
pub struct Document {
    pub source: PathBuf,
    pub meta: DocumentMeta,
    /// Explicit sequence or the synthesized `standalone-<slug>` key.
    pub sequence_key: String,
    pub sequence: SeqId,
    /// Output path relative to the site root, e.g. `quickstart/intro.html`.
    pub url_path: String,
    /// Relative prefix from this document back to the site root.
    pub path_prefix: &'static str,
}

impl Document {
    pub fn slug(&self) -> &str {
        &self.meta.slug
    }

    pub fn title(&self) -> &str {
        &self.meta.title
    }

    /// Title used in tables of contents and member lists.
    pub fn toc_title(&self) -> &str {
        self.meta.toc_title.as_deref().unwrap_or(&self.meta.title)
    }
}

/// A sequence with registry-or-member-derived presentation metadata.
#[derive(Debug, Clone)]
pub struct Sequence {
    pub key: String,
    pub title: String,
    pub description: String,
    /// Comma-joined author string.
    pub author: String,
    pub date: Option<String>,
    pub accent: Option<Accent>,
    pub emoji: Option<String>,
    /// Members sorted by `sequence_order`, ties in encounter order.
    pub members: Vec<DocId>,
}

/// A document left out of the graph because its URL path was already taken.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedDocument {
    pub source: PathBuf,
    pub url_path: String,
}

#[derive(Debug, Clone, Default)]
pub struct ContentGraph {
    pub documents: Vec<Document>,
    pub sequences: Vec<Sequence>,
    pub dropped: Vec<DroppedDocument>,
    by_key: HashMap<String, SeqId>,
}

impl ContentGraph {
    /// Freeze per-document metadata into the site graph.
    ///
    /// `entries` must be in encounter order; it decides duplicate-order
    /// tiebreaks and which of two colliding URL paths survives.
    pub fn build(entries: Vec<(PathBuf, DocumentMeta)>, registry: &SequenceRegistry) -> Self {
        let mut graph = Self::default();
        let mut taken: HashSet<String> = [HOME_PAGE, OPEN_QUESTIONS_PAGE, FEED_FILE]
            .into_iter()
            .map(String::from)
            .collect();

        for (source, meta) in entries {
            let sequence_key = metadata::resolve_sequence_key(meta.sequence.as_deref(), &meta.slug);
            let (url_path, path_prefix) = url_for(&sequence_key, &meta.slug);

            if !taken.insert(url_path.clone()) {
                warn!(source = %source.display(), url = %url_path, "URL path already taken; dropping document");
                graph.dropped.push(DroppedDocument { source, url_path });
                continue;
            }

            let id = DocId(graph.documents.len());
            let seq = match graph.by_key.get(&sequence_key) {
                Some(&seq) => seq,
                None => {
                    let seq = SeqId(graph.sequences.len());
                    graph.sequences.push(Sequence {
                        key: sequence_key.clone(),
                        title: String::new(),
                        description: String::new(),
                        author: String::new(),
                        date: None,
                        accent: None,
                        emoji: None,
                        members: Vec::new(),
                    });
                    graph.by_key.insert(sequence_key.clone(), seq);
                    seq
                }
            };
            graph.sequences[seq.0].members.push(id);
            graph.documents.push(Document {
                source,
                meta,
                sequence_key,
                sequence: seq,
                url_path,
                path_prefix,
            });
        }

        for seq in 0..graph.sequences.len() {
            graph.order_members(SeqId(seq));
            graph.resolve_presentation(SeqId(seq), registry);
        }
        graph
    }

    fn order_members(&mut self, seq: SeqId) {
        let documents = &self.documents;
        let sequence = &mut self.sequences[seq.0];
        sequence
            .members
            .sort_by_key(|id| documents[id.0].meta.sequence_order);

        let mut seen = HashSet::new();
        for id in &sequence.members {
            let order = documents[id.0].meta.sequence_order;
            if !seen.insert(order) {
                warn!(
                    sequence = %sequence.key,
                    order,
                    slug = %documents[id.0].meta.slug,
                    "duplicate sequence_order; keeping encounter order"
                );
            }
        }
    }

    /// Registry values win; otherwise fall back to the first member.
    fn resolve_presentation(&mut self, seq: SeqId, registry: &SequenceRegistry) {
        let sequence = &self.sequences[seq.0];
        let Some(first) = sequence.members.first().map(|id| &self.documents[id.0].meta) else {
            return;
        };
        let record = registry.get(&sequence.key);
        let registry_authors = record
            .map(|r| r.authors.join(", "))
            .filter(|a| !a.is_empty());

        let title = metadata::resolve(&[record.and_then(|r| r.title.as_deref()), Some(&first.title)])
            .unwrap_or_default();
        let description = metadata::resolve(&[
            record.and_then(|r| r.description.as_deref()),
            first.description.as_deref(),
        ])
        .unwrap_or_default();
        let author = metadata::resolve(&[registry_authors.as_deref(), first.author.as_deref()])
            .unwrap_or_default();
        let date = metadata::resolve(&[record.and_then(|r| r.date.as_deref()), first.date.as_deref()]);
        let accent = record.and_then(|r| metadata::resolve_accent(r.color, r.color_dark));
        let emoji = metadata::resolve(&[
            record.and_then(|r| r.emoji.as_deref()),
            first.emoji.as_deref(),
        ]);

        let sequence = &mut self.sequences[seq.0];
        sequence.title = title;
        sequence.description = description;
        sequence.author = author;
        sequence.date = date;
        sequence.accent = accent;
        sequence.emoji = emoji;
    }

    pub fn document(&self, id: DocId) -> &Document {
        &self.documents[id.0]
    }

    pub fn sequence(&self, id: SeqId) -> &Sequence {
        &self.sequences[id.0]
    }

    pub fn sequence_by_key(&self, key: &str) -> Option<&Sequence> {
        self.by_key.get(key).map(|id| self.sequence(*id))
    }

    /// The sequence a document belongs to.
    pub fn sequence_of(&self, id: DocId) -> &Sequence {
        self.sequence(self.document(id).sequence)
    }

    pub fn ids(&self) -> impl Iterator<Item = DocId> + '_ {
        (0..self.documents.len()).map(DocId)
    }
}

/// Output location for a document: `(url_path, path_prefix)`.
pub fn url_for(sequence_key: &str, slug: &str) -> (String, &'static str) {
    if sequence_key == metadata::standalone_key(slug) {
        (format!("{slug}.html"), "")
    } else {
        (format!("{sequence_key}/{slug}.html"), "../")
    }
}
