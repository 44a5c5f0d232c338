//! Shared test utilities for the quire test suite.
//!
//! Provides document builders and lookup helpers that work with the pass-1
//! structures (`DocumentMeta`, `ContentGraph`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let graph = ContentGraph::build(
//!     vec![doc("intro", Some("quickstart"), 1), doc("about", None, 1)],
//!     &SequenceRegistry::default(),
//! );
//!
//! assert_eq!(find_doc(&graph, "intro").url_path, "quickstart/intro.html");
//! assert_eq!(member_slugs(&graph, "quickstart"), vec!["intro"]);
//! ```

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::annotate::Annotation;
use crate::frontmatter::DocumentMeta;
use crate::graph::{ContentGraph, DocId, Document};
use crate::naming;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Builders
// =========================================================================

/// A graph entry for `posts/<slug>.md` with a title derived from the slug.
pub fn doc(slug: &str, sequence: Option<&str>, order: i64) -> (PathBuf, DocumentMeta) {
    let meta = DocumentMeta {
        slug: slug.to_string(),
        title: naming::title_from_slug(slug),
        date: None,
        author: None,
        description: None,
        sequence: sequence.map(str::to_string),
        sequence_order: order,
        toc_title: None,
        emoji: None,
        body: String::new(),
    };
    (PathBuf::from(format!("posts/{slug}.md")), meta)
}

/// Set the date on a [`doc`] entry.
pub fn dated(mut entry: (PathBuf, DocumentMeta), date: Option<&str>) -> (PathBuf, DocumentMeta) {
    entry.1.date = date.map(str::to_string);
    entry
}

/// Every document in the graph marked as built, with no annotations.
pub fn built_all(graph: &ContentGraph) -> HashMap<DocId, Vec<Annotation>> {
    graph.ids().map(|id| (id, Vec::new())).collect()
}

// =========================================================================
// Log capture
// =========================================================================

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` under a thread-local subscriber and return its warnings as text.
pub fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (result, logs)
}

// =========================================================================
// Graph lookups: panic with a clear message on miss
// =========================================================================

fn slugs(graph: &ContentGraph) -> Vec<&str> {
    graph.documents.iter().map(|d| d.slug()).collect()
}

/// Find a document id by slug. Panics if not found.
pub fn find_id(graph: &ContentGraph, slug: &str) -> DocId {
    graph
        .ids()
        .find(|id| graph.document(*id).slug() == slug)
        .unwrap_or_else(|| {
            let available = slugs(graph);
            panic!("document '{slug}' not found. Available: {available:?}")
        })
}

/// Find a document by slug. Panics if not found.
pub fn find_doc<'a>(graph: &'a ContentGraph, slug: &str) -> &'a Document {
    graph.document(find_id(graph, slug))
}

/// Member slugs of a sequence in member order. Panics if the key is unknown.
pub fn member_slugs<'a>(graph: &'a ContentGraph, key: &str) -> Vec<&'a str> {
    let sequence = graph.sequence_by_key(key).unwrap_or_else(|| {
        let keys: Vec<&str> = graph.sequences.iter().map(|s| s.key.as_str()).collect();
        panic!("sequence '{key}' not found. Available: {keys:?}")
    });
    sequence
        .members
        .iter()
        .map(|id| graph.document(*id).slug())
        .collect()
}
