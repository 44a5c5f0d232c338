//! Two-pass site build.
//!
//! ```text
//! Pass 1  posts/*.md ─► DocumentMeta ─► ContentGraph ─► NavigationTable   (sequential, frozen)
//! Pass 2  each document: render ─► annotate ─► write                      (parallel, independent)
//! Views   home index, annotation index, feed                              (built documents only)
//! ```
//!
//! Pass 1 finishes for every document before pass 2 starts for any, since a
//! page's navigation depends on its siblings. In pass 2 a document either
//! produces its page and its annotations together or contributes nothing.
//!
//! Per-document problems are reported as [`BuildEvent`]s and never abort the
//! build; only filesystem-level failures surface as [`BuildError`].

use crate::annotate::{self, Annotation};
use crate::config::{self, ConfigError, SiteConfig};
use crate::contributors::ContributorDirectory;
use crate::frontmatter;
use crate::graph::{ContentGraph, DocId};
use crate::navigation::NavigationTable;
use crate::registry::SequenceRegistry;
use crate::render::{MarkdownRenderer, Placeholders, RenderContext, RenderError, Renderer};
use crate::views::{self, SiteView, ViewsReport};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Content root not found: {0}")]
    ContentRootMissing(PathBuf),
    #[error("Cannot read content directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Progress reported while the build runs.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    DocumentBuilt {
        url_path: String,
        title: String,
        annotations: usize,
    },
    DocumentFailed {
        source: PathBuf,
        error: String,
    },
    DocumentSkipped {
        source: PathBuf,
        reason: String,
    },
}

/// A source file that never made it into the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedDocument {
    /// Path relative to the site root.
    pub source: PathBuf,
    pub reason: String,
}

/// Everything pass 1 produces. Read-only once constructed.
pub struct Site {
    pub config: SiteConfig,
    pub contributors: ContributorDirectory,
    pub graph: ContentGraph,
    pub navigation: NavigationTable,
    pub skipped: Vec<SkippedDocument>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub built: usize,
    pub failed: usize,
    pub skipped: usize,
    pub views: ViewsReport,
}

/// Run both passes with the built-in Markdown renderer.
pub fn build(
    source: &Path,
    output_dir: &Path,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildReport, BuildError> {
    let site = load_site(source)?;
    build_site(&site, &MarkdownRenderer, output_dir, events)
}

/// All Markdown sources under `posts_dir`, in sorted path order.
pub fn discover_documents(posts_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(posts_dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "md")
        {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

/// Pass 1: config, lookup tables, metadata, graph, navigation.
pub fn load_site(source: &Path) -> Result<Site, BuildError> {
    if !source.is_dir() {
        return Err(BuildError::ContentRootMissing(source.to_path_buf()));
    }
    let config = config::load_config(source)?;
    let posts_dir = source.join(&config.content.posts_dir);
    if !posts_dir.is_dir() {
        return Err(BuildError::ContentRootMissing(posts_dir));
    }

    let registry = SequenceRegistry::load(&posts_dir);
    let contributors = ContributorDirectory::load(&source.join(&config.content.contributors_file))
        .with_team(&config.site.team_name, &config.site.team_url);

    let mut entries = Vec::new();
    let mut skipped = Vec::new();
    for path in discover_documents(&posts_dir)? {
        let relative = path.strip_prefix(source).unwrap_or(&path).to_path_buf();
        match frontmatter::extract(&path) {
            Ok(meta) => entries.push((relative, meta)),
            Err(err) => {
                warn!(source = %relative.display(), %err, "skipping document");
                skipped.push(SkippedDocument {
                    source: relative,
                    reason: err.to_string(),
                });
            }
        }
    }

    let graph = ContentGraph::build(entries, &registry);
    skipped.extend(graph.dropped.iter().map(|d| SkippedDocument {
        source: d.source.clone(),
        reason: format!("URL path {} already taken", d.url_path),
    }));
    let navigation = NavigationTable::resolve(&graph);
    debug!(
        documents = graph.documents.len(),
        sequences = graph.sequences.len(),
        navigable = navigation.len(),
        "content graph frozen"
    );

    Ok(Site {
        config,
        contributors,
        graph,
        navigation,
        skipped,
    })
}

/// Pass 2 and the aggregate views, for a site already loaded by [`load_site`].
pub fn build_site(
    site: &Site,
    renderer: &impl Renderer,
    output_dir: &Path,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildReport, BuildError> {
    fs::create_dir_all(output_dir)?;
    let emit = |event: BuildEvent| {
        if let Some(tx) = &events {
            tx.send(event).ok();
        }
    };

    for skip in &site.skipped {
        emit(BuildEvent::DocumentSkipped {
            source: skip.source.clone(),
            reason: skip.reason.clone(),
        });
    }

    let placeholders = Placeholders::from_config(&site.config);
    let ids: Vec<DocId> = site.graph.ids().collect();
    let results: Vec<(DocId, Result<Vec<Annotation>, RenderError>)> = ids
        .par_iter()
        .map(|&id| {
            let result = build_document(site, renderer, &placeholders, id, output_dir);
            let doc = site.graph.document(id);
            emit(match &result {
                Ok(annotations) => BuildEvent::DocumentBuilt {
                    url_path: doc.url_path.clone(),
                    title: doc.title().to_string(),
                    annotations: annotations.len(),
                },
                Err(err) => BuildEvent::DocumentFailed {
                    source: doc.source.clone(),
                    error: err.to_string(),
                },
            });
            (id, result)
        })
        .collect();

    let mut built: HashMap<DocId, Vec<Annotation>> = HashMap::new();
    let mut failed = 0;
    for (id, result) in results {
        match result {
            Ok(annotations) => {
                built.insert(id, annotations);
            }
            Err(err) => {
                warn!(source = %site.graph.document(id).source.display(), %err, "render failed");
                failed += 1;
            }
        }
    }

    let view = SiteView {
        graph: &site.graph,
        config: &site.config,
        contributors: &site.contributors,
        built: &built,
    };
    let views = views::write_all(&view, output_dir)?;

    Ok(BuildReport {
        built: built.len(),
        failed,
        skipped: site.skipped.len(),
        views,
    })
}

/// Render, annotate and write one document.
fn build_document(
    site: &Site,
    renderer: &impl Renderer,
    placeholders: &Placeholders,
    id: DocId,
    output_dir: &Path,
) -> Result<Vec<Annotation>, RenderError> {
    let doc = site.graph.document(id);
    let sequence = site.graph.sequence_of(id);
    let author = doc
        .meta
        .author
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or(&site.config.site.default_author);

    let ctx = RenderContext {
        site_title: &site.config.site.title,
        title: doc.title(),
        date: doc.meta.date.as_deref(),
        author,
        author_html: site.contributors.author_markup(author),
        path_prefix: doc.path_prefix,
        sequence_key: &doc.sequence_key,
        nav: site.navigation.get(id),
        accent: sequence.accent,
    };

    let page = renderer.render(&placeholders.apply(&doc.meta.body), &ctx)?;
    let indexed = annotate::index(&page, doc.meta.sequence_order, doc.path_prefix);
    write_atomic(&output_dir.join(&doc.url_path), &indexed.html)?;
    Ok(indexed.annotations)
}

/// Write via a sibling temp file and rename, so a page is either absent or
/// complete.
fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}
