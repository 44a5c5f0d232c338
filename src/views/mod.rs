//! Aggregate views: read-only projections of the graph and the annotations
//! collected in pass 2.
//!
//! | View | Output | Module |
//! |------|--------|--------|
//! | Home index | `index.html` | [`home`] |
//! | Annotation index | `openquestions.html` | [`questions`] |
//! | Feed | `feed.xml` | [`feed`] |
//!
//! Only documents that rendered successfully appear in any view. All three
//! share [`SiteView::sequences_by_date`], so the home page and the annotation
//! index list sequences in the same order.

pub mod feed;
pub mod home;
pub mod questions;

use crate::annotate::Annotation;
use crate::config::SiteConfig;
use crate::contributors::ContributorDirectory;
use crate::graph::{ContentGraph, DocId, Document, Sequence};
use chrono::NaiveDate;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// The built site as seen by the aggregate generators.
pub struct SiteView<'a> {
    pub graph: &'a ContentGraph,
    pub config: &'a SiteConfig,
    pub contributors: &'a ContributorDirectory,
    /// Annotations per successfully built document. Absent = not built.
    pub built: &'a HashMap<DocId, Vec<Annotation>>,
}

/// A sequence restricted to its built members, in member order.
pub struct SequenceView<'a> {
    pub sequence: &'a Sequence,
    pub members: Vec<(DocId, &'a Document)>,
}

impl<'a> SequenceView<'a> {
    pub fn first_url(&self) -> &'a str {
        self.members
            .first()
            .map(|&(_, d)| d.url_path.as_str())
            .unwrap_or("#")
    }

    /// Effective date: registry date, else first member's date, else empty.
    pub fn date(&self) -> &'a str {
        self.sequence.date.as_deref().unwrap_or("")
    }
}

/// Files written by [`write_all`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewsReport {
    pub home_sequences: usize,
    pub annotations: usize,
    pub feed_items: usize,
}

impl<'a> SiteView<'a> {
    pub fn is_built(&self, id: DocId) -> bool {
        self.built.contains_key(&id)
    }

    pub fn annotations(&self, id: DocId) -> &'a [Annotation] {
        self.built.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sequences with at least one built member whose slug isn't excluded,
    /// sorted by effective date descending (stable; empty dates last).
    pub fn sequences_by_date(&self, exclude_slugs: &[String]) -> Vec<SequenceView<'a>> {
        let graph = self.graph;
        let mut views: Vec<SequenceView<'a>> = graph
            .sequences
            .iter()
            .map(|sequence| SequenceView {
                sequence,
                members: sequence
                    .members
                    .iter()
                    .filter(|id| self.is_built(**id))
                    .map(|id| (*id, graph.document(*id)))
                    .filter(|(_, d)| !exclude_slugs.iter().any(|s| s == d.slug()))
                    .collect(),
            })
            .filter(|v| !v.members.is_empty())
            .collect();
        views.sort_by(|a, b| b.date().cmp(a.date()));
        views
    }

    /// Built documents in graph order.
    pub fn built_documents(&self) -> impl Iterator<Item = (DocId, &'a Document)> + '_ {
        self.graph
            .ids()
            .filter(|id| self.is_built(*id))
            .map(|id| (id, self.graph.document(id)))
    }
}

/// Render and write every aggregate view into `output_dir`.
pub fn write_all(view: &SiteView<'_>, output_dir: &Path) -> std::io::Result<ViewsReport> {
    let home = home::render(view);
    fs::write(output_dir.join(home::HOME_PAGE), home.markup.into_string())?;

    let questions = questions::render(view);
    fs::write(
        output_dir.join(crate::annotate::OPEN_QUESTIONS_PAGE),
        questions.markup.into_string(),
    )?;

    let feed = feed::render(view);
    fs::write(output_dir.join(feed::FEED_FILE), feed.markup.into_string())?;

    Ok(ViewsReport {
        home_sequences: home.sequences,
        annotations: questions.annotations,
        feed_items: feed.items,
    })
}

/// `2024-03-01` → `March 01, 2024`; anything unparseable is returned as is.
pub fn display_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.format("%B %d, %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Shared page shell for root-level aggregate pages.
fn site_page(config: &SiteConfig, title: &str, extra_css: Option<&str>, content: Markup) -> Markup {
    let page_title = if title == config.site.title {
        title.to_string()
    } else {
        format!("{} | {}", title, config.site.title)
    };
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page_title) }
                @if !config.site.description.is_empty() {
                    meta name="description" content=(config.site.description);
                }
                link rel="stylesheet" href="static/style.css";
                link rel="alternate" type="application/rss+xml" title=(config.site.title) href=(feed::FEED_FILE);
                @if let Some(css) = extra_css {
                    style { (PreEscaped(css)) }
                }
            }
            body {
                header.site-header {
                    a href=(home::HOME_PAGE) { (config.site.title) }
                    " "
                    a href=(crate::annotate::OPEN_QUESTIONS_PAGE) { "Open questions" }
                }
                (content)
            }
        }
    }
}
