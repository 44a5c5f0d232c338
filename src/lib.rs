//! # Quire
//!
//! A static site generator for essays published as ordered sequences.
//! Markdown documents become pages; documents that share a `sequence` key are
//! stitched together with "Part i of n" banners, previous/next links and a
//! table of contents. Inline "open question" blocks are numbered per document
//! and collected into a site-wide index.
//!
//! # Architecture: Two-Pass Build
//!
//! ```text
//! 1. Metadata   posts/   →  ContentGraph + NavigationTable   (all documents, frozen)
//! 2. Render     graph    →  dist/<url_path>                  (per document, parallel)
//!    Views      results  →  index.html, openquestions.html, feed.xml
//! ```
//!
//! Pass 1 must finish for every document before pass 2 begins for any, because
//! a page's navigation depends on its siblings' resolved metadata. In pass 2
//! documents are independent; each renders, is annotated, and is written as a
//! single step, so a failing document never leaves a partial entry in the
//! aggregate views.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Filename conventions: `YYYY-MM-DD-` and `NN-` prefixes, slug title-casing |
//! | [`metadata`] | Prioritized field resolution: one small resolver per field |
//! | [`frontmatter`] | Frontmatter block parsing into [`frontmatter::DocumentMeta`] |
//! | [`registry`] | `sequence-metadata.yaml` files keyed by sequence id |
//! | [`contributors`] | Author name → profile URL directory and byline markup |
//! | [`graph`] | Pass 1: the frozen document/sequence graph with URL paths |
//! | [`navigation`] | Pass 1: positions, previous/next links, tables of contents |
//! | [`render`] | `Renderer` trait and the built-in Markdown renderer |
//! | [`annotate`] | Pass 2: numbers and anchors open-question blocks |
//! | [`views`] | Home index, open-questions index, RSS feed |
//! | [`pipeline`] | Orchestrates both passes and the views |
//! | [`config`] | `config.toml` loading, merging, validation |
//! | [`types`] | Small shared value types (colors) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Standalone Documents Are Sequences
//!
//! A document without a `sequence` key gets the synthesized key
//! `standalone-<slug>` and lives in a one-member sequence. Every consumer then
//! handles a single shape; whether a page sits at the site root or in a
//! sequence directory is decided by comparing its key with that synthesized
//! key, nothing else.
//!
//! ## Lookup Tables Are Values
//!
//! The sequence registry and the contributor directory are built once per
//! build and passed to whoever reads them. There is no global state, which is
//! what lets pass 2 run on rayon without locks.

pub mod annotate;
pub mod config;
pub mod contributors;
pub mod frontmatter;
pub mod graph;
pub mod metadata;
pub mod naming;
pub mod navigation;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod render;
pub mod types;
pub mod views;

#[cfg(test)]
pub(crate) mod test_helpers;
