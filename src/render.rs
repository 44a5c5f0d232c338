//! Document rendering.
//!
//! The build treats rendering as a collaborator behind the [`Renderer`] trait:
//! it receives a document body and a [`RenderContext`] and returns a complete
//! page. The crate ships one implementation, [`MarkdownRenderer`], which
//! converts Markdown with pulldown-cmark and lays the page out with Maud.
//!
//! ## Question blocks
//!
//! Question blocks can be written either as raw HTML or as Pandoc-style fenced
//! divs, which are translated before conversion:
//!
//! ```text
//! ::: question-box                     <div class="question-box">
//! **Open question: Why?** Body.   →    (blank line) …markdown… (blank line)
//! :::                                  </div>
//! ```
//!
//! ## Placeholders
//!
//! A fixed set of `{{TOKEN}}` placeholders is substituted into every body
//! before rendering; see [`Placeholders`].

use crate::config::SiteConfig;
use crate::navigation::SequenceNav;
use crate::types::Accent;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("render failed: {0}")]
    Failed(String),
}

/// Per-document inputs a renderer may use.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub site_title: &'a str,
    pub title: &'a str,
    pub date: Option<&'a str>,
    /// Author string as written.
    pub author: &'a str,
    /// Author string with contributor links, already escaped.
    pub author_html: Markup,
    /// Relative prefix back to the site root (`""` or `"../"`).
    pub path_prefix: &'a str,
    pub sequence_key: &'a str,
    /// Present only for members of multi-document sequences.
    pub nav: Option<&'a SequenceNav>,
    pub accent: Option<Accent>,
}

pub trait Renderer: Sync {
    fn render(&self, body: &str, ctx: &RenderContext<'_>) -> Result<String, RenderError>;
}

/// Fixed, build-wide `{{TOKEN}}` → value substitutions.
#[derive(Debug, Clone)]
pub struct Placeholders {
    pairs: Vec<(&'static str, String)>,
}

impl Placeholders {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            pairs: vec![
                ("{{WHITEPAPER_URL}}", config.site.whitepaper_url.clone()),
                ("{{SITE_URL}}", config.site.url.clone()),
            ],
        }
    }

    pub fn apply(&self, body: &str) -> String {
        self.pairs
            .iter()
            .fold(body.to_string(), |acc, (token, value)| acc.replace(token, value))
    }
}

/// Markdown → HTML page renderer.
#[derive(Debug, Default, Clone)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, body: &str, ctx: &RenderContext<'_>) -> Result<String, RenderError> {
        let body_html = markdown_to_html(&expand_fenced_divs(body));
        Ok(post_document(ctx, &body_html).into_string())
    }
}

pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_FOOTNOTES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

/// Translate `::: name` / `::: {.name}` fences into raw div blocks.
///
/// Blank lines are put around the generated tags so the enclosed text is still
/// parsed as Markdown. Unbalanced closing fences are left as text, and so is
/// anything inside a fenced code block.
pub fn expand_fenced_divs(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut depth = 0usize;
    let mut code_fence: Option<(char, usize)> = None;
    for line in markdown.lines() {
        let trimmed = line.trim();
        let marker = code_marker(trimmed);
        if let Some((marker, len)) = marker {
            code_fence = match code_fence {
                None => Some((marker, len)),
                Some((open, open_len))
                    if open == marker && len >= open_len && trimmed.len() == len =>
                {
                    None
                }
                inside => inside,
            };
        }
        if marker.is_some() || code_fence.is_some() {
            out.push_str(line);
            out.push('\n');
            continue;
        }
        match fence_class(trimmed) {
            Some(Some(class)) => {
                depth += 1;
                out.push_str(&format!("<div class=\"{class}\">\n\n"));
            }
            Some(None) if depth > 0 => {
                depth -= 1;
                out.push_str("\n</div>\n\n");
            }
            _ => {
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    out
}

/// Backtick or tilde run of three or more opening a line.
fn code_marker(line: &str) -> Option<(char, usize)> {
    let marker = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = line.chars().take_while(|c| *c == marker).count();
    (len >= 3).then_some((marker, len))
}

/// `Some(Some(class))` for an opening fence, `Some(None)` for a closing one.
fn fence_class(line: &str) -> Option<Option<&str>> {
    if !line.starts_with(":::") {
        return None;
    }
    let rest = line.trim_start_matches(':').trim();
    if rest.is_empty() {
        return Some(None);
    }
    let class = rest
        .strip_prefix("{.")
        .and_then(|r| r.strip_suffix('}'))
        .unwrap_or(rest)
        .trim();
    let valid = !class.is_empty()
        && class
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(Some(class))
}

// ============================================================================
// Page layout
// ============================================================================

fn post_document(ctx: &RenderContext<'_>, body_html: &str) -> Markup {
    let prefix = ctx.path_prefix;
    let page_title = format!("{} | {}", ctx.title, ctx.site_title);
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page_title) }
                link rel="stylesheet" href={ (prefix) "static/style.css" };
                link rel="alternate" type="application/rss+xml" title=(ctx.site_title) href={ (prefix) "feed.xml" };
            }
            body id="top" {
                header.site-header {
                    a href={ (prefix) "index.html" } { (ctx.site_title) }
                }
                main.post {
                    article {
                        @if let Some(nav) = ctx.nav {
                            (sequence_banner(nav, prefix))
                        }
                        h1.post-title { (ctx.title) }
                        (byline(ctx))
                        div.post-body { (PreEscaped(body_html)) }
                        @if let Some(nav) = ctx.nav {
                            (prev_next(nav, prefix))
                            (sequence_toc(nav, ctx))
                        }
                    }
                }
            }
        }
    }
}

fn byline(ctx: &RenderContext<'_>) -> Markup {
    html! {
        div.post-meta {
            @if !ctx.author.trim().is_empty() {
                span.post-author { (ctx.author_html) }
            }
            @if let Some(date) = ctx.date {
                span.post-date { (date) }
            }
        }
    }
}

fn sequence_banner(nav: &SequenceNav, prefix: &str) -> Markup {
    html! {
        div.sequence-banner {
            "Part " (nav.position) " of " (nav.total) " in "
            a href={ (prefix) (nav.first_url) } { em { (nav.sequence_title) } }
        }
    }
}

fn prev_next(nav: &SequenceNav, prefix: &str) -> Markup {
    html! {
        nav.sequence-nav {
            @if let Some(prev) = &nav.prev {
                a.prev href={ (prefix) (prev.url) } { "← " (prev.position) ". " (prev.title) }
            }
            @if let Some(next) = &nav.next {
                a.next href={ (prefix) (next.url) } { (next.position) ". " (next.title) " →" }
            }
        }
    }
}

fn sequence_toc(nav: &SequenceNav, ctx: &RenderContext<'_>) -> Markup {
    let accent_class = ctx
        .accent
        .map(|_| format!("sequence-toc-{}", ctx.sequence_key));
    let class = match &accent_class {
        Some(c) => format!("sequence-toc {c}"),
        None => "sequence-toc".to_string(),
    };
    html! {
        hr;
        @if let (Some(accent), Some(c)) = (ctx.accent, &accent_class) {
            style { (PreEscaped(accent.css_rules(c))) }
        }
        div class=(class) {
            h3 { (nav.sequence_title) }
            ol {
                @for entry in &nav.toc {
                    li {
                        @if entry.current {
                            strong { (entry.title) }
                        } @else {
                            a href={ (ctx.path_prefix) (entry.url) } { (entry.title) }
                        }
                    }
                }
            }
        }
        div.back-to-top { a href="#top" { "↑" } }
    }
}
