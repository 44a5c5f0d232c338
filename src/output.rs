//! CLI output formatting for the build and check commands.
//!
//! Output is **information-centric, not file-centric**: each document is shown
//! by its position and title first, with its output path after `→` and its
//! source file as an indented `Source:` line.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Sequences
//! 001 Quickstart (2 documents)
//!     001 Intro → quickstart/intro.html
//!         Source: posts/quickstart/01-intro.md
//!     002 Setup → quickstart/setup.html
//!         Source: posts/quickstart/02-setup.md
//! 002 Hello
//!     001 Hello → hello.html
//!         Source: posts/2024-03-01-hello.md
//!
//! Skipped
//!     posts/broken.md: malformed metadata: ...
//! ```
//!
//! ## Build
//!
//! ```text
//! ✓ Intro → quickstart/intro.html (2 open questions)
//! ✗ posts/broken.md: render failed: ...
//! - posts/dupe.md: URL path hello.html already taken
//!
//! Home → index.html (2 sequences)
//! Open questions → openquestions.html (2 questions)
//! Feed → feed.xml (3 items)
//! Build complete! Generated 3 documents.
//! ```
//!
//! Each `format_*` function returns `Vec<String>` and does no I/O; the
//! `print_*` wrappers write those lines to stdout.

use crate::annotate::OPEN_QUESTIONS_PAGE;
use crate::pipeline::{BuildEvent, BuildReport, Site};
use crate::views::{feed::FEED_FILE, home::HOME_PAGE};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Check
// ============================================================================

/// Resolved graph: sequences in discovery order, members in position order.
pub fn format_check_output(site: &Site) -> Vec<String> {
    let graph = &site.graph;
    let mut lines = vec!["Sequences".to_string()];

    for (i, sequence) in graph.sequences.iter().enumerate() {
        let count = sequence.members.len();
        if count > 1 {
            lines.push(format!(
                "{} {} ({})",
                format_index(i + 1),
                sequence.title,
                plural(count, "document", "documents")
            ));
        } else {
            lines.push(format!("{} {}", format_index(i + 1), sequence.title));
        }
        for (pos, id) in sequence.members.iter().enumerate() {
            let doc = graph.document(*id);
            lines.push(format!(
                "{}{} {} \u{2192} {}",
                indent(1),
                format_index(pos + 1),
                doc.toc_title(),
                doc.url_path
            ));
            lines.push(format!("{}Source: {}", indent(2), doc.source.display()));
        }
    }

    if !site.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for skip in &site.skipped {
            lines.push(format!("{}{}: {}", indent(1), skip.source.display(), skip.reason));
        }
    }
    lines
}

pub fn print_check_output(site: &Site) {
    for line in format_check_output(site) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::DocumentBuilt {
            url_path,
            title,
            annotations,
        } => {
            let mut line = format!("\u{2713} {} \u{2192} {}", title, url_path);
            if *annotations > 0 {
                line.push_str(&format!(
                    " ({})",
                    plural(*annotations, "open question", "open questions")
                ));
            }
            vec![line]
        }
        BuildEvent::DocumentFailed { source, error } => {
            vec![format!("\u{2717} {}: {}", source.display(), error)]
        }
        BuildEvent::DocumentSkipped { source, reason } => {
            vec![format!("- {}: {}", source.display(), reason)]
        }
    }
}

pub fn format_build_summary(report: &BuildReport) -> Vec<String> {
    let views = &report.views;
    let mut lines = vec![
        String::new(),
        format!(
            "Home \u{2192} {} ({})",
            HOME_PAGE,
            plural(views.home_sequences, "sequence", "sequences")
        ),
        format!(
            "Open questions \u{2192} {} ({})",
            OPEN_QUESTIONS_PAGE,
            plural(views.annotations, "question", "questions")
        ),
        format!(
            "Feed \u{2192} {} ({})",
            FEED_FILE,
            plural(views.feed_items, "item", "items")
        ),
    ];
    if report.failed > 0 || report.skipped > 0 {
        lines.push(format!(
            "{} failed, {} skipped",
            report.failed, report.skipped
        ));
    }
    lines.push(format!(
        "Build complete! Generated {} documents.",
        report.built
    ));
    lines
}

pub fn print_build_summary(report: &BuildReport) {
    for line in format_build_summary(report) {
        println!("{}", line);
    }
}
