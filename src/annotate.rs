//! Open-question annotation indexing.
//!
//! Runs on a document's rendered markup and looks for question blocks:
//!
//! ```html
//! <div class="question-box"><p><strong>Open question: Why flat minima?</strong> …</p></div>
//! ```
//!
//! Each block, in document order, gets ordinal `k` (1-based, per document), the
//! anchor `oq-<order>-<k>`, and the display number `<order>.<k>` where `order`
//! is the document's `sequence_order`. The first `Open question:` label inside
//! the block is rewritten to `Open Question <number>:` (trailing title kept
//! verbatim), and a link to the open-questions page is appended after it.
//!
//! Known limitation: the block pattern ends at the first `</div>`, so a nested
//! div truncates the block and any later label inside it is left as is.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// File name of the site-wide annotation index.
pub const OPEN_QUESTIONS_PAGE: &str = "openquestions.html";

static QUESTION_BOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<div class="question-box">(.*?)</div>"#).expect("valid regex"));

static QUESTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<strong>[Oo]pen [Qq]uestion:(.*?)</strong>").expect("valid regex"));

/// One extracted open question.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// 1-based position among this document's question blocks.
    pub ordinal: usize,
    /// `<sequence_order>.<ordinal>`
    pub number: String,
    /// `oq-<sequence_order>-<ordinal>`
    pub anchor: String,
    /// Inner markup of the block as rendered, trimmed, label not rewritten.
    pub body: String,
}

/// Rewritten markup plus the annotations found in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Indexed {
    pub html: String,
    pub annotations: Vec<Annotation>,
}

pub fn anchor_id(sequence_order: i64, ordinal: usize) -> String {
    format!("oq-{sequence_order}-{ordinal}")
}

pub fn display_number(sequence_order: i64, ordinal: usize) -> String {
    format!("{sequence_order}.{ordinal}")
}

/// Rewrite the first `Open question:` label in `body` to carry `number`.
pub fn number_label(body: &str, number: &str) -> String {
    QUESTION_LABEL
        .replacen(body, 1, |caps: &Captures| {
            format!("<strong>Open Question {number}:{}</strong>", &caps[1])
        })
        .into_owned()
}

/// Number every question block in `html`. Never fails: markup that doesn't
/// form a complete block is left untouched and not counted.
pub fn index(html: &str, sequence_order: i64, path_prefix: &str) -> Indexed {
    let mut annotations = Vec::new();
    let rewritten = QUESTION_BOX.replace_all(html, |caps: &Captures| {
        let ordinal = annotations.len() + 1;
        let anchor = anchor_id(sequence_order, ordinal);
        let number = display_number(sequence_order, ordinal);
        let inner = &caps[1];
        let labelled = number_label(inner, &number);

        annotations.push(Annotation {
            ordinal,
            number,
            anchor: anchor.clone(),
            body: inner.trim().to_string(),
        });
        format!(
            r#"<div class="question-box" id="{anchor}">{labelled}</div><div class="oq-see-all"><a href="{path_prefix}{OPEN_QUESTIONS_PAGE}">See all open questions</a></div>"#
        )
    });
    Indexed {
        html: rewritten.into_owned(),
        annotations,
    }
}
