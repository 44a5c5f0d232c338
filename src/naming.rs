//! Centralized filename parsing for document sources.
//!
//! Document files follow one of three naming patterns, checked in order:
//!
//! - `2024-03-01-hello-world.md`: a publication date prefix (`YYYY-MM-DD-`)
//! - `02-setup.md`: a numeric ordering prefix (`NN-`)
//! - `notes.md`: no prefix at all
//!
//! The prefix is never part of the slug. The date prefix doubles as a fallback
//! publication date when a document carries no frontmatter `date`.

/// Result of parsing a document filename stem like `2024-03-01-hello-world`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStem {
    /// Date prefix if present (e.g. `2024-03-01`), kept verbatim.
    pub date: Option<String>,
    /// Numeric prefix if present and no date prefix matched. `None` when the
    /// digits are stripped but overflow `u32`.
    pub number: Option<u32>,
    /// The stem with any recognized prefix removed.
    pub name: String,
}

/// Parse a filename stem following the prefix conventions above.
///
/// - `"2024-03-01-hello"` → date=Some("2024-03-01"), name="hello"
/// - `"02-setup"` → number=Some(2), name="setup"
/// - `"notes"` → name="notes"
/// - `"2024-03-01"` → no usable rest, so it parses as `2024` + `03-01`
pub fn parse_stem(stem: &str) -> ParsedStem {
    if let Some((date, rest)) = split_date_prefix(stem) {
        return ParsedStem {
            date: Some(date.to_string()),
            number: None,
            name: rest.to_string(),
        };
    }
    if let Some(dash_pos) = stem.find('-') {
        let prefix = &stem[..dash_pos];
        let rest = &stem[dash_pos + 1..];
        if !rest.is_empty() && !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) {
            return ParsedStem {
                date: None,
                number: prefix.parse().ok(),
                name: rest.to_string(),
            };
        }
    }
    ParsedStem {
        date: None,
        number: None,
        name: stem.to_string(),
    }
}

/// Split `YYYY-MM-DD-rest` into `("YYYY-MM-DD", "rest")`. `rest` must be non-empty.
fn split_date_prefix(stem: &str) -> Option<(&str, &str)> {
    let bytes = stem.as_bytes();
    if bytes.len() < 12 {
        return None;
    }
    let digits_at = |range: std::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);
    let shape_ok = digits_at(0..4)
        && bytes[4] == b'-'
        && digits_at(5..7)
        && bytes[7] == b'-'
        && digits_at(8..10)
        && bytes[10] == b'-';
    shape_ok.then(|| (&stem[..10], &stem[11..]))
}

/// Turn a slug into a display title: separators become spaces and every word
/// is capitalized (`"open-problems_in-theory"` → `"Open Problems In Theory"`).
pub fn title_from_slug(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
