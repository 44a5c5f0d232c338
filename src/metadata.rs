//! Prioritized field resolution.
//!
//! Most document and sequence fields can come from several places: an explicit
//! frontmatter value, the registry's sequence description, the filename, or
//! the body itself. Each field has its own small resolver so the fallback
//! chain is visible in one line and testable on its own:
//!
//! ```text
//! slug:          frontmatter slug → date-prefixed stem → numeric-prefixed stem → stem
//! title:         frontmatter title → first `# ` heading → title-cased slug
//! date:          frontmatter date → filename date prefix → none
//! sequence key:  frontmatter sequence → standalone-<slug>
//! accent:        registry light (+ dark, else light again) → none
//! ```

use crate::naming::{self, ParsedStem};
use crate::types::{Accent, Rgb};

/// Prefix of the synthesized singleton sequence key for standalone documents.
pub const STANDALONE_PREFIX: &str = "standalone-";

/// Resolve a metadata field from multiple sources.
///
/// Takes a list of optional values in priority order and returns the first
/// non-None, non-empty value (after trimming).
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

pub fn resolve_slug(explicit: Option<&str>, stem: &ParsedStem) -> String {
    resolve(&[explicit, Some(&stem.name)]).unwrap_or_default()
}

pub fn resolve_title(explicit: Option<&str>, body: &str, slug: &str) -> String {
    resolve(&[explicit, first_heading(body)]).unwrap_or_else(|| naming::title_from_slug(slug))
}

pub fn resolve_date(explicit: Option<&str>, stem: &ParsedStem) -> Option<String> {
    resolve(&[explicit, stem.date.as_deref()])
}

/// The sequence key every document ends up with; standalone documents get a
/// synthesized one-member sequence so downstream code never special-cases them.
pub fn resolve_sequence_key(explicit: Option<&str>, slug: &str) -> String {
    resolve(&[explicit]).unwrap_or_else(|| standalone_key(slug))
}

pub fn standalone_key(slug: &str) -> String {
    format!("{STANDALONE_PREFIX}{slug}")
}

pub fn resolve_accent(light: Option<Rgb>, dark: Option<Rgb>) -> Option<Accent> {
    light.map(|light| Accent {
        light,
        dark: dark.unwrap_or(light),
    })
}

/// Text of the first top-level (`# `) heading, if any.
pub fn first_heading(body: &str) -> Option<&str> {
    body.lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::parse_stem;

    #[test]
    fn resolve_first_non_empty_wins() {
        assert_eq!(resolve(&[None, Some("  "), Some("b"), Some("c")]).as_deref(), Some("b"));
        assert_eq!(resolve(&[None, None]), None);
    }

    #[test]
    fn slug_explicit_beats_filename() {
        let stem = parse_stem("2024-01-02-from-file");
        assert_eq!(resolve_slug(Some("custom"), &stem), "custom");
        assert_eq!(resolve_slug(None, &stem), "from-file");
    }

    #[test]
    fn slug_from_numeric_and_plain_stems() {
        assert_eq!(resolve_slug(None, &parse_stem("03-third")), "third");
        assert_eq!(resolve_slug(None, &parse_stem("plain")), "plain");
    }

    #[test]
    fn title_chain() {
        assert_eq!(resolve_title(Some("Given"), "# Heading", "slug"), "Given");
        assert_eq!(resolve_title(None, "intro\n# Heading  \nmore", "slug"), "Heading");
        assert_eq!(resolve_title(None, "## Not top level", "my-slug"), "My Slug");
    }

    #[test]
    fn date_chain() {
        let stem = parse_stem("2023-12-31-eve");
        assert_eq!(resolve_date(Some("2024-01-01"), &stem).as_deref(), Some("2024-01-01"));
        assert_eq!(resolve_date(None, &stem).as_deref(), Some("2023-12-31"));
        assert_eq!(resolve_date(None, &parse_stem("eve")), None);
    }

    #[test]
    fn sequence_key_synthesized_for_standalone() {
        assert_eq!(resolve_sequence_key(None, "foo"), "standalone-foo");
        assert_eq!(resolve_sequence_key(Some(""), "foo"), "standalone-foo");
        assert_eq!(resolve_sequence_key(Some("s1"), "foo"), "s1");
    }

    #[test]
    fn accent_dark_falls_back_to_light() {
        let light = Rgb([1, 1, 1]);
        let dark = Rgb([9, 9, 9]);
        assert_eq!(resolve_accent(Some(light), None), Some(Accent { light, dark: light }));
        assert_eq!(resolve_accent(Some(light), Some(dark)), Some(Accent { light, dark }));
        assert_eq!(resolve_accent(None, Some(dark)), None);
    }
}
