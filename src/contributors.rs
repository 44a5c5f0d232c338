//! Contributor directory and author link markup.
//!
//! `contributors.json` maps display names to profile URLs:
//!
//! ```json
//! { "contributors": [ { "name": "Ada Lovelace", "url": "https://example.org/ada" } ] }
//! ```
//!
//! Author strings are comma-separated names; every name found in the
//! directory becomes a link. One configured team name links, as a whole, to
//! the team URL instead.

use maud::{Markup, html};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct ContributorsFile {
    #[serde(default)]
    contributors: Vec<Contributor>,
}

#[derive(Debug, Deserialize)]
struct Contributor {
    name: String,
    url: String,
}

/// Read-only name → profile URL lookup, built once per build.
#[derive(Debug, Clone, Default)]
pub struct ContributorDirectory {
    profiles: HashMap<String, String>,
    team: Option<(String, String)>,
}

impl ContributorDirectory {
    /// Load the directory from `path`. A missing file is an empty directory;
    /// an unreadable or malformed one is logged and treated the same way.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let parsed = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|s| serde_json::from_str::<ContributorsFile>(&s).map_err(|e| e.to_string()));
        match parsed {
            Ok(file) => Self::from_pairs(file.contributors.into_iter().map(|c| (c.name, c.url))),
            Err(err) => {
                warn!(path = %path.display(), %err, "ignoring contributor file");
                Self::default()
            }
        }
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            profiles: pairs.into_iter().collect(),
            team: None,
        }
    }

    /// Link the exact author string `name` to `url`. Empty values disable it.
    pub fn with_team(mut self, name: &str, url: &str) -> Self {
        self.team = (!name.trim().is_empty() && !url.trim().is_empty())
            .then(|| (name.trim().to_string(), url.trim().to_string()));
        self
    }

    pub fn profile(&self, name: &str) -> Option<&str> {
        self.profiles.get(name).map(String::as_str)
    }

    /// Render an author string as markup with profile links.
    pub fn author_markup(&self, authors: &str) -> Markup {
        let authors = authors.trim();
        if let Some((team, url)) = &self.team
            && authors == team
        {
            return html! { a href=(url) { (team) } };
        }
        let names: Vec<&str> = authors
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .collect();
        html! {
            @for (i, name) in names.iter().enumerate() {
                @if i > 0 { ", " }
                @if let Some(url) = self.profile(name) {
                    a href=(url) { (name) }
                } @else {
                    (name)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn directory() -> ContributorDirectory {
        ContributorDirectory::from_pairs([("Ada".to_string(), "https://ada.example".to_string())])
            .with_team("The Team", "https://team.example")
    }

    #[test]
    fn known_names_are_linked() {
        let html = directory().author_markup("Ada, Bob").into_string();
        assert_eq!(html, r#"<a href="https://ada.example">Ada</a>, Bob"#);
    }

    #[test]
    fn team_name_links_to_team_url() {
        let html = directory().author_markup(" The Team ").into_string();
        assert_eq!(html, r#"<a href="https://team.example">The Team</a>"#);
    }

    #[test]
    fn empty_author_renders_nothing() {
        assert_eq!(directory().author_markup("").into_string(), "");
    }

    #[test]
    fn names_are_escaped() {
        let html = directory().author_markup("<b>Eve</b>").into_string();
        assert!(html.contains("&lt;b&gt;Eve&lt;/b&gt;"));
    }

    #[test]
    fn load_reads_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("contributors.json");
        fs::write(
            &path,
            r#"{"contributors":[{"name":"Ada","url":"https://ada.example"}]}"#,
        )
        .unwrap();
        let dir = ContributorDirectory::load(&path);
        assert_eq!(dir.profile("Ada"), Some("https://ada.example"));
    }

    #[test]
    fn load_tolerates_missing_and_malformed_files() {
        let tmp = TempDir::new().unwrap();
        assert!(ContributorDirectory::load(&tmp.path().join("none.json")).profile("Ada").is_none());

        let path = tmp.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(ContributorDirectory::load(&path).profile("Ada").is_none());
    }
}
