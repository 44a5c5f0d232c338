//! Annotation index: every open question on the site, grouped by sequence.

use super::{SiteView, site_page};
use crate::annotate::{self, Annotation};
use maud::{Markup, PreEscaped, html};

pub struct QuestionsPage {
    pub markup: Markup,
    pub annotations: usize,
}

struct Entry<'a> {
    url: &'a str,
    annotation: &'a Annotation,
}

struct Group<'a> {
    key: &'a str,
    title: &'a str,
    url: &'a str,
    entries: Vec<Entry<'a>>,
}

pub fn render(view: &SiteView<'_>) -> QuestionsPage {
    let sequences = view.sequences_by_date(&[]);

    let featured = &view.config.open_questions.featured_sequence;
    let cta_url = sequences
        .iter()
        .find(|s| &s.sequence.key == featured)
        .map(|s| s.first_url())
        .unwrap_or("#");

    let groups: Vec<Group<'_>> = sequences
        .iter()
        .map(|s| Group {
            key: &s.sequence.key,
            title: &s.sequence.title,
            url: s.first_url(),
            entries: s
                .members
                .iter()
                .flat_map(|&(id, doc)| {
                    let url = doc.url_path.as_str();
                    view.annotations(id)
                        .iter()
                        .map(move |annotation| Entry { url, annotation })
                })
                .collect(),
        })
        .filter(|g| !g.entries.is_empty())
        .collect();
    let total: usize = groups.iter().map(|g| g.entries.len()).sum();

    let content = html! {
        main.open-questions {
            h1 { "Open questions" }
            p.oq-intro {
                "Unresolved questions raised across the site. New here? "
                a.oq-cta href=(cta_url) { "Start at the beginning." }
            }
            @if groups.is_empty() {
                p.oq-empty { "No open questions yet." }
            }
            @for group in &groups {
                div.sequence-box.oq-group id={ (group.key) "-questions" } {
                    div.sequence-title {
                        "Open questions from "
                        a href=(group.url) { em { (group.title) } }
                    }
                    @for entry in &group.entries {
                        div.question-box {
                            (PreEscaped(annotate::number_label(&entry.annotation.body, &entry.annotation.number)))
                        }
                        div.oq-see-all {
                            a href={ (entry.url) "#" (entry.annotation.anchor) } { "See question in context" }
                        }
                    }
                }
            }
        }
    };

    QuestionsPage {
        markup: site_page(view.config, "Open questions", None, content),
        annotations: total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::index;
    use crate::config::SiteConfig;
    use crate::contributors::ContributorDirectory;
    use crate::graph::{ContentGraph, DocId};
    use crate::registry::SequenceRegistry;
    use crate::test_helpers::{doc, find_id};
    use std::collections::HashMap;

    const BOX: &str = r#"<div class="question-box"><p><strong>Open question: Q?</strong> text</p></div>"#;

    fn annotations_for(order: i64, boxes: usize) -> Vec<Annotation> {
        index(&BOX.repeat(boxes), order, "").annotations
    }

    fn render_with(graph: &ContentGraph, built: &HashMap<DocId, Vec<Annotation>>) -> (String, usize) {
        let config = SiteConfig::default();
        let contributors = ContributorDirectory::default();
        let view = SiteView { graph, config: &config, contributors: &contributors, built };
        let page = render(&view);
        (page.markup.into_string(), page.annotations)
    }

    #[test]
    fn entries_follow_member_then_annotation_order() {
        let graph = ContentGraph::build(
            vec![doc("second", Some("quickstart"), 2), doc("first", Some("quickstart"), 1)],
            &SequenceRegistry::default(),
        );
        let mut built = HashMap::new();
        built.insert(find_id(&graph, "first"), annotations_for(1, 2));
        built.insert(find_id(&graph, "second"), annotations_for(2, 1));

        let (html, total) = render_with(&graph, &built);
        assert_eq!(total, 3);
        let a = html.find("quickstart/first.html#oq-1-1").unwrap();
        let b = html.find("quickstart/first.html#oq-1-2").unwrap();
        let c = html.find("quickstart/second.html#oq-2-1").unwrap();
        assert!(a < b && b < c);
        assert!(html.contains("Open Question 1.2: Q?"));
    }

    #[test]
    fn featured_sequence_sets_call_to_action() {
        let graph = ContentGraph::build(
            vec![doc("intro", Some("quickstart"), 1), doc("solo", None, 1)],
            &SequenceRegistry::default(),
        );
        let mut built = HashMap::new();
        built.insert(find_id(&graph, "intro"), vec![]);
        built.insert(find_id(&graph, "solo"), annotations_for(1, 1));

        let (html, _) = render_with(&graph, &built);
        assert!(html.contains(r#"class="oq-cta" href="quickstart/intro.html""#));
        // Sequences without questions get no group.
        assert!(!html.contains("quickstart-questions"));
        assert!(html.contains("standalone-solo-questions"));
    }

    #[test]
    fn empty_site_still_renders_page() {
        let graph = ContentGraph::build(vec![doc("solo", None, 1)], &SequenceRegistry::default());
        let mut built = HashMap::new();
        built.insert(find_id(&graph, "solo"), vec![]);
        let (html, total) = render_with(&graph, &built);
        assert_eq!(total, 0);
        assert!(html.contains("No open questions yet."));
        assert!(html.contains(r##"href="#""##));
    }
}
