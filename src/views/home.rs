//! Home index: one box per sequence, newest first.

use super::{SequenceView, SiteView, display_date, site_page};
use maud::{Markup, html};

pub const HOME_PAGE: &str = "index.html";

pub struct HomePage {
    pub markup: Markup,
    pub sequences: usize,
}

pub fn render(view: &SiteView<'_>) -> HomePage {
    let config = view.config;
    let sequences = view.sequences_by_date(&config.home.exclude_slugs);

    let css: String = sequences
        .iter()
        .filter_map(|s| {
            s.sequence
                .accent
                .map(|accent| accent.css_rules(&box_class(&s.sequence.key)))
        })
        .collect::<Vec<_>>()
        .join("\n");

    let content = html! {
        main.home {
            @if !config.site.description.is_empty() {
                p.site-description { (config.site.description) }
            }
            div.sequence-list {
                @for s in &sequences {
                    (sequence_box(view, s))
                }
            }
        }
    };

    HomePage {
        markup: site_page(
            config,
            &config.site.title,
            (!css.is_empty()).then_some(css.as_str()),
            content,
        ),
        sequences: sequences.len(),
    }
}

fn box_class(key: &str) -> String {
    format!("sequence-box-{key}")
}

fn sequence_box(view: &SiteView<'_>, s: &SequenceView<'_>) -> Markup {
    let sequence = s.sequence;
    let class = match sequence.accent {
        Some(_) => format!("sequence-box {}", box_class(&sequence.key)),
        None => "sequence-box".to_string(),
    };
    let onclick = format!("location.href='{}'", s.first_url());
    let author = sequence.author.trim();
    let show_author = !author.is_empty() && author != view.config.site.default_author;

    html! {
        div class=(class) onclick=(onclick) {
            div.sequence-title {
                a href=(s.first_url()) { (sequence.title) }
                @if let Some(emoji) = &sequence.emoji {
                    (emoji_markup(emoji))
                }
            }
            @if show_author {
                div.sequence-author { (view.contributors.author_markup(author)) }
            }
            div.sequence-date { em { (display_date(s.date())) } }
            @if !sequence.description.is_empty() {
                div.sequence-description { (sequence.description) }
            }
            @if s.members.len() > 1 {
                div.sequence-posts {
                    @for (i, (_, doc)) in s.members.iter().enumerate() {
                        a.post-link href=(doc.url_path) onclick="event.stopPropagation()" {
                            (i + 1) ". " (doc.toc_title())
                        }
                    }
                }
            }
        }
    }
}

/// `fa-*` tokens are icon names; anything else is literal text (an emoji).
fn emoji_markup(token: &str) -> Markup {
    html! {
        span.sequence-emoji {
            @if token.starts_with("fa-") {
                i class={ "fas " (token) } {}
            } @else {
                (token)
            }
        }
    }
}
