//! RSS 2.0 feed of the most recent documents.

use super::SiteView;
use crate::graph::Document;
use chrono::NaiveDate;
use maud::{Markup, PreEscaped, html};
use std::cmp::Reverse;

pub const FEED_FILE: &str = "feed.xml";

const XML_PROLOG: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

pub struct Feed {
    pub markup: Markup,
    pub items: usize,
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
}

/// RFC 822 date at midnight UTC.
pub fn pub_date(date: NaiveDate) -> String {
    date.format("%a, %d %b %Y 00:00:00 +0000").to_string()
}

/// Built documents newest first. Undated documents sort last; ties keep
/// graph order.
pub fn recent_documents<'a>(view: &SiteView<'a>, limit: usize) -> Vec<(&'a Document, Option<NaiveDate>)> {
    let mut docs: Vec<(&'a Document, Option<NaiveDate>)> = view
        .built_documents()
        .map(|(_, doc)| (doc, parse_date(doc.meta.date.as_deref())))
        .collect();
    // Some(_) > None, so Reverse puts undated entries at the end.
    docs.sort_by_key(|(_, date)| Reverse(*date));
    docs.truncate(limit);
    docs
}

pub fn render(view: &SiteView<'_>) -> Feed {
    let config = view.config;
    let base = config.base_url();
    let items = recent_documents(view, config.feed.max_items);

    let markup = html! {
        (PreEscaped(XML_PROLOG))
        rss version="2.0" {
            channel {
                title { (config.site.title) }
                link { (base) "/" }
                description { (config.site.description) }
                language { (config.site.language) }
                @for (doc, date) in &items {
                    item {
                        title { (doc.title()) }
                        link { (base) "/" (doc.url_path) }
                        guid { (base) "/" (doc.url_path) }
                        @if let Some(description) = &doc.meta.description {
                            description { (description) }
                        }
                        @if let Some(date) = date {
                            pubDate { (pub_date(*date)) }
                        }
                    }
                }
            }
        }
    };

    Feed {
        markup,
        items: items.len(),
    }
}
