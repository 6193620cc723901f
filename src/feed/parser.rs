//! Thin adapter from `feed-rs` into the gateway's JSON document.
//!
//! Format detection and the RSS/Atom/JSON Feed dialects are handled entirely
//! by `feed-rs`; this module only reshapes its model into something that
//! serializes cleanly and queries naturally (`$.items[0].title`).

use feed_rs::model::{Category, Entry, Feed, FeedType, Image, Link, MediaObject, Person, Text};
use feed_rs::parser::{self, ParseFeedError};
use serde::Serialize;

/// A parsed feed, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedDocument {
    #[serde(rename = "type")]
    pub feed_type: &'static str,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<FeedLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<FeedPerson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rights: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    pub items: Vec<FeedItem>,
}

/// One entry of a feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<FeedLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<FeedPerson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<FeedMedia>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedLink {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedPerson {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Media attachment (enclosure, `media:content`, JSON Feed attachment).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedMedia {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Parse raw feed bytes into a [`FeedDocument`].
pub fn parse_feed(bytes: &[u8]) -> Result<FeedDocument, ParseFeedError> {
    let feed = parser::parse(bytes)?;
    Ok(FeedDocument::from(feed))
}

fn text(t: Option<Text>) -> Option<String> {
    t.map(|t| t.content)
}

fn feed_type_name(feed_type: &FeedType) -> &'static str {
    match feed_type {
        FeedType::Atom => "atom",
        FeedType::JSON => "json",
        FeedType::RSS0 => "rss0",
        FeedType::RSS1 => "rss1",
        FeedType::RSS2 => "rss2",
    }
}

/// The link a reader would follow: `rel="alternate"` or no rel at all.
fn primary_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| links.first())
        .map(|l| l.href.clone())
}

fn image_uri(image: Option<Image>) -> Option<String> {
    image.map(|i| i.uri)
}

fn categories(categories: Vec<Category>) -> Vec<String> {
    categories
        .into_iter()
        .map(|c| c.label.unwrap_or(c.term))
        .collect()
}

impl From<Link> for FeedLink {
    fn from(link: Link) -> Self {
        Self {
            href: link.href,
            rel: link.rel,
            media_type: link.media_type,
            title: link.title,
        }
    }
}

impl From<Person> for FeedPerson {
    fn from(person: Person) -> Self {
        Self {
            name: person.name,
            uri: person.uri,
            email: person.email,
        }
    }
}

impl From<MediaObject> for FeedMedia {
    fn from(media: MediaObject) -> Self {
        let first = media.content.into_iter().next();
        Self {
            title: text(media.title),
            description: text(media.description),
            url: first
                .as_ref()
                .and_then(|c| c.url.as_ref())
                .map(ToString::to_string),
            media_type: first
                .as_ref()
                .and_then(|c| c.content_type.as_ref())
                .map(ToString::to_string),
            size: first.as_ref().and_then(|c| c.size),
            thumbnail: media.thumbnails.into_iter().next().map(|t| t.image.uri),
        }
    }
}

impl From<Entry> for FeedItem {
    fn from(entry: Entry) -> Self {
        Self {
            link: primary_link(&entry.links),
            id: entry.id,
            title: text(entry.title),
            links: entry.links.into_iter().map(FeedLink::from).collect(),
            description: text(entry.summary),
            content: entry.content.and_then(|c| c.body),
            published: entry.published.map(|dt| dt.to_rfc3339()),
            updated: entry.updated.map(|dt| dt.to_rfc3339()),
            authors: entry.authors.into_iter().map(FeedPerson::from).collect(),
            categories: categories(entry.categories),
            source: entry.source,
            media: entry.media.into_iter().map(FeedMedia::from).collect(),
        }
    }
}

impl From<Feed> for FeedDocument {
    fn from(feed: Feed) -> Self {
        Self {
            feed_type: feed_type_name(&feed.feed_type),
            link: primary_link(&feed.links),
            id: feed.id,
            title: text(feed.title),
            description: text(feed.description),
            links: feed.links.into_iter().map(FeedLink::from).collect(),
            language: feed.language,
            updated: feed.updated.map(|dt| dt.to_rfc3339()),
            published: feed.published.map(|dt| dt.to_rfc3339()),
            authors: feed.authors.into_iter().map(FeedPerson::from).collect(),
            categories: categories(feed.categories),
            generator: feed.generator.map(|g| g.content),
            icon: image_uri(feed.icon),
            logo: image_uri(feed.logo),
            rights: text(feed.rights),
            ttl: feed.ttl,
            items: feed.entries.into_iter().map(FeedItem::from).collect(),
        }
    }
}
