use crate::types::{DigestError, Item, Result};
use serde::Deserialize;
use std::cmp::Reverse;
use tracing::debug;

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn clean_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a syndication feed body and normalize the first `limit` entries.
/// Entries without a title or a link are dropped.
pub fn items_from_feed(content: &str, source: &str, limit: usize) -> Result<Vec<Item>> {
    let feed = feed_rs::parser::parse(content.as_bytes())
        .map_err(|e| DigestError::Parse(format!("failed to parse feed: {e}")))?;

    let mut items = Vec::new();
    for entry in feed.entries.into_iter().take(limit) {
        let title = clean_text(&entry.title.map(|t| t.content).unwrap_or_default());
        let url = entry
            .links
            .first()
            .map(|link| link.href.clone())
            .unwrap_or_default();
        if title.is_empty() || url.is_empty() {
            debug!("dropping entry without title or link from {}", source);
            continue;
        }
        let published = entry.published.or(entry.updated).map(|dt| dt.to_rfc3339());
        items.push(Item {
            source: source.to_string(),
            title,
            url,
            published,
            score: None,
        });
    }
    Ok(items)
}

/// Response shape of a JSON search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
pub struct SearchHit {
    pub title: Option<String>,
    pub url: Option<String>,
    pub points: Option<i64>,
    pub created_at: Option<String>,
    #[serde(rename = "objectID")]
    pub object_id: Option<String>,
}

/// Normalize search hits into items. Hits without a URL fall back to the
/// item page at `item_url_base`; hits still lacking a title or URL are
/// dropped. The result is sorted by descending score, items without a score
/// last in their original order, then truncated to `limit`.
pub fn items_from_search(
    response: SearchResponse,
    source: &str,
    item_url_base: &str,
    limit: usize,
) -> Vec<Item> {
    let mut items = Vec::new();
    for hit in response.hits {
        let title = clean_text(hit.title.as_deref().unwrap_or_default());
        let url = match hit.url {
            Some(url) if !url.is_empty() => url,
            _ => match hit.object_id.as_deref() {
                Some(id) => format!("{item_url_base}{id}"),
                None => String::new(),
            },
        };
        if title.is_empty() || url.is_empty() {
            debug!("dropping hit without title or url from {}", source);
            continue;
        }
        items.push(Item {
            source: source.to_string(),
            title,
            url,
            published: hit.created_at,
            score: hit.points,
        });
    }
    items.sort_by_key(|item| (item.score.is_none(), Reverse(item.score.unwrap_or(0))));
    items.truncate(limit);
    items
}
