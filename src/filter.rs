use crate::types::Item;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Case-insensitive substring match of any keyword against the title.
pub fn matches_keywords(title: &str, keywords: &[String]) -> bool {
    let title = title.to_lowercase();
    keywords.iter().any(|kw| title.contains(&kw.to_lowercase()))
}

/// Keyword filter. An empty keyword list returns the input unchanged. With
/// `include_all`, nothing is dropped: keyword matches move to the front and
/// the original order is preserved within each half.
pub fn filter_by_keywords(items: Vec<Item>, keywords: &[String], include_all: bool) -> Vec<Item> {
    if keywords.is_empty() {
        return items;
    }
    if include_all {
        let (matched, rest): (Vec<Item>, Vec<Item>) = items
            .into_iter()
            .partition(|item| matches_keywords(&item.title, keywords));
        matched.into_iter().chain(rest).collect()
    } else {
        items
            .into_iter()
            .filter(|item| matches_keywords(&item.title, keywords))
            .collect()
    }
}

/// Date floor, fail-open: items without a date, and items whose date text
/// does not parse, are kept. Only a parsed date before the floor excludes.
pub fn filter_since(items: Vec<Item>, since: NaiveDate) -> Vec<Item> {
    items
        .into_iter()
        .filter(|item| match item.published.as_deref() {
            None => true,
            Some(raw) => match parse_publication_date(raw) {
                Some(date) => date >= since,
                None => true,
            },
        })
        .collect()
}

/// Lenient parsing for the free-form `published` strings feeds carry:
/// RFC 3339, RFC 2822, then common naive formats.
pub fn parse_publication_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
