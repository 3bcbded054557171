use chrono::NaiveDate;
use signal_digest::filter::{
    filter_by_keywords, filter_since, matches_keywords, parse_publication_date,
};
use signal_digest::Item;

fn item(title: &str, url: &str, published: Option<&str>) -> Item {
    Item {
        source: "test".to_string(),
        title: title.to_string(),
        url: url.to_string(),
        published: published.map(str::to_string),
        score: None,
    }
}

fn keywords(list: &[&str]) -> Vec<String> {
    list.iter().map(|kw| kw.to_string()).collect()
}

#[test]
fn test_keyword_match_is_case_insensitive() {
    let kws = keywords(&["LLM"]);
    assert!(matches_keywords("new llm agent framework", &kws));
    assert!(matches_keywords("NEW LLM AGENT FRAMEWORK", &kws));
    assert!(!matches_keywords("weather today", &kws));
}

#[test]
fn test_empty_keyword_list_returns_input_unchanged() {
    let items = vec![
        item("Agent news", "http://a", None),
        item("Weather today", "http://b", None),
    ];
    let out = filter_by_keywords(items.clone(), &[], false);
    assert_eq!(out, items);
}

#[test]
fn test_keyword_filter_keeps_only_matches_in_order() {
    let items = vec![
        item("Agent news", "http://a", None),
        item("Weather today", "http://b", None),
        item("LLM update", "http://c", None),
    ];
    let out = filter_by_keywords(items, &keywords(&["agent", "llm"]), false);
    let titles: Vec<&str> = out.iter().map(|it| it.title.as_str()).collect();
    assert_eq!(titles, vec!["Agent news", "LLM update"]);
}

#[test]
fn test_include_all_moves_matches_first_without_dropping() {
    let items = vec![
        item("Weather today", "http://a", None),
        item("Agent news", "http://b", None),
        item("Sports scores", "http://c", None),
        item("LLM update", "http://d", None),
    ];
    let out = filter_by_keywords(items, &keywords(&["agent", "llm"]), true);
    let titles: Vec<&str> = out.iter().map(|it| it.title.as_str()).collect();
    // A permutation of the input: matches first, each half in input order.
    assert_eq!(
        titles,
        vec!["Agent news", "LLM update", "Weather today", "Sports scores"]
    );
}

#[test]
fn test_since_filter_is_fail_open() {
    let items = vec![
        item("no date", "http://a", None),
        item("garbage date", "http://b", Some("sometime last week")),
        item("too old", "http://c", Some("2023-12-31")),
        item("recent", "http://d", Some("2024-01-02")),
    ];
    let floor = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let out = filter_since(items, floor);
    let titles: Vec<&str> = out.iter().map(|it| it.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["no date", "garbage date", "recent"],
        "unparseable dates must never be excluded"
    );
}

#[test]
fn test_publication_date_parsing_accepts_common_formats() {
    let expected = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
    assert_eq!(
        parse_publication_date("2024-01-09T10:30:00Z"),
        Some(expected)
    );
    assert_eq!(
        parse_publication_date("Tue, 09 Jan 2024 10:30:00 GMT"),
        Some(expected)
    );
    assert_eq!(parse_publication_date("2024-01-09 10:30:00"), Some(expected));
    assert_eq!(parse_publication_date("2024-01-09"), Some(expected));
    assert_eq!(parse_publication_date("not a date"), None);
}

#[test]
fn test_keyword_then_date_filter_scenario() {
    let items = vec![
        item(
            "New LLM agent framework released",
            "http://a",
            Some("2024-01-10"),
        ),
        item("Weather today", "http://b", Some("2024-01-09")),
    ];
    let filtered = filter_by_keywords(items, &keywords(&["agent", "llm"]), false);
    let filtered = filter_since(filtered, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].url, "http://a");
}
