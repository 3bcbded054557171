use chrono::{NaiveDate, Utc};
use signal_digest::writer::{write_digest, write_json_dump};
use signal_digest::{Digest, DigestFormat, Group, Item};
use std::fs;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

fn sample_digest(format: DigestFormat) -> Digest {
    Digest {
        date: day(),
        format,
        keywords: vec!["agent".to_string()],
        since: None,
        groups: vec![Group {
            name: "Feed".to_string(),
            items: vec![Item {
                source: "Feed".to_string(),
                title: "Story".to_string(),
                url: "http://a".to_string(),
                published: Some("2024-01-09".to_string()),
                score: Some(20),
            }],
        }],
        generated_at: Utc::now(),
    }
}

#[test]
fn test_extension_follows_format() {
    let dir = tempfile::tempdir().unwrap();

    let md = write_digest(dir.path(), day(), "# digest", DigestFormat::Markdown).unwrap();
    assert_eq!(md.file_name().unwrap(), "2024-01-10.md");

    let discord = write_digest(dir.path(), day(), "digest", DigestFormat::Discord).unwrap();
    assert_eq!(discord.file_name().unwrap(), "2024-01-10.txt");

    let slack = write_digest(dir.path(), day(), "digest", DigestFormat::Slack).unwrap();
    assert_eq!(slack.file_name().unwrap(), "2024-01-10.txt");
}

#[test]
fn test_same_day_write_overwrites_previous_content() {
    let dir = tempfile::tempdir().unwrap();

    let first = write_digest(dir.path(), day(), "first run", DigestFormat::Markdown).unwrap();
    let second = write_digest(dir.path(), day(), "second run", DigestFormat::Markdown).unwrap();

    assert_eq!(first, second, "same day must map to the same path");
    assert_eq!(fs::read_to_string(&second).unwrap(), "second run");
}

#[test]
fn test_creates_output_directory_if_absent() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("out").join("digests");

    let path = write_digest(&nested, day(), "digest", DigestFormat::Markdown).unwrap();
    assert!(path.exists());
}

#[test]
fn test_json_dump_carries_full_schema() {
    let dir = tempfile::tempdir().unwrap();
    let digest = sample_digest(DigestFormat::Markdown);

    let text_path = write_digest(dir.path(), day(), "# digest", DigestFormat::Markdown).unwrap();
    let json_path = write_json_dump(&text_path, &digest).unwrap();
    assert_eq!(json_path.file_name().unwrap(), "2024-01-10.json");

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["date"], "2024-01-10");
    assert_eq!(value["format"], "markdown");
    assert_eq!(value["keywords"][0], "agent");
    assert!(value["since"].is_null());
    assert_eq!(value["groups"][0]["name"], "Feed");
    assert_eq!(value["groups"][0]["items"][0]["title"], "Story");
    assert_eq!(value["groups"][0]["items"][0]["score"], 20);
    assert!(
        value.get("generated_at").is_none(),
        "the timestamp is not part of the dump schema"
    );
}
