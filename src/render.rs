use crate::filter::parse_publication_date;
use crate::parser::clean_text;
use crate::types::{DigestFormat, Group};
use chrono::NaiveDate;

/// Per-group display cap for the compact chat formats.
pub const COMPACT_GROUP_LIMIT: usize = 5;
/// Longest title the compact formats render before truncating.
pub const COMPACT_TITLE_CHARS: usize = 80;
/// Longest unparseable date text the full report renders.
const RAW_DATE_CHARS: usize = 32;

const REPORT_TITLE: &str = "Signal Digest";

/// Render the digest for `day`. Pure: the same inputs always produce the
/// same text. Group order is taken as given.
pub fn render(day: NaiveDate, groups: &[Group], format: DigestFormat) -> String {
    match format {
        DigestFormat::Markdown => render_markdown(day, groups),
        DigestFormat::Discord => render_discord(day, groups),
        DigestFormat::Slack => render_slack(day, groups),
    }
}

/// Full-width markdown report: every item, score/date parentheticals, and a
/// closing block of follow-up ideas.
fn render_markdown(day: NaiveDate, groups: &[Group]) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("# {REPORT_TITLE} — {day}"));
    lines.push(String::new());

    if !groups.is_empty() {
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        lines.push(format!("Sources: {}.", names.join(", ")));
        lines.push(String::new());
    }

    for group in groups {
        lines.push(format!("## {}", group.name));
        if group.items.is_empty() {
            lines.push("- (no items fetched)".to_string());
            lines.push(String::new());
            continue;
        }
        for item in &group.items {
            let mut meta: Vec<String> = Vec::new();
            if let Some(score) = item.score {
                meta.push(format!("{score} points"));
            }
            if let Some(raw) = item.published.as_deref() {
                match parse_publication_date(raw) {
                    Some(date) => meta.push(date.to_string()),
                    None => meta.push(clip_chars(&clean_text(raw), RAW_DATE_CHARS)),
                }
            }
            let meta = if meta.is_empty() {
                String::new()
            } else {
                format!(" ({})", meta.join(", "))
            };
            lines.push(format!("- [{}]({}){}", item.title, item.url, meta));
        }
        lines.push(String::new());
    }

    lines.push("## 3 quick follow-ups".to_string());
    lines.push(
        "- Pick one tooling item above and ship a minimal local version this week.".to_string(),
    );
    lines.push(
        "- Pull one paper with a measurable technique and write a small reproduction script."
            .to_string(),
    );
    lines.push(
        "- Find one recurring pain point in the discussion threads and build a tiny CLI for it."
            .to_string(),
    );
    lines.push(String::new());
    lines.join("\n")
}

/// Compact chat format: empty groups skipped, five items per group, long
/// titles truncated.
fn render_discord(day: NaiveDate, groups: &[Group]) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("**📡 {REPORT_TITLE} — {day}**"));
    lines.push(String::new());

    for group in groups {
        if group.items.is_empty() {
            continue;
        }
        lines.push(format!("**{}**", group.name));
        for item in group.items.iter().take(COMPACT_GROUP_LIMIT) {
            let mut meta: Vec<String> = Vec::new();
            if let Some(score) = item.score {
                meta.push(format!("⬆{score}"));
            }
            if let Some(date) = item.published.as_deref().and_then(parse_publication_date) {
                meta.push(date.format("%m-%d").to_string());
            }
            let meta = if meta.is_empty() {
                String::new()
            } else {
                format!(" {}", meta.join(", "))
            };
            lines.push(format!("• {}{}", truncate_title(&item.title), meta));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Like the Discord format, but each line is a single `<url|title>`
/// hyperlink token and only the score is shown.
fn render_slack(day: NaiveDate, groups: &[Group]) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("📡 *{REPORT_TITLE} — {day}*"));
    lines.push(String::new());

    for group in groups {
        if group.items.is_empty() {
            continue;
        }
        lines.push(format!("*{}*", group.name));
        for item in group.items.iter().take(COMPACT_GROUP_LIMIT) {
            let meta = match item.score {
                Some(score) => format!(" (⬆{score})"),
                None => String::new(),
            };
            lines.push(format!(
                "• <{}|{}>{}",
                item.url,
                truncate_title(&item.title),
                meta
            ));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

fn truncate_title(title: &str) -> String {
    if title.chars().count() > COMPACT_TITLE_CHARS {
        let mut cut: String = title.chars().take(COMPACT_TITLE_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        title.to_string()
    }
}

fn clip_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
