use crate::fetcher::Fetcher;
use crate::filter;
use crate::render;
use crate::sources;
use crate::types::{Digest, DigestFormat, FetchConfig, Group, Item, Result, SourceSpec};
use crate::writer;
use chrono::{NaiveDate, Timelike, Utc};
use std::path::PathBuf;
use tracing::{info, warn};

/// Options for one digest run, mirroring the CLI surface.
#[derive(Debug, Clone)]
pub struct DigestOptions {
    pub limit: usize,
    pub keywords: Vec<String>,
    pub since: Option<NaiveDate>,
    pub include_all: bool,
    pub format: DigestFormat,
    pub out_dir: PathBuf,
    pub write_json: bool,
}

impl Default for DigestOptions {
    fn default() -> Self {
        Self {
            limit: 8,
            keywords: sources::default_keywords(),
            since: None,
            include_all: false,
            format: DigestFormat::Markdown,
            out_dir: PathBuf::from("out"),
            write_json: false,
        }
    }
}

/// The product of a completed run.
#[derive(Debug)]
pub struct DigestRun {
    pub digest: Digest,
    pub text: String,
    pub path: PathBuf,
    pub json_path: Option<PathBuf>,
}

/// Orchestrates one run: fetch every source in order, filter each group,
/// render, persist.
pub struct DigestPipeline {
    fetcher: Fetcher,
    sources: Vec<SourceSpec>,
}

impl DigestPipeline {
    pub fn new(config: FetchConfig) -> Self {
        Self {
            fetcher: Fetcher::new(config),
            sources: sources::default_sources(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<SourceSpec>) -> Self {
        self.sources = sources;
        self
    }

    /// Fetch every configured source, one at a time, in catalog order. A
    /// failing source contributes a single placeholder item describing the
    /// failure; the other sources proceed unaffected.
    pub async fn collect(&self, limit: usize) -> Vec<Group> {
        let mut groups = Vec::with_capacity(self.sources.len());
        for spec in &self.sources {
            let items = match self.fetcher.fetch(spec, limit).await {
                Ok(items) => items,
                Err(err) => {
                    warn!("fetch failed for {}: {}", spec.name, err);
                    vec![fetch_failure_placeholder(spec, &err.to_string())]
                }
            };
            groups.push(Group {
                name: spec.name.clone(),
                items,
            });
        }
        groups
    }

    /// Run the whole pipeline and write the output file. Always produces a
    /// file, even if every source failed.
    pub async fn run(&self, opts: &DigestOptions) -> Result<DigestRun> {
        let now = Utc::now();
        let day = now.date_naive();

        let groups = self.collect(opts.limit).await;
        let groups = apply_filters(groups, &opts.keywords, opts.include_all, opts.since);

        let text = render::render(day, &groups, opts.format);
        let path = writer::write_digest(&opts.out_dir, day, &text, opts.format)?;

        let digest = Digest {
            date: day,
            format: opts.format,
            keywords: opts.keywords.clone(),
            since: opts.since,
            groups,
            generated_at: now.with_nanosecond(0).unwrap_or(now),
        };

        let json_path = if opts.write_json {
            Some(writer::write_json_dump(&path, &digest)?)
        } else {
            None
        };

        info!(
            "digest run complete: {} groups, written to {}",
            digest.groups.len(),
            path.display()
        );
        Ok(DigestRun {
            digest,
            text,
            path,
            json_path,
        })
    }
}

/// Keyword filter first, then the optional date floor, per group. Groups
/// are independent.
pub fn apply_filters(
    groups: Vec<Group>,
    keywords: &[String],
    include_all: bool,
    since: Option<NaiveDate>,
) -> Vec<Group> {
    groups
        .into_iter()
        .map(|group| {
            let mut items = filter::filter_by_keywords(group.items, keywords, include_all);
            if let Some(floor) = since {
                items = filter::filter_since(items, floor);
            }
            Group {
                name: group.name,
                items,
            }
        })
        .collect()
}

/// The single substitute item a failed source contributes to its group.
pub fn fetch_failure_placeholder(spec: &SourceSpec, error: &str) -> Item {
    Item {
        source: spec.name.clone(),
        title: format!("(fetch failed: {error})"),
        url: spec.url.clone(),
        published: None,
        score: None,
    }
}
