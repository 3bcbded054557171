use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use signal_digest::generation::{GenerationClient, DEFAULT_POLL_INTERVAL};
use signal_digest::{sources, DigestFormat, DigestOptions, DigestPipeline, FetchConfig};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "signal-digest",
    about = "Generate a small daily AI/LLM signal digest."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch all sources and write today's digest.
    Run {
        /// Items per source
        #[arg(long, default_value_t = 8)]
        limit: usize,
        /// Output directory
        #[arg(long, default_value = "out")]
        out: PathBuf,
        /// Also write a JSON dump next to the rendered digest
        #[arg(long)]
        json: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = DigestFormat::Markdown)]
        format: DigestFormat,
        /// Only include items published on or after this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<NaiveDate>,
        /// Comma-separated keywords to filter (default: built-in AI/LLM keywords)
        #[arg(long)]
        keywords: Option<String>,
        /// Include all items but prioritize keyword matches
        #[arg(long)]
        include_all: bool,
    },
    /// Queue an image generation on a remote server and download the results.
    Generate {
        /// Text prompt
        prompt: String,
        /// Base URL of the generation server
        #[arg(long, default_value = "http://localhost:8000")]
        host: String,
        /// Directory to download finished images into
        #[arg(long, default_value = "out")]
        out: PathBuf,
        /// Seconds to wait before giving up
        #[arg(long, default_value_t = 120)]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            limit,
            out,
            json,
            format,
            since,
            keywords,
            include_all,
        } => {
            let keywords = match keywords {
                Some(raw) => raw
                    .split(',')
                    .map(str::trim)
                    .filter(|kw| !kw.is_empty())
                    .map(str::to_string)
                    .collect(),
                None => sources::default_keywords(),
            };
            let opts = DigestOptions {
                limit,
                keywords,
                since,
                include_all,
                format,
                out_dir: out,
                write_json: json,
            };

            let pipeline = DigestPipeline::new(FetchConfig::default());
            let run = pipeline.run(&opts).await?;

            // Print to stdout for piping.
            println!("{}", run.text);
            eprintln!("[written to: {}]", run.path.display());
        }
        Command::Generate {
            prompt,
            host,
            out,
            timeout,
        } => {
            let client = GenerationClient::new(&host, FetchConfig::default())?;
            let prompt_id = client.queue_prompt(&prompt).await?;
            let images = client
                .wait_for_outputs(&prompt_id, DEFAULT_POLL_INTERVAL, Duration::from_secs(timeout))
                .await?;

            std::fs::create_dir_all(&out)?;
            for image in &images {
                let bytes = client.download(image).await?;
                let path = out.join(&image.filename);
                std::fs::write(&path, bytes)?;
                println!("downloaded {}", path.display());
            }
        }
    }
    Ok(())
}
