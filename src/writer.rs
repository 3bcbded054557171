use crate::types::{Digest, DigestFormat, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Persist the rendered digest under `out_dir`, named by ISO day. Creates
/// the directory if absent. A second run on the same UTC day overwrites the
/// earlier file.
pub fn write_digest(
    out_dir: &Path,
    day: NaiveDate,
    text: &str,
    format: DigestFormat,
) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("{}.{}", day, format.extension()));
    fs::write(&path, text)?;
    info!("wrote {} digest to {}", format, path.display());
    Ok(path)
}

/// Companion JSON dump at the same stem as the rendered file: the full
/// structured digest, untouched by display truncation.
pub fn write_json_dump(text_path: &Path, digest: &Digest) -> Result<PathBuf> {
    let json_path = text_path.with_extension("json");
    fs::write(&json_path, serde_json::to_string_pretty(digest)?)?;
    info!("wrote JSON dump to {}", json_path.display());
    Ok(json_path)
}
