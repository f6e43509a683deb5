use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::fs;

use crate::{error::Result, types::AnalysisResult};

/// Get the cache directory for a given URL
pub fn get_cache_dir(url: &str) -> PathBuf {
    cache_dir_in(&get_root_cache_dir(), url)
}

/// The directory name is a SHA-256 prefix of the trimmed URL, so it stays
/// the same across builds and toolchains.
pub fn cache_dir_in(root: &Path, url: &str) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(url.trim().as_bytes());
    let digest = hex::encode(hasher.finalize());
    root.join(&digest[..16])
}

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("fckty")
}

/// Get the path for a cached report (model aware)
pub fn get_report_path(cache_dir: &Path, model: &str) -> PathBuf {
    let model: String = model
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect();
    cache_dir.join(format!("report_{}.json", model))
}

pub async fn load_report(path: &Path) -> Result<AnalysisResult> {
    let json_content = fs::read_to_string(path).await?;
    let report: AnalysisResult = serde_json::from_str(&json_content)?;
    Ok(report)
}

pub async fn save_report(report: &AnalysisResult, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let pretty_json = serde_json::to_string_pretty(report)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}
