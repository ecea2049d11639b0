use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d--%H-%M-%S";

/// `YYYY-MM-DD--HH-MM-SS_<digest>.<ext>`
pub fn target_file_name(timestamp: NaiveDateTime, digest: &str, extension: &str) -> String {
    let extension = extension.trim_start_matches('.').to_ascii_lowercase();
    format!(
        "{}_{}.{}",
        timestamp.format(TIMESTAMP_FORMAT),
        digest,
        extension
    )
}

pub fn build_target_path(
    timestamp: NaiveDateTime,
    digest: &str,
    extension: &str,
    output_dir: &Path,
) -> PathBuf {
    output_dir.join(target_file_name(timestamp, digest, extension))
}
