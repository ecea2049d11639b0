use crate::adjust::TimeAdjustment;
use crate::error::RenameError;
use crate::hasher::hash_file;
use crate::metadata::{lowercase_extension, DateSource, MediaFile};
use crate::naming::build_target_path;
use crate::resolver::DateResolver;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenamePlan {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub timestamp: NaiveDateTime,
    pub date_source: DateSource,
    pub digest: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanStats {
    pub scanned_files: usize,
    pub eligible_files: usize,
    pub ignored_files: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub files: Vec<MediaFile>,
    pub stats: ScanStats,
}

/// Lists the top level of `root` and keeps regular files whose lowercased
/// extension is in `extensions`.
pub fn collect_media_files(root: &Path, extensions: &[String]) -> Result<ScanResult, RenameError> {
    let mut result = ScanResult::default();

    let entries = fs::read_dir(root).map_err(|err| RenameError::io(root, err))?;
    for entry in entries {
        let entry = entry.map_err(|err| RenameError::io(root, err))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        result.stats.scanned_files += 1;

        let eligible = lowercase_extension(&path)
            .map(|ext| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(&ext)))
            .unwrap_or(false);
        if !eligible {
            result.stats.ignored_files += 1;
            continue;
        }

        if let Some(file) = MediaFile::from_path(&path) {
            result.stats.eligible_files += 1;
            result.files.push(file);
        }
    }
    result.files.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(result)
}

/// resolve -> adjust -> hash -> name. Nothing on disk is modified.
pub fn plan_file(
    file: &MediaFile,
    resolver: &DateResolver<'_>,
    adjustment: &TimeAdjustment,
    output_dir: &Path,
) -> Result<RenamePlan, RenameError> {
    let resolved = resolver
        .resolve(file)
        .ok_or_else(|| RenameError::UnresolvedDate(file.path.clone()))?;
    let timestamp = adjustment.apply(resolved.timestamp)?;
    let digest = hash_file(&file.path)?;
    let target_path = build_target_path(timestamp, &digest, &file.extension, output_dir);

    Ok(RenamePlan {
        source_path: file.path.clone(),
        target_path,
        timestamp,
        date_source: resolved.source,
        digest,
    })
}
