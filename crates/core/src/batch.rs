use crate::adjust::TimeAdjustment;
use crate::apply::{move_file, MoveOutcome};
use crate::error::RenameError;
use crate::inspector::MetadataInspector;
use crate::metadata::{DateSource, MediaFile, DEFAULT_EXTENSIONS};
use crate::planner::{collect_media_files, plan_file, ScanStats};
use crate::resolver::DateResolver;
use log::{error, info, warn};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_WORKERS: usize = 16;
pub const DEFAULT_OUTPUT_SUBDIR: &str = "links";

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub extensions: Vec<String>,
    pub workers: usize,
    pub adjustment: TimeAdjustment,
    pub dry_run: bool,
}

impl BatchOptions {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        let input_dir = input_dir.into();
        Self {
            output_dir: default_output_dir(&input_dir),
            input_dir,
            extensions: DEFAULT_EXTENSIONS.iter().map(|v| v.to_string()).collect(),
            workers: DEFAULT_WORKERS,
            adjustment: TimeAdjustment::none(),
            dry_run: false,
        }
    }
}

pub fn default_output_dir(input_dir: &Path) -> PathBuf {
    input_dir.join(DEFAULT_OUTPUT_SUBDIR)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileOutcome {
    Renamed,
    Duplicate,
    Unchanged,
    Planned,
    SkippedUnresolved,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub outcome: FileOutcome,
    pub target: Option<PathBuf>,
    pub date_source: Option<DateSource>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub scan: ScanStats,
    pub renamed: usize,
    pub duplicates: usize,
    pub unchanged: usize,
    pub planned: usize,
    pub skipped_unresolved: usize,
    pub failed: usize,
    pub records: Vec<FileRecord>,
}

impl BatchResult {
    fn from_records(scan: ScanStats, mut records: Vec<FileRecord>) -> Self {
        records.sort_by(|a, b| a.path.cmp(&b.path));
        let mut result = Self {
            scan,
            ..Self::default()
        };
        for record in &records {
            match record.outcome {
                FileOutcome::Renamed => result.renamed += 1,
                FileOutcome::Duplicate => result.duplicates += 1,
                FileOutcome::Unchanged => result.unchanged += 1,
                FileOutcome::Planned => result.planned += 1,
                FileOutcome::SkippedUnresolved => result.skipped_unresolved += 1,
                FileOutcome::Failed => result.failed += 1,
            }
        }
        result.records = records;
        result
    }

    pub fn processed(&self) -> usize {
        self.records.len()
    }

    pub fn problems(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter().filter(|record| {
            matches!(
                record.outcome,
                FileOutcome::SkippedUnresolved | FileOutcome::Failed
            )
        })
    }
}

/// Renames every eligible file in `options.input_dir` on a pool of
/// `options.workers` threads. Per-file problems end up in the returned
/// records; only invalid options and an unreadable input directory are
/// returned as errors.
pub fn run_batch(
    options: &BatchOptions,
    inspector: &dyn MetadataInspector,
) -> Result<BatchResult, RenameError> {
    validate_options(options)?;

    if !options.dry_run {
        fs::create_dir_all(&options.output_dir)
            .map_err(|err| RenameError::io(&options.output_dir, err))?;
    }

    let scan = collect_media_files(&options.input_dir, &options.extensions)?;
    info!(
        "{} 件の対象ファイルを {} スレッドで処理します",
        scan.files.len(),
        options.workers
    );

    let pool = ThreadPoolBuilder::new()
        .num_threads(options.workers)
        .thread_name(|index| format!("media-renamer-{index}"))
        .build()
        .map_err(|err| RenameError::Config(format!("ワーカーを起動できませんでした: {err}")))?;

    let resolver = DateResolver::new(inspector);
    let records: Vec<FileRecord> = pool.install(|| {
        scan.files
            .par_iter()
            .map(|file| process_file(file, &resolver, options))
            .collect()
    });

    Ok(BatchResult::from_records(scan.stats, records))
}

fn validate_options(options: &BatchOptions) -> Result<(), RenameError> {
    if options.workers == 0 {
        return Err(RenameError::Config(
            "ワーカー数は1以上を指定してください".to_string(),
        ));
    }
    if options.extensions.is_empty() {
        return Err(RenameError::Config("対象拡張子が空です".to_string()));
    }
    if !options.input_dir.is_dir() {
        return Err(RenameError::Config(format!(
            "入力フォルダが存在しません: {}",
            options.input_dir.display()
        )));
    }
    if options.output_dir.exists() && !options.output_dir.is_dir() {
        return Err(RenameError::Config(format!(
            "出力先がフォルダではありません: {}",
            options.output_dir.display()
        )));
    }
    Ok(())
}

fn process_file(
    file: &MediaFile,
    resolver: &DateResolver<'_>,
    options: &BatchOptions,
) -> FileRecord {
    let plan = match plan_file(file, resolver, &options.adjustment, &options.output_dir) {
        Ok(plan) => plan,
        Err(err @ RenameError::UnresolvedDate(_)) => {
            warn!("{}", err);
            return FileRecord {
                path: file.path.clone(),
                outcome: FileOutcome::SkippedUnresolved,
                target: None,
                date_source: None,
                message: Some(err.to_string()),
            };
        }
        Err(err) => {
            error!("{}: {}", file.path.display(), err);
            return FileRecord {
                path: file.path.clone(),
                outcome: FileOutcome::Failed,
                target: None,
                date_source: None,
                message: Some(err.to_string()),
            };
        }
    };

    let outcome = if options.dry_run {
        info!(
            "[dry-run] {} -> {}",
            plan.source_path.display(),
            plan.target_path.display()
        );
        Ok(FileOutcome::Planned)
    } else {
        move_file(&plan.source_path, &plan.target_path).map(|moved| match moved {
            MoveOutcome::Moved => FileOutcome::Renamed,
            MoveOutcome::ReplacedDuplicate => FileOutcome::Duplicate,
            MoveOutcome::AlreadyInPlace => FileOutcome::Unchanged,
        })
    };

    match outcome {
        Ok(outcome) => {
            if outcome != FileOutcome::Planned {
                info!(
                    "{} -> {} ({:?})",
                    plan.source_path.display(),
                    plan.target_path.display(),
                    outcome
                );
            }
            FileRecord {
                path: plan.source_path,
                outcome,
                target: Some(plan.target_path),
                date_source: Some(plan.date_source),
                message: None,
            }
        }
        Err(err) => {
            error!("{}: {}", plan.source_path.display(), err);
            FileRecord {
                path: plan.source_path,
                outcome: FileOutcome::Failed,
                target: Some(plan.target_path),
                date_source: Some(plan.date_source),
                message: Some(err.to_string()),
            }
        }
    }
}
