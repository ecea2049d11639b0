mod adjust;
mod apply;
mod batch;
mod config;
mod error;
mod exif_reader;
mod hasher;
mod inspector;
mod matcher;
mod metadata;
mod naming;
mod planner;
mod resolver;
#[cfg(test)]
mod test_support;

pub use adjust::{adjust, compose_delta, AdjustmentFlags, Direction, TimeAdjustment};
pub use apply::{move_file, MoveOutcome};
pub use batch::{
    default_output_dir, run_batch, BatchOptions, BatchResult, FileOutcome, FileRecord,
    DEFAULT_OUTPUT_SUBDIR, DEFAULT_WORKERS,
};
pub use config::{
    app_paths, load_config, load_config_from, save_config, save_config_to, AppConfig, AppPaths,
};
pub use error::RenameError;
pub use exif_reader::ExifInspector;
pub use hasher::hash_file;
pub use inspector::{
    build_inspector, IdentifyInspector, InspectorBackend, MetadataInspector,
    DEFAULT_IDENTIFY_PROGRAM,
};
pub use matcher::find_sidecar;
pub use metadata::{DateSource, MediaFile, MediaKind, ResolvedDate, DEFAULT_EXTENSIONS};
pub use naming::{build_target_path, target_file_name, TIMESTAMP_FORMAT};
pub use planner::{collect_media_files, plan_file, RenamePlan, ScanResult, ScanStats};
pub use resolver::{parse_capture_timestamp, DateResolver};
