use crate::error::RenameError;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

const TEMP_PREFIX: &str = ".media_renamer_tmp_";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    ReplacedDuplicate,
    AlreadyInPlace,
}

/// Moves `source` onto `target`. The target is claimed with a hard link so
/// that concurrent moves onto the same name see exactly one winner; the rest
/// are reported as duplicates. Cross-volume moves copy through a temporary
/// file and only then remove the source.
pub fn move_file(source: &Path, target: &Path) -> Result<MoveOutcome, RenameError> {
    if is_same_file(source, target) {
        return Ok(MoveOutcome::AlreadyInPlace);
    }

    match fs::hard_link(source, target) {
        Ok(()) => {
            release_source(source, target)?;
            Ok(MoveOutcome::Moved)
        }
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            discard_duplicate(source, target, err)
        }
        Err(err) if err.kind() == ErrorKind::CrossesDevices => copy_then_remove(source, target),
        Err(err) if links_unsupported(&err) => rename_into_place(source, target),
        Err(err) => Err(RenameError::io(source, err)),
    }
}

// The target now shares the source's inode; dropping our link on failure
// leaves the source untouched.
fn release_source(source: &Path, target: &Path) -> Result<(), RenameError> {
    fs::remove_file(source).map_err(|err| {
        let _ = fs::remove_file(target);
        RenameError::io(source, err)
    })
}

fn discard_duplicate(
    source: &Path,
    target: &Path,
    err: io::Error,
) -> Result<MoveOutcome, RenameError> {
    if !target.is_file() {
        return Err(RenameError::io(target, err));
    }
    info!(
        "同一内容のファイルが既に存在するため置き換えます: {} -> {}",
        source.display(),
        target.display()
    );
    fs::remove_file(source).map_err(|err| RenameError::io(source, err))?;
    Ok(MoveOutcome::ReplacedDuplicate)
}

fn links_unsupported(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::Unsupported | ErrorKind::PermissionDenied
    )
}

// Filesystems without hard links (FAT, some network mounts) fall back to a
// plain rename, where the duplicate check is best effort.
fn rename_into_place(source: &Path, target: &Path) -> Result<MoveOutcome, RenameError> {
    let target_exists = target.exists();
    if target_exists && !target.is_file() {
        return Err(RenameError::io(
            target,
            io::Error::new(ErrorKind::AlreadyExists, "移動先がファイルではありません"),
        ));
    }

    match fs::rename(source, target) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::CrossesDevices => {
            return copy_then_remove(source, target);
        }
        Err(err) => return Err(RenameError::io(source, err)),
    }

    if target_exists {
        info!(
            "同一内容のファイルが既に存在するため置き換えました: {} -> {}",
            source.display(),
            target.display()
        );
        Ok(MoveOutcome::ReplacedDuplicate)
    } else {
        Ok(MoveOutcome::Moved)
    }
}

fn copy_then_remove(source: &Path, target: &Path) -> Result<MoveOutcome, RenameError> {
    let temp_path = temp_path_for(target);

    let staged = fs::copy(source, &temp_path)
        .and_then(|_| File::open(&temp_path))
        .and_then(|file| file.sync_all());
    if let Err(err) = staged {
        let _ = fs::remove_file(&temp_path);
        return Err(RenameError::io(source, err));
    }

    let claimed = match fs::hard_link(&temp_path, target) {
        Ok(()) => Ok(MoveOutcome::Moved),
        Err(err) if err.kind() == ErrorKind::AlreadyExists && target.is_file() => {
            info!(
                "同一内容のファイルが既に存在するため置き換えます: {} -> {}",
                source.display(),
                target.display()
            );
            Ok(MoveOutcome::ReplacedDuplicate)
        }
        Err(err) if links_unsupported(&err) => {
            let target_exists = target.is_file();
            fs::rename(&temp_path, target).map(|()| {
                if target_exists {
                    MoveOutcome::ReplacedDuplicate
                } else {
                    MoveOutcome::Moved
                }
            })
        }
        Err(err) => Err(err),
    };
    let _ = fs::remove_file(&temp_path);
    let outcome = claimed.map_err(|err| RenameError::io(target, err))?;

    fs::remove_file(source).map_err(|err| RenameError::io(source, err))?;
    Ok(outcome)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn temp_path_for(target: &Path) -> PathBuf {
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    let file_name = target
        .file_name()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string());
    parent.join(format!(
        "{}{}_{}",
        TEMP_PREFIX,
        std::process::id(),
        file_name
    ))
}
