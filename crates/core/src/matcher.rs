use std::fs;
use std::path::{Path, PathBuf};

pub const SIDECAR_EXTENSIONS: &[&str] = &["thm"];

/// Finds a thumbnail sidecar next to `media_path` sharing its stem.
pub fn find_sidecar(media_path: &Path) -> Option<PathBuf> {
    let search_dir = media_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let stem = media_path.file_stem()?.to_string_lossy().to_string();

    SIDECAR_EXTENSIONS
        .iter()
        .find_map(|ext| find_candidate_with_case_variants(search_dir, &stem, ext))
}

fn find_candidate_with_case_variants(search_dir: &Path, stem: &str, ext: &str) -> Option<PathBuf> {
    let lower = search_dir.join(format!("{}.{}", stem, ext));
    if lower.is_file() {
        return Some(lower);
    }

    let upper = search_dir.join(format!("{}.{}", stem, ext.to_ascii_uppercase()));
    if upper.is_file() {
        return Some(upper);
    }

    let expected = format!("{}.{}", stem, ext).to_ascii_lowercase();
    let entries = fs::read_dir(search_dir).ok()?;
    for entry in entries.flatten() {
        let name = entry.file_name();
        if !name.to_string_lossy().eq_ignore_ascii_case(&expected) {
            continue;
        }
        let path = entry.path();
        if path.is_file() {
            return Some(path);
        }
    }

    None
}
