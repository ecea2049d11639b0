use crate::error::RenameError;
use crate::exif_reader::ExifInspector;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;

pub const DEFAULT_IDENTIFY_PROGRAM: &str = "identify";

/// Produces line-oriented metadata text for a single file.
pub trait MetadataInspector: Send + Sync {
    fn inspect(&self, path: &Path) -> Result<String, RenameError>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InspectorBackend {
    #[default]
    Identify,
    Exif,
}

pub fn build_inspector(
    backend: InspectorBackend,
    identify_program: &str,
) -> Box<dyn MetadataInspector> {
    match backend {
        InspectorBackend::Identify => Box::new(IdentifyInspector::new(identify_program)),
        InspectorBackend::Exif => Box::new(ExifInspector),
    }
}

/// Runs ImageMagick `identify -verbose` and returns its stdout.
#[derive(Debug, Clone)]
pub struct IdentifyInspector {
    program: String,
}

impl IdentifyInspector {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for IdentifyInspector {
    fn default() -> Self {
        Self::new(DEFAULT_IDENTIFY_PROGRAM)
    }
}

impl MetadataInspector for IdentifyInspector {
    fn inspect(&self, path: &Path) -> Result<String, RenameError> {
        let output = Command::new(&self.program)
            .arg("-verbose")
            .arg(path)
            .output()
            .map_err(|err| RenameError::ExternalTool {
                program: self.program.clone(),
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenameError::ExternalTool {
                program: self.program.clone(),
                path: path.to_path_buf(),
                message: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
