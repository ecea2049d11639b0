use crate::error::RenameError;
use crate::inspector::MetadataInspector;
use std::collections::HashMap;
use std::path::Path;

/// Returns canned inspector output keyed by file name; unknown files fail like
/// a missing external tool would.
#[derive(Debug, Default)]
pub struct FakeInspector {
    outputs: HashMap<String, String>,
}

impl FakeInspector {
    pub fn with(mut self, file_name: &str, output: &str) -> Self {
        self.outputs.insert(file_name.to_string(), output.to_string());
        self
    }
}

impl MetadataInspector for FakeInspector {
    fn inspect(&self, path: &Path) -> Result<String, RenameError> {
        let name = path
            .file_name()
            .map(|v| v.to_string_lossy().to_string())
            .unwrap_or_default();
        self.outputs
            .get(&name)
            .cloned()
            .ok_or_else(|| RenameError::ExternalTool {
                program: "fake".to_string(),
                path: path.to_path_buf(),
                message: "no canned output".to_string(),
            })
    }
}

pub fn identify_output(date_time_original: &str) -> String {
    format!(
        "Image: sample.jpg\n  Format: JPEG (Joint Photographic Experts Group JFIF format)\n  Properties:\n    exif:DateTime: 2030:01:01 00:00:00\n    exif:DateTimeOriginal: {date_time_original}\n    exif:Make: Canon\n"
    )
}

/// Minimal JPEG whose APP1 segment carries only an Exif IFD with
/// DateTimeOriginal.
pub fn jpeg_with_capture_date(date_time_original: &str) -> Vec<u8> {
    let mut value = date_time_original.as_bytes().to_vec();
    value.push(0);

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());

    // IFD0 at 8: ExifIFDPointer -> 26
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x8769u16.to_le_bytes());
    tiff.extend_from_slice(&4u16.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&26u32.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());

    // Exif IFD at 26: DateTimeOriginal -> 44
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x9003u16.to_le_bytes());
    tiff.extend_from_slice(&2u16.to_le_bytes());
    tiff.extend_from_slice(&(value.len() as u32).to_le_bytes());
    tiff.extend_from_slice(&44u32.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());
    tiff.extend_from_slice(&value);

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);

    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    jpeg.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    jpeg.extend_from_slice(&payload);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}
