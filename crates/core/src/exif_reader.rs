use crate::error::RenameError;
use crate::inspector::MetadataInspector;
use exif::{Reader, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const PROGRAM_NAME: &str = "kamadak-exif";

/// In-process replacement for `identify -verbose`. Renders every EXIF field as
/// an `exif:<Tag>: <value>` line so the same text parser applies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifInspector;

impl MetadataInspector for ExifInspector {
    fn inspect(&self, path: &Path) -> Result<String, RenameError> {
        let file = File::open(path).map_err(|err| RenameError::io(path, err))?;
        let mut buf = BufReader::new(file);
        let exif = Reader::new()
            .read_from_container(&mut buf)
            .map_err(|err| RenameError::ExternalTool {
                program: PROGRAM_NAME.to_string(),
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;

        let mut out = String::new();
        for field in exif.fields() {
            out.push_str(&format!("    exif:{}: {}\n", field.tag, raw_value(field)));
        }
        Ok(out)
    }
}

fn raw_value(field: &exif::Field) -> String {
    match &field.value {
        Value::Ascii(parts) => parts
            .iter()
            .map(|part| {
                String::from_utf8_lossy(part)
                    .trim_end_matches('\0')
                    .trim()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join(" "),
        _ => field.display_value().to_string(),
    }
}
