use crate::inspector::MetadataInspector;
use crate::matcher::find_sidecar;
use crate::metadata::{DateSource, MediaFile, ResolvedDate};
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;

const CAPTURE_FIELD: &str = "DateTimeOriginal";

static RE_CAPTURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"DateTimeOriginal: (\d{4}):(\d{2}):(\d{2})\s+(\d{2}):(\d{2}):(\d{2})").unwrap()
});
static RE_FILENAME_DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|\D)(20\d{2})[-_.: T]*(\d{2})[-_.: T]*(\d{2})[-_.: T]*(\d{2})[-_.: T]*(\d{2})[-_.: T]*(\d{2})(?:\D|$)",
    )
    .unwrap()
});
static RE_FILENAME_DATE_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\D)(20\d{2})(\d{2})(\d{2})[-_](?i:wa)\d+(?:\D|$)").unwrap());

type Strategy = fn(&dyn MetadataInspector, &MediaFile) -> Option<NaiveDateTime>;

/// Tried in order; the first strategy returning a date wins.
static STRATEGIES: &[(DateSource, Strategy)] = &[
    (DateSource::EmbeddedMetadata, from_embedded_metadata as Strategy),
    (DateSource::FilenamePattern, from_filename_pattern as Strategy),
    (DateSource::FilenameDateOnly, from_filename_date_only as Strategy),
    (DateSource::SidecarThumbnail, from_sidecar_thumbnail as Strategy),
];

pub struct DateResolver<'a> {
    inspector: &'a dyn MetadataInspector,
}

impl<'a> DateResolver<'a> {
    pub fn new(inspector: &'a dyn MetadataInspector) -> Self {
        Self { inspector }
    }

    pub fn resolve(&self, file: &MediaFile) -> Option<ResolvedDate> {
        for (source, strategy) in STRATEGIES {
            if let Some(timestamp) = strategy(self.inspector, file) {
                debug!(
                    "{}: {:?} から日時を取得しました: {}",
                    file.path.display(),
                    source,
                    timestamp
                );
                return Some(ResolvedDate {
                    timestamp,
                    source: *source,
                });
            }
        }
        None
    }
}

/// Scans inspector text for the first parseable `DateTimeOriginal` line.
pub fn parse_capture_timestamp(text: &str) -> Option<NaiveDateTime> {
    text.lines()
        .filter(|line| line.contains(CAPTURE_FIELD))
        .find_map(|line| {
            let parsed = RE_CAPTURE.captures(line).and_then(|caps| timestamp_from(&caps));
            if parsed.is_none() {
                debug!("DateTimeOriginal を解析できませんでした: {}", line.trim());
            }
            parsed
        })
}

fn from_embedded_metadata(
    inspector: &dyn MetadataInspector,
    file: &MediaFile,
) -> Option<NaiveDateTime> {
    if !file.is_image() {
        return None;
    }
    inspect_capture_timestamp(inspector, &file.path)
}

fn from_filename_pattern(_: &dyn MetadataInspector, file: &MediaFile) -> Option<NaiveDateTime> {
    let path = file.path.to_string_lossy();
    first_valid_match(&RE_FILENAME_DATETIME, &path, timestamp_from)
}

fn from_filename_date_only(_: &dyn MetadataInspector, file: &MediaFile) -> Option<NaiveDateTime> {
    let path = file.path.to_string_lossy();
    first_valid_match(&RE_FILENAME_DATE_ONLY, &path, |caps| {
        NaiveDate::from_ymd_opt(group(caps, 1)? as i32, group(caps, 2)?, group(caps, 3)?)?
            .and_hms_opt(0, 0, 0)
    })
}

fn from_sidecar_thumbnail(
    inspector: &dyn MetadataInspector,
    file: &MediaFile,
) -> Option<NaiveDateTime> {
    if !file.is_video() {
        return None;
    }
    let sidecar = find_sidecar(&file.path)?;
    debug!(
        "{}: サイドカーを参照します: {}",
        file.path.display(),
        sidecar.display()
    );
    inspect_capture_timestamp(inspector, &sidecar)
}

fn inspect_capture_timestamp(
    inspector: &dyn MetadataInspector,
    path: &Path,
) -> Option<NaiveDateTime> {
    match inspector.inspect(path) {
        Ok(text) => parse_capture_timestamp(&text),
        Err(err) => {
            debug!("メタデータ取得をスキップします: {err}");
            None
        }
    }
}

/// Boundary characters are consumed by the patterns, so candidates are retried
/// from one character past each rejected match instead of via `captures_iter`.
fn first_valid_match<T>(
    re: &Regex,
    haystack: &str,
    parse: impl Fn(&Captures<'_>) -> Option<T>,
) -> Option<T> {
    let mut start = 0usize;
    while start < haystack.len() {
        let caps = re.captures_at(haystack, start)?;
        if let Some(value) = parse(&caps) {
            return Some(value);
        }
        let matched = caps.get(0)?;
        let step = haystack[matched.start()..].chars().next()?.len_utf8();
        start = matched.start() + step;
    }
    None
}

fn timestamp_from(caps: &Captures<'_>) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(
        group(caps, 1)? as i32,
        group(caps, 2)?,
        group(caps, 3)?,
    )?
    .and_hms_opt(group(caps, 4)?, group(caps, 5)?, group(caps, 6)?)
}

fn group(caps: &Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index)?.as_str().parse().ok()
}
