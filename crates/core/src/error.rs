use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("設定が不正です: {0}")]
    Config(String),
    #[error("撮影日時を特定できませんでした: {}", .0.display())]
    UnresolvedDate(PathBuf),
    #[error("ファイル操作に失敗しました: {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("外部ツール {program} が失敗しました: {}: {message}", path.display())]
    ExternalTool {
        program: String,
        path: PathBuf,
        message: String,
    },
    #[error("日時の補正結果が範囲外です: {0}")]
    DateOutOfRange(String),
}

impl RenameError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
