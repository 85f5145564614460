use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("メタデータ除去に失敗: {path} ({reason})")]
    MetadataStrip { path: String, reason: String },

    #[error("テンプレートのアンカーが見つかりません: {anchor}")]
    AnchorNotFound { anchor: String },

    #[error("文書構造が不足しています: {0}")]
    StructureMismatch(String),

    #[error("未対応の文書形式: {0}")]
    UnsupportedFormat(String),

    #[error("DOCX生成エラー: {0}")]
    DocxExport(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error(transparent)]
    Common(#[from] inspection_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    pub fn anchor(anchor: impl Into<String>) -> Self {
        ReportError::AnchorNotFound {
            anchor: anchor.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
