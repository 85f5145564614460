use crate::error::{ReportError, Result};
use inspection_common::ViolationPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 写真フォルダ（作業ディレクトリからの相対パス）
    pub image_dir: PathBuf,
    /// テンプレート文書
    pub template_path: PathBuf,
    /// 構造調整後の中間文書
    pub intermediate_path: PathBuf,
    /// 報告書の出力先フォルダ
    pub output_dir: PathBuf,
    /// 報告書名の入力がタイムアウトした場合の既定値
    pub default_output_name: String,
    pub output_extension: String,
    pub prompt_timeout_secs: u64,
    /// メタデータ除去のワーカー数
    pub strip_workers: usize,
    pub strip_metadata: bool,
    /// 統計表の数字フォント
    pub statistics_font: String,
    /// 統計表の数字に見出しセルのフォントサイズを適用する
    pub copy_statistics_font_size: bool,
    pub violation_policy: ViolationPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("pic"),
            template_path: PathBuf::from("template.json"),
            intermediate_path: PathBuf::from("tpl.json"),
            output_dir: PathBuf::from("."),
            default_output_name: "res".into(),
            output_extension: "docx".into(),
            prompt_timeout_secs: 60,
            strip_workers: 10,
            strip_metadata: true,
            statistics_font: "Times New Roman".into(),
            copy_statistics_font_size: true,
            violation_policy: ViolationPolicy::Skip,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ReportError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("defect-report").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.strip_workers == 0 {
            return Err(ReportError::Config("strip_workers は1以上".into()));
        }
        if self.output_extension.trim().is_empty() {
            return Err(ReportError::Config("output_extension が空です".into()));
        }
        Ok(())
    }

    /// 報告書のファイルパス（拡張子は固定）
    ///
    /// 名前は最後のパス要素だけを使い、出力先フォルダの外には出さない。
    pub fn output_path(&self, name: &str) -> PathBuf {
        let base = name
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or_default()
            .trim();
        let suffix = format!(".{}", self.output_extension);
        let base = match base.len().checked_sub(suffix.len()) {
            Some(cut) if base.is_char_boundary(cut) && base[cut..].eq_ignore_ascii_case(&suffix) => {
                &base[..cut]
            }
            _ => base,
        };
        let base = match base {
            "" | "." | ".." => {
                tracing::warn!(name, "報告書名が使えないため既定値を使います");
                self.default_output_name.as_str()
            }
            other => other,
        };
        self.output_dir.join(format!("{}{}", base, suffix))
    }
}
