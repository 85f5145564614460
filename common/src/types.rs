//! 缺陷写真の型定義
//!
//! - DefectIdentity: 線路・杆塔・缺陷描述・等級の組（特写写真との照合キー）
//! - DefectRecord: 通常の缺陷写真1枚
//! - CloseUpRecord: 特写写真1枚

use crate::category::DefectCategory;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// ファイル名の区切り文字
pub const NAME_DELIMITER: char = '_';

/// 写真の同一性キー
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectIdentity {
    pub route_name: String,
    pub tower_number: String,
    pub defect_reason: String,
    pub severity: Severity,
}

impl DefectIdentity {
    /// 区切り文字で連結したベース名（拡張子なし）
    pub fn base_name(&self) -> String {
        format!(
            "{route}{d}{tower}{d}{reason}{d}{severity}",
            route = self.route_name,
            tower = self.tower_number,
            reason = self.defect_reason,
            severity = self.severity.label(),
            d = NAME_DELIMITER,
        )
    }

    /// 等級を除いたベース名（缺陷汇总表の「缺陷描述」列）
    pub fn description(&self) -> String {
        format!(
            "{}{d}{}{d}{}",
            self.route_name,
            self.tower_number,
            self.defect_reason,
            d = NAME_DELIMITER,
        )
    }
}

/// 通常の缺陷写真
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectRecord {
    /// ファイル名の拡張子を除いた部分（安定キー）
    pub id: String,
    pub file_name: String,
    pub extension: String,
    pub route_name: String,
    pub tower_number: String,
    pub defect_reason: String,
    pub severity: Severity,
    /// 解決済み類別（未解決は None）
    #[serde(default)]
    pub category: Option<DefectCategory>,
    /// 写真番号（A1, B2 ...）。組立時に一度だけ付与される
    #[serde(default)]
    pub label: Option<String>,
    /// 対応する特写写真のファイル名
    #[serde(default)]
    pub close_up_ref: Option<String>,
}

impl DefectRecord {
    pub fn identity(&self) -> DefectIdentity {
        DefectIdentity {
            route_name: self.route_name.clone(),
            tower_number: self.tower_number.clone(),
            defect_reason: self.defect_reason.clone(),
            severity: self.severity,
        }
    }

    /// 4トークンと拡張子から元のファイル名を再構成
    pub fn rejoined_file_name(&self) -> String {
        format!("{}.{}", self.identity().base_name(), self.extension)
    }

    /// 明細表の見出し行に書く文字列
    pub fn heading(&self) -> Option<String> {
        self.label.as_ref().map(|label| format!("{} {}", label, self.id))
    }
}

/// 特写写真
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseUpRecord {
    pub file_name: String,
    /// 特写マーカーを除去した同一性キー
    pub identity: DefectIdentity,
}
