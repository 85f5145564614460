//! テンプレート文書との取り決め（アンカー文字列・セル位置）
//!
//! 文字列は完全一致で照合する。テンプレート側で変更しないこと。

use inspection_common::Severity;

/// 取り決めの版
pub const CONTRACT_VERSION: u32 = 1;

/// 明細表の見出しセル (0, 0)
pub const DETAIL_HEADER: &str = "线路名称";
/// 缺陷汇总表の見出しセル (0, 1)
pub const LEDGER_HEADER: &str = "缺陷描述";
/// 缺陷数量統計表の見出しセル (0, 0)
pub const SEVERITY_STATS_HEADER: &str = "缺陷等级";
/// 缺陷類別統計表の見出しセル (0, 0)
pub const CATEGORY_STATS_HEADER: &str = "缺陷类别";
/// 缺陷情況総覧の段落
pub const NARRATIVE_ANCHOR: &str = "本次现场巡检";

/// 明細表のセル位置（見出し行挿入前）
pub const ROUTE_CELL: (usize, usize) = (1, 0);
pub const TOWER_CELL: (usize, usize) = (1, 1);
pub const SEVERITY_CELL: (usize, usize) = (1, 2);
pub const REASON_CELL: (usize, usize) = (2, 1);
pub const PHOTO_CELL: (usize, usize) = (3, 0);
pub const CLOSE_UP_CELL: (usize, usize) = (4, 1);

/// 写真の表示サイズ（cm）
pub const PHOTO_BOX: (f32, f32) = (16.4, 12.3);
pub const CLOSE_UP_BOX: (f32, f32) = (7.0, 7.0);
pub const CLOSE_UP_ROW_HEIGHT_CM: f32 = 7.34;
pub const HEADER_ROW_HEIGHT_CM: f32 = 0.85;

/// 等級ごとの明細表見出し段落
pub fn detail_heading(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "危急缺陷明细表",
        Severity::Severe => "严重缺陷明细表",
        Severity::General => "一般缺陷明细表",
    }
}

/// 等級ごとの汇总表見出し段落（照合には使わない）
pub fn ledger_heading(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "危急缺陷汇总表",
        Severity::Severe => "严重缺陷汇总表",
        Severity::General => "一般缺陷汇总表",
    }
}
