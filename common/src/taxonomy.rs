//! 缺陷描述 → 缺陷類別の分類
//!
//! 1. 完全一致テーブル
//! 2. キーワードによるあいまい一致（ルール順で最初に一致したもの）
//! 3. どちらにも一致しなければ未分類

use crate::category::DefectCategory;
use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// 完全一致テーブル
    static ref EXACT_TABLE: HashMap<&'static str, DefectCategory> = {
        use DefectCategory::*;
        let entries: &[(&str, DefectCategory)] = &[
            ("杆塔树障", Foundation),
            ("杆塔未封顶", Foundation),
            ("杆塔异物", Foundation),
            ("施工遗留", Foundation),
            ("杆塔鸟巢", Foundation),
            ("杆塔倾斜", Foundation),
            ("塔基植被覆盖", Foundation),
            ("塔基杂物堆积", Foundation),
            ("塔基树障", Foundation),
            ("杆塔裂纹", Foundation),
            ("杆塔损伤", Foundation),
            ("塔头破损", Foundation),
            ("杆塔破损", Foundation),
            ("拉线松弛", Foundation),
            ("横担锈蚀", Foundation),
            ("绝缘子脱落", Insulator),
            ("绝缘子破损", Insulator),
            ("绝缘子老化", Insulator),
            ("绝缘子倾斜", Insulator),
            ("绝缘子污秽", Insulator),
            ("绝缘子灼伤", Insulator),
            ("绝缘子雷击", Insulator),
            ("釉面剥落", Insulator),
            ("绑带松脱", Insulator),
            ("绝缘子绑带安装不规范", Insulator),
            ("金具锈蚀", Hardware),
            ("销钉缺失", Hardware),
            ("销钉退出", Hardware),
            ("销钉安装不规范", Hardware),
            ("螺母松动", Hardware),
            ("螺母缺失", Hardware),
            ("防震锤锈蚀", Hardware),
            ("防震锤脱落", Hardware),
            ("导线缠绕", Conductor),
            ("导线脱落", Conductor),
            ("导线悬挂异物", Conductor),
            ("导线断股", Conductor),
            ("导线松股", Conductor),
            ("导线固定不牢", Conductor),
            ("地线悬挂异物", Conductor),
            ("绝缘保护壳破损", Ancillary),
            ("绝缘保护壳缺失", Ancillary),
            ("标识牌脱落", Ancillary),
            ("通道树障", Corridor),
            ("通道施工", Corridor),
            ("变压器漏油", Transformer),
            ("变压器渗油", Transformer),
            ("避雷器雷击", Arrester),
            ("避雷器破损", Arrester),
            ("线耳脱落", Arrester),
            ("避雷器连接线脱落", Arrester),
        ];
        entries.iter().copied().collect()
    };
}

/// あいまい一致ルール（順序が優先順位）
const FUZZY_RULES: &[(&[&str], DefectCategory)] = &[
    (&["绝缘子"], DefectCategory::Insulator),
    (&["杆塔", "塔基", "塔头", "塔顶"], DefectCategory::Foundation),
    (&["金具", "销钉", "螺母"], DefectCategory::Hardware),
    (&["保护壳", "标识牌"], DefectCategory::Ancillary),
    (&["地线", "导线"], DefectCategory::Conductor),
    (&["避雷器"], DefectCategory::Arrester),
    (&["变压器"], DefectCategory::Transformer),
    (&["通道"], DefectCategory::Corridor),
];

/// 分類の根拠
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Fuzzy,
    Miss,
}

/// 分類結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: Option<DefectCategory>,
    pub kind: MatchKind,
}

/// 缺陷描述を分類する（ログ出力なし）
pub fn lookup(reason: &str) -> Classification {
    if let Some(category) = EXACT_TABLE.get(reason) {
        return Classification {
            category: Some(*category),
            kind: MatchKind::Exact,
        };
    }

    match fuzzy_match(reason) {
        Some(category) => Classification {
            category: Some(category),
            kind: MatchKind::Fuzzy,
        },
        None => Classification {
            category: None,
            kind: MatchKind::Miss,
        },
    }
}

/// 缺陷描述を分類し、あいまい一致・未分類を warn で記録する
pub fn classify(reason: &str) -> Option<DefectCategory> {
    let result = lookup(reason);
    match result.kind {
        MatchKind::Exact => {}
        MatchKind::Fuzzy => {
            if let Some(category) = result.category {
                tracing::warn!(reason, category = category.label(), "缺陷類別をあいまい一致で解決");
            }
        }
        MatchKind::Miss => {
            tracing::warn!(reason, "缺陷類別が見つかりません");
        }
    }
    result.category
}

fn fuzzy_match(reason: &str) -> Option<DefectCategory> {
    FUZZY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| reason.contains(k)))
        .map(|(_, category)| *category)
}
