//! 缺陷類別

use serde::{Deserialize, Serialize};

/// 缺陷類別（統計表・総覧段落の集計単位）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DefectCategory {
    /// 绝缘子
    Insulator,
    /// 基础（杆塔・塔基）
    Foundation,
    /// 金具
    Hardware,
    /// 附属设施
    Ancillary,
    /// 导地线
    Conductor,
    /// 避雷器
    Arrester,
    /// 变压器
    Transformer,
    /// 通道
    Corridor,
}

impl DefectCategory {
    /// 統計表の行順
    pub const ALL: [DefectCategory; 8] = [
        DefectCategory::Insulator,
        DefectCategory::Foundation,
        DefectCategory::Hardware,
        DefectCategory::Ancillary,
        DefectCategory::Conductor,
        DefectCategory::Arrester,
        DefectCategory::Transformer,
        DefectCategory::Corridor,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DefectCategory::Insulator => "绝缘子",
            DefectCategory::Foundation => "基础",
            DefectCategory::Hardware => "金具",
            DefectCategory::Ancillary => "附属设施",
            DefectCategory::Conductor => "导地线",
            DefectCategory::Arrester => "避雷器",
            DefectCategory::Transformer => "变压器",
            DefectCategory::Corridor => "通道",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == label)
    }

    /// 総覧段落のプレースホルダ名
    pub fn placeholder(&self) -> &'static str {
        match self {
            DefectCategory::Insulator => "jueyuanzi_bug",
            DefectCategory::Foundation => "jichu_bug",
            DefectCategory::Hardware => "jinjv_bug",
            DefectCategory::Ancillary => "fushu_bug",
            DefectCategory::Conductor => "daodixian_bug",
            DefectCategory::Arrester => "bileiqi_bug",
            DefectCategory::Transformer => "bianyaqi_bug",
            DefectCategory::Corridor => "tongdao_bug",
        }
    }
}

impl std::fmt::Display for DefectCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
