//! 缺陷等級（危急 > 严重 > 一般）

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 缺陷等級
///
/// 宣言順がそのまま優先順位（危急が最優先）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// 危急
    Critical,
    /// 严重
    Severe,
    /// 一般
    General,
}

impl Severity {
    /// 優先順位順の全等級
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Severe, Severity::General];

    /// ファイル名トークンから等級を解決（完全一致のみ）
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "危急" => Some(Severity::Critical),
            "严重" => Some(Severity::Severe),
            "一般" => Some(Severity::General),
            _ => None,
        }
    }

    /// ファイル名・表に書かれるラベル
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "危急",
            Severity::Severe => "严重",
            Severity::General => "一般",
        }
    }

    /// 写真番号の接頭辞
    pub fn prefix(&self) -> &'static str {
        match self {
            Severity::Critical => "A",
            Severity::Severe => "B",
            Severity::General => "C",
        }
    }

    /// 0始まりの等級インデックス
    pub fn index(&self) -> usize {
        match self {
            Severity::Critical => 0,
            Severity::Severe => 1,
            Severity::General => 2,
        }
    }

    /// 総覧段落のプレースホルダ名
    pub fn placeholder(&self) -> &'static str {
        match self {
            Severity::Critical => "weiji_bug",
            Severity::Severe => "yanzhong_bug",
            Severity::General => "yiban_bug",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_token(s).ok_or_else(|| Error::UnknownSeverity(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token_exact() {
        assert_eq!(Severity::from_token("危急"), Some(Severity::Critical));
        assert_eq!(Severity::from_token("严重"), Some(Severity::Severe));
        assert_eq!(Severity::from_token("一般"), Some(Severity::General));
        // 前後の空白や繁体字は受け付けない
        assert_eq!(Severity::from_token(" 一般"), None);
        assert_eq!(Severity::from_token("嚴重"), None);
    }

    #[test]
    fn test_priority_order() {
        assert!(Severity::Critical < Severity::Severe);
        assert!(Severity::Severe < Severity::General);
        let mut shuffled = vec![Severity::General, Severity::Critical, Severity::Severe];
        shuffled.sort();
        assert_eq!(shuffled, Severity::ALL.to_vec());
    }

    #[test]
    fn test_prefix_and_label() {
        let prefixes: Vec<&str> = Severity::ALL.iter().map(|s| s.prefix()).collect();
        assert_eq!(prefixes, vec!["A", "B", "C"]);
        assert_eq!(Severity::Severe.to_string(), "严重");
    }

    #[test]
    fn test_from_str_error() {
        let err = "轻微".parse::<Severity>().unwrap_err();
        assert!(matches!(err, Error::UnknownSeverity(_)));
    }
}
