//! 写真一式の分類
//!
//! ファイル名をパースして等級ごとに振り分け、特写写真を対応付ける。
//! 並び順は渡された順（発見順）を保持する。

use crate::error::{Error, Result};
use crate::filename::{parse_file_name, ParsedName};
use crate::severity::Severity;
use crate::taxonomy;
use crate::types::{CloseUpRecord, DefectIdentity, DefectRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 命名違反時の方針
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationPolicy {
    /// 違反ファイルだけを除外して続行
    #[default]
    Skip,
    /// 最初の違反で一式全体を中止
    Abort,
}

impl std::str::FromStr for ViolationPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(ViolationPolicy::Skip),
            "abort" => Ok(ViolationPolicy::Abort),
            _ => Err(format!("Unknown policy: {}. Use skip or abort", s)),
        }
    }
}

/// 除外された命名違反
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamingViolation {
    pub file_name: String,
    pub reason: String,
}

/// 分類済みの写真一式
#[derive(Debug, Clone, Default)]
pub struct ClassifiedBatch {
    tiers: [Vec<DefectRecord>; 3],
    close_ups: HashMap<DefectIdentity, CloseUpRecord>,
    /// 対応する通常写真がない特写写真
    pub orphan_close_ups: Vec<String>,
    pub violations: Vec<NamingViolation>,
    /// 類別が解決できなかった缺陷描述（1件につき1つ）
    pub misses: Vec<String>,
}

/// ファイル名一覧を分類する
pub fn classify_batch<I, S>(file_names: I, policy: ViolationPolicy) -> Result<ClassifiedBatch>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut batch = ClassifiedBatch::default();

    for name in file_names {
        let name = name.as_ref();
        match parse_file_name(name) {
            Ok(ParsedName::Defect(mut record)) => {
                record.category = taxonomy::classify(&record.defect_reason);
                if record.category.is_none() {
                    batch.misses.push(record.defect_reason.clone());
                }
                batch.tiers[record.severity.index()].push(record);
            }
            Ok(ParsedName::CloseUp(close_up)) => {
                if let Some(previous) = batch.close_ups.get(&close_up.identity) {
                    tracing::warn!(
                        previous = %previous.file_name,
                        current = %close_up.file_name,
                        "同じ写真に対する特写写真が複数あります。後のものを使用"
                    );
                }
                batch.close_ups.insert(close_up.identity.clone(), close_up);
            }
            Err(Error::NamingViolation { file_name, reason }) => {
                tracing::error!(file = %file_name, %reason, "写真の名前が命名規則に違反しています");
                if policy == ViolationPolicy::Abort {
                    return Err(Error::NamingViolation { file_name, reason });
                }
                batch.violations.push(NamingViolation { file_name, reason });
            }
            Err(other) => return Err(other),
        }
    }

    batch.link_close_ups();
    Ok(batch)
}

impl ClassifiedBatch {
    fn link_close_ups(&mut self) {
        let mut linked = std::collections::HashSet::new();
        for record in self.tiers.iter_mut().flatten() {
            let identity = record.identity();
            if let Some(close_up) = self.close_ups.get(&identity) {
                record.close_up_ref = Some(close_up.file_name.clone());
                linked.insert(identity);
            }
        }

        let mut orphans: Vec<String> = self
            .close_ups
            .iter()
            .filter(|(identity, _)| !linked.contains(*identity))
            .map(|(_, c)| c.file_name.clone())
            .collect();
        orphans.sort();
        for orphan in &orphans {
            tracing::warn!(file = %orphan, "特写写真に対応する通常写真がありません");
        }
        self.orphan_close_ups = orphans;
    }

    /// 等級ごとの写真（発見順）
    pub fn tier(&self, severity: Severity) -> &[DefectRecord] {
        &self.tiers[severity.index()]
    }

    /// 優先順位順の件数 [危急, 严重, 一般]
    pub fn tier_counts(&self) -> [usize; 3] {
        [
            self.tiers[0].len(),
            self.tiers[1].len(),
            self.tiers[2].len(),
        ]
    }

    /// 優先順位順・発見順のすべての写真
    pub fn records(&self) -> impl Iterator<Item = &DefectRecord> {
        self.tiers.iter().flatten()
    }

    pub fn close_up(&self, identity: &DefectIdentity) -> Option<&CloseUpRecord> {
        self.close_ups.get(identity)
    }

    /// 報告書に載る写真のファイル名（通常写真と対応付いた特写写真）
    pub fn report_file_names(&self) -> impl Iterator<Item = &str> {
        self.records().flat_map(|record| {
            std::iter::once(record.file_name.as_str()).chain(record.close_up_ref.as_deref())
        })
    }

    pub fn close_up_count(&self) -> usize {
        self.close_ups.len()
    }

    pub fn len(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 写真番号を付与する（付与済みのものは変更しない）
    pub fn assign_labels(&mut self) {
        for severity in Severity::ALL {
            for (i, record) in self.tiers[severity.index()].iter_mut().enumerate() {
                if record.label.is_none() {
                    record.label = Some(format!("{}{}", severity.prefix(), i + 1));
                }
            }
        }
    }
}
