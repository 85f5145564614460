//! 報告書生成の1回分の実行
//!
//! 写真の列挙 → 分類 → メタデータ除去 → 構造調整（中間文書に保存）
//! → 中間文書を開き直して組立 → 報告書を保存。
//! 各段階は前の段階の出力を保存してから次に進み、文書を同時に触らない。

use crate::config::Config;
use crate::document::Document;
use crate::error::{ReportError, Result};
use crate::report::{self, AssemblyOptions, AssemblySummary, ReconcileReport};
use crate::scanner::{self, ImageInfo, StripSummary};
use inspection_common::{classify_batch, ClassifiedBatch, NamingViolation, StatisticsAggregator};
use std::collections::HashSet;
use std::path::PathBuf;

/// 実行結果
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub tier_counts: [usize; 3],
    pub close_ups: usize,
    pub violations: Vec<NamingViolation>,
    pub orphan_close_ups: Vec<String>,
    pub misses: Vec<String>,
    pub strip: Option<StripSummary>,
    pub reconcile: ReconcileReport,
    pub assembly: AssemblySummary,
    pub output_path: PathBuf,
}

/// 1回分の報告書生成
///
/// 集計器は実行ごとに初期化される。
pub struct ReportRun {
    config: Config,
    stats: StatisticsAggregator,
}

impl ReportRun {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            stats: StatisticsAggregator::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 直前の実行の集計
    pub fn statistics(&self) -> &StatisticsAggregator {
        &self.stats
    }

    /// 写真フォルダを列挙して分類する（文書は触らない）
    pub fn classify(&self) -> Result<ClassifiedBatch> {
        let images = scanner::scan_folder(&self.config.image_dir)?;
        let batch = classify_batch(
            images.iter().map(|i| i.file_name.as_str()),
            self.config.violation_policy,
        )?;
        tracing::info!(
            photos = batch.len(),
            close_ups = batch.close_up_count(),
            violations = batch.violations.len(),
            "写真を分類しました"
        );
        Ok(batch)
    }

    /// 報告書を生成する
    ///
    /// `output_name` は保存の直前に一度だけ呼ばれる（対話入力のため）。
    pub fn execute(&mut self, output_name: impl FnOnce() -> String) -> Result<RunSummary> {
        self.stats.reset();

        let images = scanner::scan_folder(&self.config.image_dir)?;
        let mut batch = classify_batch(
            images.iter().map(|i| i.file_name.as_str()),
            self.config.violation_policy,
        )?;

        if batch.is_empty() {
            tracing::warn!(folder = %self.config.image_dir.display(), "対象の写真がありません");
            return Err(ReportError::NoImagesFound(
                self.config.image_dir.display().to_string(),
            ));
        }

        let strip = if self.config.strip_metadata {
            // 報告書に載らない写真は書き換えない
            let reported: HashSet<&str> = batch.report_file_names().collect();
            let targets: Vec<ImageInfo> = images
                .iter()
                .filter(|i| reported.contains(i.file_name.as_str()))
                .cloned()
                .collect();
            Some(scanner::strip_metadata(&targets, self.config.strip_workers)?)
        } else {
            None
        };

        let counts = batch.tier_counts();
        let reconcile = report::reconcile_file(
            &self.config.template_path,
            &self.config.intermediate_path,
            counts,
        )?;

        let mut doc = Document::open(&self.config.intermediate_path)?;
        let options = AssemblyOptions::from_config(&self.config);
        let assembly = report::assemble(&mut doc, &mut batch, &mut self.stats, &options)?;

        let output_path = self.config.output_path(&output_name());
        doc.save(&output_path)?;
        tracing::info!(path = %output_path.display(), "報告書を保存しました");

        Ok(RunSummary {
            tier_counts: counts,
            close_ups: batch.close_up_count(),
            violations: batch.violations,
            orphan_close_ups: batch.orphan_close_ups,
            misses: batch.misses,
            strip,
            reconcile,
            assembly,
            output_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::template::standard_template;
    use inspection_common::ViolationPolicy;
    use std::path::Path;
    use tempfile::tempdir;

    fn config_in(root: &Path) -> Config {
        Config {
            image_dir: root.join("pic"),
            template_path: root.join("template.json"),
            intermediate_path: root.join("tpl.json"),
            output_dir: root.join("out"),
            output_extension: "json".into(),
            strip_workers: 2,
            ..Default::default()
        }
    }

    fn write_photo(dir: &Path, name: &str) {
        image::RgbImage::new(4, 3).save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_empty_folder_leaves_template_untouched() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = config_in(dir.path());
        std::fs::create_dir(&config.image_dir).unwrap();

        let mut run = ReportRun::new(config.clone());
        let err = run.execute(|| "res".into()).unwrap_err();
        assert!(matches!(err, ReportError::NoImagesFound(_)));
        assert!(!config.intermediate_path.exists());
    }

    #[test]
    fn test_execute_writes_intermediate_and_report() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = config_in(dir.path());
        std::fs::create_dir(&config.image_dir).unwrap();
        standard_template().save(&config.template_path).unwrap();
        write_photo(&config.image_dir, "L1_5_绝缘子脱落_危急.png");
        write_photo(&config.image_dir, "L1_6_绝缘子脱落_危急.png");
        write_photo(&config.image_dir, "bad_name.png");

        let mut run = ReportRun::new(config.clone());
        let summary = run.execute(|| "巡检报告".into()).unwrap();

        assert_eq!(summary.tier_counts, [2, 0, 0]);
        assert_eq!(summary.violations.len(), 1);
        assert_eq!(summary.reconcile.detail_tables_added, [1, 0, 0]);
        assert_eq!(summary.output_path, dir.path().join("out").join("巡检报告.json"));
        assert!(config.intermediate_path.exists());
        assert!(summary.output_path.exists());
        assert_eq!(run.statistics().total(), 2);

        // 2回目は集計が積み上がらない
        let second = run.execute(|| "巡检报告".into()).unwrap();
        assert_eq!(run.statistics().total(), 2);
        // テンプレート自体は書き換えないので同じ調整になる
        assert_eq!(second.reconcile.detail_tables_added, [1, 0, 0]);
    }

    #[test]
    fn test_strip_skips_unreported_photos() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = config_in(dir.path());
        std::fs::create_dir(&config.image_dir).unwrap();
        standard_template().save(&config.template_path).unwrap();
        write_photo(&config.image_dir, "L1_5_杆塔倾斜_一般.png");
        write_photo(&config.image_dir, "L1_5_杆塔倾斜_一般_特写.png");
        write_photo(&config.image_dir, "L2_1_销钉缺失_危急_特写.png");
        // 画像として読めないが、除外されるので触られない
        let excluded = config.image_dir.join("bad_name.jpg");
        std::fs::write(&excluded, b"not an image").unwrap();

        let mut run = ReportRun::new(config.clone());
        let summary = run.execute(|| "res".into()).unwrap();

        assert_eq!(summary.strip.map(|s| s.processed), Some(2));
        assert_eq!(std::fs::read(&excluded).unwrap(), b"not an image");
    }

    #[test]
    fn test_abort_policy_stops_before_documents() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = Config {
            violation_policy: ViolationPolicy::Abort,
            ..config_in(dir.path())
        };
        std::fs::create_dir(&config.image_dir).unwrap();
        standard_template().save(&config.template_path).unwrap();
        write_photo(&config.image_dir, "L1_5_绝缘子脱落_危急.png");
        write_photo(&config.image_dir, "bad_name.png");

        let mut run = ReportRun::new(config.clone());
        let err = run.execute(|| "res".into()).unwrap_err();
        assert!(matches!(
            err,
            ReportError::Common(inspection_common::Error::NamingViolation { .. })
        ));
        assert!(!config.intermediate_path.exists());
    }
}
