//! 写真のメタデータ除去
//!
//! 画像を読み込んで同じパスに保存し直す（再エンコードで EXIF が落ちる）。
//! 固定数のワーカーで並列に処理し、最初の失敗でエラーを返す。
//! 失敗時点で実行中の処理は止めないため、一部の画像は書き換え済みのまま残る。

use super::{has_metadata, ImageInfo};
use crate::error::{ReportError, Result};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StripSummary {
    pub processed: usize,
    /// 処理前に EXIF を持っていた画像
    pub had_metadata: usize,
}

pub fn strip_metadata(images: &[ImageInfo], workers: usize) -> Result<StripSummary> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| ReportError::Config(format!("スレッドプールを作成できません: {}", e)))?;

    let pb = make_progress_bar(images.len() as u64);
    let processed = AtomicUsize::new(0);
    let had_metadata = AtomicUsize::new(0);

    let result: Result<()> = pool.install(|| {
        images.par_iter().try_for_each(|info| {
            if has_metadata(&info.path) {
                had_metadata.fetch_add(1, Ordering::Relaxed);
            }
            strip_one(&info.path)?;
            processed.fetch_add(1, Ordering::Relaxed);
            pb.inc(1);
            Ok(())
        })
    });

    match &result {
        Ok(()) => pb.finish_with_message("完了"),
        Err(_) => pb.abandon_with_message("中断"),
    }
    result?;

    let summary = StripSummary {
        processed: processed.into_inner(),
        had_metadata: had_metadata.into_inner(),
    };
    tracing::info!(
        processed = summary.processed,
        had_metadata = summary.had_metadata,
        "メタデータを除去しました"
    );
    Ok(summary)
}

/// 1枚を読み込んで保存し直す
fn strip_one(path: &Path) -> Result<()> {
    let strip_error = |reason: String| ReportError::MetadataStrip {
        path: path.display().to_string(),
        reason,
    };

    let img = image::open(path).map_err(|e| strip_error(e.to_string()))?;
    img.save(path).map_err(|e| strip_error(e.to_string()))?;
    tracing::debug!(path = %path.display(), "メタデータ除去");
    Ok(())
}

fn make_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{elapsed_precise}] {pos}/{len} 枚 {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_draw_target(ProgressDrawTarget::stderr_with_hz(12));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan_folder;
    use tempfile::tempdir;

    fn write_png(dir: &Path, name: &str) {
        image::RgbImage::from_pixel(8, 6, image::Rgb([200, 30, 30]))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn test_strip_rewrites_images() {
        let dir = tempdir().expect("Failed to create temp dir");
        write_png(dir.path(), "L1_5_杆塔倾斜_一般.png");
        write_png(dir.path(), "L2_1_销钉缺失_严重.png");

        let images = scan_folder(dir.path()).unwrap();
        let summary = strip_metadata(&images, 2).unwrap();
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.had_metadata, 0);

        let img = image::open(dir.path().join("L1_5_杆塔倾斜_一般.png")).unwrap();
        assert_eq!((img.width(), img.height()), (8, 6));
    }

    #[test]
    fn test_strip_fails_fast_on_broken_image() {
        let dir = tempdir().expect("Failed to create temp dir");
        for i in 0..4 {
            write_png(dir.path(), &format!("L1_{}_杆塔倾斜_一般.png", i));
        }
        std::fs::write(dir.path().join("L9_9_杆塔倾斜_一般.jpg"), b"not an image").unwrap();

        let images = scan_folder(dir.path()).unwrap();
        let err = strip_metadata(&images, 2).unwrap_err();
        assert!(matches!(err, ReportError::MetadataStrip { .. }));

        // 実行中だった処理は止めないので、正常な画像は壊れていない
        for i in 0..4 {
            assert!(image::open(dir.path().join(format!("L1_{}_杆塔倾斜_一般.png", i))).is_ok());
        }
    }

    #[test]
    fn test_strip_empty_set() {
        let summary = strip_metadata(&[], 1).unwrap();
        assert_eq!(summary, StripSummary::default());
    }
}
