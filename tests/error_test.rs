//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use defect_report::document::Document;
use defect_report::error::ReportError;
use defect_report::report::reconcile;
use defect_report::scanner;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"));
    assert!(matches!(result, Err(ReportError::FolderNotFound(_))));
}

/// 画像のないフォルダをスキャンした場合
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("test.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("template.json"), "{}").unwrap();

    let result = scanner::scan_folder(dir.path());
    assert!(result.unwrap().is_empty());
}

/// ReportErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        ReportError::Config("テスト設定エラー".to_string()),
        ReportError::FileNotFound("template.json".to_string()),
        ReportError::FolderNotFound("pic".to_string()),
        ReportError::ImageLoad("a.jpg".to_string()),
        ReportError::MetadataStrip {
            path: "a.jpg".to_string(),
            reason: "壊れた画像".to_string(),
        },
        ReportError::anchor("危急缺陷明细表"),
        ReportError::StructureMismatch("明細表が不足".to_string()),
        ReportError::UnsupportedFormat("x.docx".to_string()),
        ReportError::DocxExport("zip".to_string()),
        ReportError::NoImagesFound("pic".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// アンカー不足のメッセージにアンカー文字列が含まれる
#[test]
fn test_anchor_message() {
    let err = ReportError::anchor("本次现场巡检");
    assert!(format!("{}", err).contains("本次现场巡检"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: ReportError = io_err.into();

    assert!(matches!(err, ReportError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: ReportError = json_err.into();

    assert!(matches!(err, ReportError::JsonParse(_)));
}

/// inspection_common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_conversion() {
    let common_err = inspection_common::Error::NamingViolation {
        file_name: "bad.jpg".to_string(),
        reason: "区切り数".to_string(),
    };
    let err: ReportError = common_err.into();

    assert!(matches!(err, ReportError::Common(_)));
    assert!(format!("{}", err).contains("bad.jpg"));
}

/// テンプレートが存在しない場合
#[test]
fn test_reconcile_missing_template() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = reconcile::reconcile_file(
        &dir.path().join("template.json"),
        &dir.path().join("tpl.json"),
        [1, 0, 0],
    );
    assert!(matches!(result, Err(ReportError::FileNotFound(_))));
    assert!(!dir.path().join("tpl.json").exists());
}

/// アンカーのない文書は調整せずに失敗する
#[test]
fn test_reconcile_empty_document() {
    let dir = tempdir().expect("Failed to create temp dir");
    let template = dir.path().join("template.json");
    Document::default().save(&template).unwrap();

    let result = reconcile::reconcile_file(&template, &dir.path().join("tpl.json"), [1, 1, 1]);
    assert!(matches!(result, Err(ReportError::AnchorNotFound { .. })));
    assert!(!dir.path().join("tpl.json").exists());
}
