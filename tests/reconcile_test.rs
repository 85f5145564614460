//! テンプレート構造調整の結合テスト
//!
//! 中間文書を保存・再読み込みしても調整が積み上がらないことを確認

use defect_report::document::template::standard_template;
use defect_report::document::Document;
use defect_report::report::{reconcile_file, DocumentLayout};
use inspection_common::Severity;
use tempfile::tempdir;

#[test]
fn test_reconcile_intermediate_twice_is_noop() {
    let dir = tempdir().expect("Failed to create temp dir");
    let template = dir.path().join("template.json");
    let intermediate = dir.path().join("tpl.json");
    standard_template().save(&template).unwrap();

    let first = reconcile_file(&template, &intermediate, [3, 2, 4]).unwrap();
    assert_eq!(first.detail_tables_added, [2, 1, 3]);
    assert_eq!(first.ledger_rows_added, [2, 1, 3]);

    let before = Document::open(&intermediate).unwrap();
    let second = reconcile_file(&intermediate, &intermediate, [3, 2, 4]).unwrap();
    assert!(second.is_noop());
    assert_eq!(Document::open(&intermediate).unwrap(), before);
}

#[test]
fn test_tiers_stay_in_order_after_insertions() {
    let dir = tempdir().expect("Failed to create temp dir");
    let template = dir.path().join("template.json");
    let intermediate = dir.path().join("tpl.json");
    standard_template().save(&template).unwrap();

    reconcile_file(&template, &intermediate, [5, 0, 2]).unwrap();
    let doc = Document::open(&intermediate).unwrap();
    let layout = DocumentLayout::locate(&doc).unwrap();

    let critical = layout.tier(Severity::Critical);
    let severe = layout.tier(Severity::Severe);
    let general = layout.tier(Severity::General);
    assert_eq!(critical.details.len(), 5);
    assert_eq!(severe.details.len(), 1);
    assert_eq!(general.details.len(), 2);

    // 危急の明細表はすべて严重の見出しより前にある
    assert!(critical.details.iter().all(|p| *p < severe.heading));
    assert!(severe.details.iter().all(|p| *p < general.heading));
    // 挿入された明細表の前は改ページ
    for pair in critical.details.windows(2) {
        assert_eq!(pair[1], pair[0] + 2);
        assert!(doc.paragraph_at(pair[0] + 1).unwrap().is_blank());
    }
}

#[test]
fn test_pre_sized_template_needs_nothing() {
    let dir = tempdir().expect("Failed to create temp dir");
    let template = dir.path().join("template.json");
    standard_template().save(&template).unwrap();

    let report = reconcile_file(&template, &dir.path().join("tpl.json"), [0, 1, 0]).unwrap();
    assert!(report.is_noop());
}
