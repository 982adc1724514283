//! Excel出力の統合テスト
//!
//! ## 変更履歴
//! - 2026-10-18: 初期作成
//! - 2026-10-18: 手編集したJSONの読み込みを追加

use objective_table::export::{self, excel};
use objective_table_common::{pipeline, PipelineConfig, WeightMode};
use tempfile::tempdir;

const RESPONSE: &str = "\
| 單元名稱 | 學習目標 | 題型 | 節數 | 配分 |
|---|---|---|---|---|
| 第一單元 | 能說出分數的意義 | 單選題 | 3 | 20 |
| 第一單元 | 能比較分數大小 | 配合題、是非題 | 3 | 30 |
| 第二單元 | 能做分數加法 | 計算題 | 2 | 40 |
";

#[test]
fn test_excel_generation() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("審核表.xlsx");

    let table = pipeline::run(RESPONSE, &PipelineConfig::default()).unwrap();
    let result = excel::generate_excel(&table, &output_path);

    assert!(result.is_ok(), "Excel生成に失敗: {:?}", result.err());
    let metadata = std::fs::metadata(&output_path).expect("ファイルメタデータ取得失敗");
    assert!(metadata.len() > 0, "Excelファイルが空");
}

#[test]
fn test_excel_generation_hierarchical() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("nested").join("hierarchical.xlsx");

    let config = PipelineConfig {
        mode: WeightMode::HierarchicalEqualSplit,
        ..Default::default()
    };
    let table = pipeline::run(RESPONSE, &config).unwrap();
    let result = excel::generate_excel(&table, &output_path);

    assert!(result.is_ok(), "Excel生成に失敗: {:?}", result.err());
    assert!(output_path.exists(), "Excelファイルが作成されていない");
}

#[test]
fn test_json_snapshot_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("table.json");

    let table = pipeline::run(RESPONSE, &PipelineConfig::default()).unwrap();
    export::write_table(&table, &path).expect("JSON保存失敗");

    let loaded = export::read_table(&path).expect("JSON読み込み失敗");
    assert_eq!(loaded.rows.len(), 3);
    assert_eq!(loaded.total_score(), 100);
    assert_eq!(loaded.rows[1].category, "配合題");
}

#[test]
fn test_hand_edited_snapshot_is_rescored_on_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("table.json");

    let mut table = pipeline::run(RESPONSE, &PipelineConfig::default()).unwrap();
    table.rows[0].allocated_score = 99;
    table.rows[0].category = "單選題、是非題".into();
    export::write_table(&table, &path).expect("JSON保存失敗");

    let loaded = export::read_table(&path).expect("JSON読み込み失敗");
    assert_eq!(loaded.total_score(), 100);
    assert_eq!(loaded.rows[0].category, "單選題");

    let output_path = dir.path().join("fixed.xlsx");
    assert!(excel::generate_excel(&loaded, &output_path).is_ok());
}
