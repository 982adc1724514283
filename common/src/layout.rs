//! 審核表シートのレイアウト定義
//!
//! 列の並び・既定ラベル・列幅をまとめる。
//! ラベルは元の見出しがあればそちらを優先する。

use crate::pipeline::ScoredTable;
use crate::types::{ScoredRow, WeightMode};

/// シート名
pub const SHEET_NAME: &str = "學習目標審核表";

/// 見出し行の背景色
pub const HEADER_FILL: u32 = 0xD7E4BC;

/// 合計行のラベル
pub const TOTAL_LABEL: &str = "合計";

/// 列の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Unit,
    Objective,
    Category,
    RawWeight,
    ComputedWeight,
    Score,
}

/// 1列分の定義
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub kind: ColumnKind,
    pub label: String,
    /// Excelの列幅（文字数）
    pub width: f64,
}

impl ColumnSpec {
    /// 行からこの列の値を取り出す
    pub fn value(&self, row: &ScoredRow) -> CellValue {
        match self.kind {
            ColumnKind::Unit => CellValue::Text(row.unit_name.clone()),
            ColumnKind::Objective => CellValue::Text(row.objective_text.clone()),
            ColumnKind::Category => CellValue::Text(row.category.clone()),
            ColumnKind::RawWeight => CellValue::Number(row.raw_weight),
            ColumnKind::ComputedWeight => CellValue::Number(row.computed_weight),
            ColumnKind::Score => CellValue::Number(f64::from(row.allocated_score)),
        }
    }
}

/// セルの値
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

/// シート全体のレイアウト
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub sheet_name: String,
    pub columns: Vec<ColumnSpec>,
}

impl SheetLayout {
    /// 表の見出しとモードから列を決める
    ///
    /// 単元分割モードでは単元の合計と各行の重みも出力する。
    pub fn for_table(table: &ScoredTable) -> Self {
        let roles = &table.roles;
        let mut columns = vec![
            ColumnSpec {
                kind: ColumnKind::Unit,
                label: table.column_label(roles.unit, "單元名稱"),
                width: 15.0,
            },
            ColumnSpec {
                kind: ColumnKind::Objective,
                label: table.column_label(roles.objective, "學習目標"),
                width: 55.0,
            },
            ColumnSpec {
                kind: ColumnKind::Category,
                label: table.column_label(roles.category, "題型"),
                width: 20.0,
            },
        ];

        if table.mode == WeightMode::HierarchicalEqualSplit {
            columns.push(ColumnSpec {
                kind: ColumnKind::RawWeight,
                label: table.column_label(roles.weight, "節數"),
                width: 10.0,
            });
            columns.push(ColumnSpec {
                kind: ColumnKind::ComputedWeight,
                label: "分配權重".to_string(),
                width: 10.0,
            });
        }

        columns.push(ColumnSpec {
            kind: ColumnKind::Score,
            label: "配分".to_string(),
            width: 10.0,
        });

        Self {
            sheet_name: SHEET_NAME.to_string(),
            columns,
        }
    }

    pub fn score_column(&self) -> Option<usize> {
        self.columns.iter().position(|c| c.kind == ColumnKind::Score)
    }
}
