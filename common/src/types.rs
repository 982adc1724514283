//! 表データの型定義
//!
//! 各段の入出力:
//! - Table: パーサーの出力（文字列セルのみ、列数は見出しと一致）
//! - NormalizedRow: 正規化後の1行
//! - ScoredRow: 重みと配分を付けた最終行

use serde::{Deserialize, Serialize};

/// 生のセル行
pub type RawRow = Vec<String>;

/// 列数補正の件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowRepair {
    /// 空文字で右詰めした行数
    pub padded: usize,
    /// 先頭N列に切り詰めた行数
    pub truncated: usize,
}

impl RowRepair {
    pub fn is_clean(&self) -> bool {
        self.padded == 0 && self.truncated == 0
    }
}

/// 見出し＋データ行
///
/// すべての行は見出しと同じ列数を持つ。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<RawRow>,
}

impl Table {
    /// 行を見出しの列数に合わせて構築する
    ///
    /// 足りない行は空文字で右詰め、多い行は先頭N列に切り詰める。
    pub fn from_rows(header: Vec<String>, rows: Vec<RawRow>) -> (Self, RowRepair) {
        let width = header.len();
        let mut repair = RowRepair::default();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.len() < width {
                    row.resize(width, String::new());
                    repair.padded += 1;
                } else if row.len() > width {
                    row.truncate(width);
                    repair.truncated += 1;
                }
                row
            })
            .collect();

        (Self { header, rows }, repair)
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    /// 列数
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// データ行数
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// セル値（列が無ければ空文字）
    pub fn cell(&self, row: usize, col: Option<usize>) -> &str {
        col.and_then(|c| self.rows.get(row).and_then(|r| r.get(c)))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    /// 指定列だけを書き換えた新しい表を返す
    pub fn map_column<F>(&self, col: usize, mut f: F) -> Table
    where
        F: FnMut(&str) -> String,
    {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(i, cell)| if i == col { f(cell) } else { cell.clone() })
                    .collect()
            })
            .collect();

        Table {
            header: self.header.clone(),
            rows,
        }
    }
}

/// 正規化済みの1行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalizedRow {
    pub unit_name: String,      // 單元名稱
    pub objective_text: String, // 學習目標
    pub category: String,       // 題型（区切り文字を含まない単一値）
    pub raw_weight: f64,        // 配分・節數など（0以上）
}

/// 単元ごとの集計（行から都度導出する）
#[derive(Debug, Clone, PartialEq)]
pub struct UnitGroup {
    pub unit_name: String,
    pub total_weight: f64,
    pub member_count: usize,
}

/// 配分済みの1行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRow {
    pub unit_name: String,
    pub objective_text: String,
    pub category: String,
    pub raw_weight: f64,
    /// 配分計算に使った重み（確認用）
    pub computed_weight: f64,
    pub allocated_score: u32,
}

impl From<&ScoredRow> for NormalizedRow {
    fn from(row: &ScoredRow) -> Self {
        Self {
            unit_name: row.unit_name.clone(),
            objective_text: row.objective_text.clone(),
            category: row.category.clone(),
            raw_weight: row.raw_weight,
        }
    }
}

/// 重みの決め方
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeightMode {
    /// 行ごとの値をそのまま使う
    #[default]
    Direct,
    /// 単元の合計を同じ単元の行数で等分する
    #[serde(alias = "hierarchical")]
    HierarchicalEqualSplit,
}

impl std::str::FromStr for WeightMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" | "d" => Ok(WeightMode::Direct),
            "hierarchical" | "split" | "h" => Ok(WeightMode::HierarchicalEqualSplit),
            _ => Err(format!("Unknown mode: {}. Use direct or hierarchical", s)),
        }
    }
}

impl std::fmt::Display for WeightMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightMode::Direct => write!(f, "direct"),
            WeightMode::HierarchicalEqualSplit => write!(f, "hierarchical"),
        }
    }
}
