//! 処理パイプライン
//!
//! テキスト → 表 → 正規化 → 重み → 配分 を一方向に実行する。
//! 各段は新しい値を返し、入力を書き換えない。
//! 表の編集後は `rescore` / `apply_edit` で重みと配分だけを再計算する。

use crate::allocator::allocate;
use crate::error::{EditError, PipelineError};
use crate::normalizer::{self, ColumnKeywords, ColumnRoles};
use crate::parser::parse_with_repair;
use crate::types::{NormalizedRow, ScoredRow, WeightMode};
use crate::weight::resolve_weights;
use serde::{Deserialize, Serialize};
use tracing::info;

/// パイプライン設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    /// 配分する合計点
    pub target_total: u32,
    pub mode: WeightMode,
    /// 見出し行がすべて含むべきキーワード
    pub header_keywords: Vec<String>,
    /// 題型の区切り文字（「、」「,」「或」は常に適用）
    pub category_delimiters: Vec<String>,
    pub columns: ColumnKeywords,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_total: 100,
            mode: WeightMode::Direct,
            header_keywords: vec!["單元".into(), "目標".into(), "配分".into()],
            category_delimiters: vec!["、".into(), ",".into(), "，".into(), "或".into()],
            columns: ColumnKeywords::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.header_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(PipelineError::InvalidConfig(
                "headerKeywords が空です".into(),
            ));
        }
        Ok(())
    }
}

/// 各段で吸収した異常の記録
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Diagnostics {
    /// セル不足で補完した行
    pub padded_rows: usize,
    /// セル超過で切り詰めた行
    pub truncated_rows: usize,
    /// 数値として読めず0にした重みセル
    pub unparseable_numbers: usize,
    /// 重みが全部0で均等配分にしたか
    pub zero_weight_pool: bool,
    /// 再配分前のプール合計（AIが付けた配分の合計など）
    pub source_total: f64,
}

impl Diagnostics {
    /// 元の合計が目標点と違い、比例配分し直したか
    pub fn was_rescaled(&self, target_total: u32) -> bool {
        !self.zero_weight_pool && (self.source_total - f64::from(target_total)).abs() > f64::EPSILON
    }
}

/// パイプラインの出力（不変のスナップショット）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredTable {
    /// 元の見出し
    pub header: Vec<String>,
    pub roles: ColumnRoles,
    pub rows: Vec<ScoredRow>,
    pub target_total: u32,
    pub mode: WeightMode,
    #[serde(default)]
    pub diagnostics: Diagnostics,
}

impl ScoredTable {
    pub fn total_score(&self) -> u32 {
        self.rows.iter().map(|r| r.allocated_score).sum()
    }

    /// 見出し名（列が無ければ既定名）
    pub fn column_label(&self, column: Option<usize>, fallback: &str) -> String {
        column
            .and_then(|c| self.header.get(c))
            .filter(|h| !h.is_empty())
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// 行の編集内容
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowEdit {
    pub index: usize,
    pub raw_weight: Option<f64>,
    pub category: Option<String>,
}

/// AIの回答から配分済みの表を作る
///
/// # Arguments
/// * `raw_text` - AIの回答全文
/// * `config` - パイプライン設定
///
/// # Returns
/// * `Ok(ScoredTable)` - 点数の合計は `config.target_total`
/// * `Err(PipelineError)` - 設定不正、見出しが無い、データ行が無い
pub fn run(raw_text: &str, config: &PipelineConfig) -> Result<ScoredTable, PipelineError> {
    config.validate()?;

    let (table, repair) = parse_with_repair(raw_text, &config.header_keywords)?;
    let roles = normalizer::locate_columns(table.header(), &config.columns);
    let unparseable = normalizer::count_unparseable(&table, roles.weight);

    let normalized = normalizer::normalize(&table, &roles, &config.category_delimiters);
    let rows = normalizer::to_rows(&normalized, &roles);

    let resolved = resolve_weights(&rows, config.mode);
    let diagnostics = Diagnostics {
        padded_rows: repair.padded,
        truncated_rows: repair.truncated,
        unparseable_numbers: unparseable,
        zero_weight_pool: resolved.zero_pool,
        source_total: if resolved.zero_pool { 0.0 } else { resolved.pool_total },
    };
    let rows = allocate(&resolved, config.target_total);

    info!(
        rows = rows.len(),
        mode = %config.mode,
        source_total = diagnostics.source_total,
        "配分を計算"
    );

    Ok(ScoredTable {
        header: table.header().to_vec(),
        roles,
        rows,
        target_total: config.target_total,
        mode: config.mode,
        diagnostics,
    })
}

/// 行データから重みと配分を計算し直す
pub fn rescore(rows: &[NormalizedRow], config: &PipelineConfig) -> Vec<ScoredRow> {
    let resolved = resolve_weights(rows, config.mode);
    allocate(&resolved, config.target_total)
}

/// 1行を編集し、配分を計算し直した新しい表を返す
///
/// 題型は正規化してから反映する。単元分割モードでは重みは単元の合計なので、
/// 同じ単元の全行に反映する。
pub fn apply_edit(
    table: &ScoredTable,
    edit: &RowEdit,
    config: &PipelineConfig,
) -> Result<ScoredTable, EditError> {
    let target = table.rows.get(edit.index).ok_or(EditError::RowOutOfRange {
        index: edit.index,
        len: table.rows.len(),
    })?;
    let unit = target.unit_name.clone();

    let mut rows: Vec<NormalizedRow> = table.rows.iter().map(NormalizedRow::from).collect();

    if let Some(category) = &edit.category {
        rows[edit.index].category =
            normalizer::clean_category(category, &config.category_delimiters);
    }

    if let Some(weight) = edit.raw_weight {
        let weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
        match config.mode {
            WeightMode::Direct => rows[edit.index].raw_weight = weight,
            WeightMode::HierarchicalEqualSplit => rows
                .iter_mut()
                .filter(|r| r.unit_name == unit)
                .for_each(|r| r.raw_weight = weight),
        }
    }

    Ok(rebuild(table, &rows, config))
}

/// 読み込んだスナップショットを検証し直す
///
/// 手で編集されたJSONでも、題型は1語に、合計は目標点に戻る。
/// 目標点とモードはスナップショットのものを使う。
pub fn refresh(table: &ScoredTable, category_delimiters: &[String]) -> ScoredTable {
    let rows: Vec<NormalizedRow> = table
        .rows
        .iter()
        .map(|r| NormalizedRow {
            category: normalizer::clean_category(&r.category, category_delimiters),
            ..NormalizedRow::from(r)
        })
        .collect();

    let config = PipelineConfig {
        target_total: table.target_total,
        mode: table.mode,
        ..PipelineConfig::default()
    };
    rebuild(table, &rows, &config)
}

fn rebuild(table: &ScoredTable, rows: &[NormalizedRow], config: &PipelineConfig) -> ScoredTable {
    let resolved = resolve_weights(rows, config.mode);
    let diagnostics = Diagnostics {
        zero_weight_pool: resolved.zero_pool,
        source_total: if resolved.zero_pool { 0.0 } else { resolved.pool_total },
        ..table.diagnostics.clone()
    };

    ScoredTable {
        header: table.header.clone(),
        roles: table.roles,
        rows: allocate(&resolved, config.target_total),
        target_total: config.target_total,
        mode: config.mode,
        diagnostics,
    }
}
