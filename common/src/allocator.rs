//! 配分計算
//!
//! 重みを整数の点数に変換し、合計を必ず目標点（通常100）に合わせる。
//!
//! 1. 各行 `重み / プール合計 * 目標点` を四捨五入（0.5は0から遠い方へ）
//! 2. 差分 `目標点 - 合計` を最大点の行（同点なら先に出た行）に全部加える
//!
//! 差分が負で最大点の行が0未満になる場合だけ、その行を0で止めて
//! 残りを次に大きい行へ回す。

use crate::types::ScoredRow;
use crate::weight::ResolvedWeights;
use tracing::{debug, warn};

/// 重みを整数の点数に配分する
///
/// # Arguments
/// * `weights` - 各行の重み（負の値は0として扱う）
/// * `pool_total` - 分母。0以下なら全行を重み1として均等配分
/// * `target_total` - 配分する合計点
///
/// # Returns
/// 各行の点数。空でなければ合計は必ず `target_total`
pub fn allocate_scores(weights: &[f64], pool_total: f64, target_total: u32) -> Vec<u32> {
    if weights.is_empty() {
        return Vec::new();
    }

    let clamped: Vec<f64> = weights
        .iter()
        .map(|&w| if w.is_finite() && w > 0.0 { w } else { 0.0 })
        .collect();

    let (clamped, pool_total) = if pool_total.is_finite() && pool_total > 0.0 {
        (clamped, pool_total)
    } else {
        (vec![1.0; weights.len()], weights.len() as f64)
    };

    let target = i64::from(target_total);
    let mut scores: Vec<i64> = clamped
        .iter()
        .map(|w| (w * target as f64 / pool_total).round() as i64)
        .collect();

    let mut diff = target - scores.iter().sum::<i64>();
    if diff != 0 {
        debug!(diff, "四捨五入の差分を補正");

        // 点数の大きい順、同点は先に出た順
        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| scores[b].cmp(&scores[a]));

        for i in order {
            let adjusted = scores[i] + diff;
            if adjusted >= 0 {
                scores[i] = adjusted;
                break;
            }
            warn!(row = i, carried = adjusted, "差分を1行で吸収できないため次の行へ繰り越し");
            scores[i] = 0;
            diff = adjusted;
        }
    }

    scores.into_iter().map(|s| s.max(0) as u32).collect()
}

/// 重み付きの行に点数を割り当てる
pub fn allocate(resolved: &ResolvedWeights, target_total: u32) -> Vec<ScoredRow> {
    let weights: Vec<f64> = resolved.rows.iter().map(|r| r.computed_weight).collect();
    let scores = allocate_scores(&weights, resolved.pool_total, target_total);

    resolved
        .rows
        .iter()
        .zip(scores)
        .map(|(weighted, allocated_score)| ScoredRow {
            unit_name: weighted.row.unit_name.clone(),
            objective_text: weighted.row.objective_text.clone(),
            category: weighted.row.category.clone(),
            raw_weight: weighted.row.raw_weight,
            computed_weight: weighted.computed_weight,
            allocated_score,
        })
        .collect()
}
