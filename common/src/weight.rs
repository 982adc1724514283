//! 重みの解決
//!
//! 各行が配分プールに占める重みを決める。
//!
//! - Direct: 行の値をそのまま使う
//! - HierarchicalEqualSplit: 単元の合計（節數など）を同じ単元の行数で等分する
//!
//! プール合計は単元ごとに1回だけ数える。全部0なら各行1.0に置き換える。

use crate::types::{NormalizedRow, UnitGroup, WeightMode};
use std::collections::HashMap;
use tracing::{debug, warn};

/// 重み付きの行
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedRow {
    pub row: NormalizedRow,
    pub computed_weight: f64,
}

/// 重み解決の結果
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedWeights {
    pub rows: Vec<WeightedRow>,
    /// 配分の分母
    pub pool_total: f64,
    /// 重みが全部0で均等配分に切り替えたか
    pub zero_pool: bool,
}

/// 負の値・NaNを0にする
fn clamp_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

/// 単元ごとに行をまとめる（初出順）
///
/// 単元の合計は最初の行の値を代表値とする。
pub fn unit_groups(rows: &[NormalizedRow]) -> Vec<UnitGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<UnitGroup> = Vec::new();

    for row in rows {
        match index.get(row.unit_name.as_str()) {
            Some(&i) => {
                let group = &mut groups[i];
                group.member_count += 1;
                if clamp_weight(row.raw_weight) != group.total_weight {
                    warn!(
                        unit = %row.unit_name,
                        representative = group.total_weight,
                        ignored = row.raw_weight,
                        "同じ単元で重みが異なる行があります（先頭行の値を使用）"
                    );
                }
            }
            None => {
                index.insert(row.unit_name.as_str(), groups.len());
                groups.push(UnitGroup {
                    unit_name: row.unit_name.clone(),
                    total_weight: clamp_weight(row.raw_weight),
                    member_count: 1,
                });
            }
        }
    }

    groups
}

/// 各行の重みを決める
pub fn resolve_weights(rows: &[NormalizedRow], mode: WeightMode) -> ResolvedWeights {
    let (weights, pool_total): (Vec<f64>, f64) = match mode {
        WeightMode::Direct => {
            let weights: Vec<f64> = rows.iter().map(|r| clamp_weight(r.raw_weight)).collect();
            let total = weights.iter().sum();
            (weights, total)
        }
        WeightMode::HierarchicalEqualSplit => {
            let groups = unit_groups(rows);
            let shares: HashMap<&str, f64> = groups
                .iter()
                .map(|g| (g.unit_name.as_str(), g.total_weight / g.member_count as f64))
                .collect();
            let weights = rows
                .iter()
                .map(|r| shares.get(r.unit_name.as_str()).copied().unwrap_or(0.0))
                .collect();
            let total = groups.iter().map(|g| g.total_weight).sum();
            (weights, total)
        }
    };

    let zero_pool = pool_total <= 0.0 && !rows.is_empty();
    let (weights, pool_total) = if zero_pool {
        warn!(rows = rows.len(), "重みがすべて0のため均等配分にします");
        (vec![1.0; rows.len()], rows.len() as f64)
    } else {
        (weights, pool_total)
    };

    debug!(%mode, pool_total, rows = rows.len(), "重みを解決");

    ResolvedWeights {
        rows: rows
            .iter()
            .zip(weights)
            .map(|(row, computed_weight)| WeightedRow {
                row: row.clone(),
                computed_weight,
            })
            .collect(),
        pool_total,
        zero_pool,
    }
}
