//! 列の正規化
//!
//! 見出し文字列はAIが書くため固定の語彙にならない。見出しは
//! キーワードの部分一致で列を探すだけに使い、各列の役割
//! （単元・目標・題型・重み）は `ColumnRoles` として明示的に渡す。

use crate::types::{NormalizedRow, Table};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 必ず適用する題型の区切り文字
pub const REQUIRED_DELIMITERS: [&str; 3] = ["、", ",", "或"];

/// 列の役割ごとの見出しキーワード
///
/// キーワードは先頭から順に試し、最初に一致した列を採用する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnKeywords {
    pub unit: Vec<String>,
    pub objective: Vec<String>,
    pub category: Vec<String>,
    pub weight: Vec<String>,
}

impl Default for ColumnKeywords {
    fn default() -> Self {
        Self {
            unit: vec!["單元".into()],
            objective: vec!["目標".into()],
            category: vec!["題型".into(), "類型".into()],
            weight: vec!["配分".into(), "節數".into(), "時數".into(), "權重".into()],
        }
    }
}

/// 列の役割と列番号
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRoles {
    pub unit: Option<usize>,
    pub objective: Option<usize>,
    pub category: Option<usize>,
    pub weight: Option<usize>,
}

fn find_column(header: &[String], keywords: &[String]) -> Option<usize> {
    keywords
        .iter()
        .filter(|k| !k.is_empty())
        .find_map(|k| header.iter().position(|h| h.contains(k.as_str())))
}

/// 見出しから各役割の列を探す
pub fn locate_columns(header: &[String], keywords: &ColumnKeywords) -> ColumnRoles {
    ColumnRoles {
        unit: find_column(header, &keywords.unit),
        objective: find_column(header, &keywords.objective),
        category: find_column(header, &keywords.category),
        weight: find_column(header, &keywords.weight),
    }
}

/// 題型を1つに絞る
///
/// 「單選題、配合題」のように複数並んでいる場合は最初の1つだけを残す。
/// `REQUIRED_DELIMITERS` は `delimiters` に無くても適用する。
pub fn clean_category<S: AsRef<str>>(value: &str, delimiters: &[S]) -> String {
    let mut tokens = vec![value.to_string()];
    let all = REQUIRED_DELIMITERS
        .iter()
        .copied()
        .chain(delimiters.iter().map(|d| d.as_ref()))
        .filter(|d| !d.is_empty());

    for delimiter in all {
        tokens = tokens
            .iter()
            .flat_map(|t| t.split(delimiter).map(str::to_string).collect::<Vec<_>>())
            .collect();
    }

    tokens
        .into_iter()
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
        .unwrap_or_default()
}

/// 全角数字・全角小数点を半角にする
fn fold_fullwidth_digits(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            '．' => '.',
            _ => c,
        })
        .collect()
}

/// 文字列から最初の数値を取り出す
///
/// 「10 分」「約5%」「３節」などに対応。数字が無い、または桁が多すぎて
/// 有限の値にならなければ `None`。
pub fn extract_number(value: &str) -> Option<f64> {
    lazy_static! {
        static ref NUMBER_RE: Regex = Regex::new(r"\d+(?:\.\d+)?").unwrap();
    }

    let folded = fold_fullwidth_digits(value);
    NUMBER_RE
        .find(&folded)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// 重みの値（数値が無ければ0.0）
pub fn parse_weight(value: &str) -> f64 {
    extract_number(value).unwrap_or(0.0)
}

/// 数値として読めなかった非空セルの数
pub fn count_unparseable(table: &Table, column: Option<usize>) -> usize {
    let Some(col) = column else {
        return 0;
    };

    table
        .rows()
        .iter()
        .filter_map(|row| row.get(col))
        .filter(|cell| !cell.trim().is_empty() && extract_number(cell).is_none())
        .count()
}

/// 数値を表示用の文字列にする（整数なら小数点を付けない）
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// 題型列と重み列を正規化した新しい表を返す
pub fn normalize<S: AsRef<str>>(table: &Table, roles: &ColumnRoles, delimiters: &[S]) -> Table {
    let mut result = table.clone();

    if let Some(col) = roles.category {
        result = result.map_column(col, |cell| clean_category(cell, delimiters));
    }

    if let Some(col) = roles.weight {
        result = result.map_column(col, |cell| format_number(parse_weight(cell)));
    }

    result
}

/// 正規化済みの表を行データに変換する
pub fn to_rows(table: &Table, roles: &ColumnRoles) -> Vec<NormalizedRow> {
    (0..table.len())
        .map(|i| NormalizedRow {
            unit_name: table.cell(i, roles.unit).to_string(),
            objective_text: table.cell(i, roles.objective).to_string(),
            category: table.cell(i, roles.category).to_string(),
            raw_weight: parse_weight(table.cell(i, roles.weight)),
        })
        .collect()
}
