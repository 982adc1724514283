//! 配分済み表の行編集
//!
//! 重みまたは題型を変えるたびに重みと配分を計算し直し、
//! 合計点は常に目標点のまま保つ。

use crate::error::{AppError, Result};
use crate::export::{read_table, write_table};
use dialoguer::Input;
use objective_table_common::{apply_edit, PipelineConfig, RowEdit, ScoredTable};
use std::path::Path;

/// 対話コマンド
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// 行を編集
    Edit(RowEdit),
    /// 表を表示
    Print,
    /// 保存して終了
    Quit,
    /// 入力の誤り
    Invalid(String),
}

/// 対話入力を解釈する
///
/// `3 w 12` は3行目の重みを12に、`3 c 單選題` は3行目の題型を変更する。
/// 行番号は1始まり。
pub fn parse_command(input: &str) -> EditCommand {
    let trimmed = input.trim();
    match trimmed {
        "q" | "Q" => return EditCommand::Quit,
        "" | "p" => return EditCommand::Print,
        _ => {}
    }

    let mut parts = trimmed.splitn(3, char::is_whitespace);
    let (Some(row), Some(field), Some(value)) = (parts.next(), parts.next(), parts.next()) else {
        return EditCommand::Invalid(format!("「行 項目 値」の形式で入力してください: {}", trimmed));
    };

    let index = match row.parse::<usize>() {
        Ok(n) if n >= 1 => n - 1,
        _ => return EditCommand::Invalid(format!("行番号が不正です: {}", row)),
    };
    let value = value.trim();

    match field {
        "w" | "W" => match value.parse::<f64>() {
            Ok(weight) => EditCommand::Edit(RowEdit {
                index,
                raw_weight: Some(weight),
                category: None,
            }),
            Err(_) => EditCommand::Invalid(format!("重みが数値ではありません: {}", value)),
        },
        "c" | "C" => EditCommand::Edit(RowEdit {
            index,
            raw_weight: None,
            category: Some(value.to_string()),
        }),
        _ => EditCommand::Invalid(format!("項目は w（重み）か c（題型）です: {}", field)),
    }
}

/// 表を保存時と同じ目標点・モードで再計算する設定
pub fn config_for_table(table: &ScoredTable, base: &PipelineConfig) -> PipelineConfig {
    PipelineConfig {
        target_total: table.target_total,
        mode: table.mode,
        ..base.clone()
    }
}

/// 表を一覧表示
pub fn print_table(table: &ScoredTable) {
    for (i, row) in table.rows.iter().enumerate() {
        println!(
            "{:>3}. {} | {} | {} | 重み {} → {:.2} | {}点",
            i + 1,
            row.unit_name,
            row.objective_text,
            if row.category.is_empty() { "-" } else { row.category.as_str() },
            row.raw_weight,
            row.computed_weight,
            row.allocated_score
        );
    }
    println!("     合計: {}点", table.total_score());
}

/// 1行だけ編集して保存
pub fn run_single_edit(
    input_path: &Path,
    output_path: Option<&Path>,
    edit: &RowEdit,
    base: &PipelineConfig,
) -> Result<ScoredTable> {
    let table = read_table(input_path)?;
    let config = config_for_table(&table, base);
    let edited = apply_edit(&table, edit, &config)?;

    let output = output_path.unwrap_or(input_path);
    write_table(&edited, output)?;

    Ok(edited)
}

/// 対話式で行を編集
pub fn run_interactive_edit(
    input_path: &Path,
    output_path: Option<&Path>,
    base: &PipelineConfig,
) -> Result<()> {
    let mut table = read_table(input_path)?;
    let config = config_for_table(&table, base);

    println!("✏️  {}行 / 合計{}点", table.rows.len(), table.target_total);
    println!("---");
    println!("操作: [行 w 値]重み変更 [行 c 題型]題型変更 [p]表示 [q]保存して終了");
    println!("---\n");
    print_table(&table);

    loop {
        let input: String = Input::new()
            .with_prompt("編集")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| AppError::CliExecution(e.to_string()))?;

        match parse_command(&input) {
            EditCommand::Edit(edit) => match apply_edit(&table, &edit, &config) {
                Ok(edited) => {
                    table = edited;
                    let row = &table.rows[edit.index];
                    println!("  → {}行目: {}点（合計{}点）\n", edit.index + 1, row.allocated_score, table.total_score());
                }
                Err(e) => println!("  → {}\n", e),
            },
            EditCommand::Print => print_table(&table),
            EditCommand::Invalid(message) => println!("  → {}\n", message),
            EditCommand::Quit => {
                println!("保存して終了します...");
                break;
            }
        }
    }

    let output = output_path.unwrap_or(input_path);
    write_table(&table, output)?;
    println!("\n✓ 保存しました: {}", output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weight_edit() {
        assert_eq!(
            parse_command("3 w 12.5"),
            EditCommand::Edit(RowEdit {
                index: 2,
                raw_weight: Some(12.5),
                category: None,
            })
        );
    }

    #[test]
    fn test_parse_category_edit() {
        assert_eq!(
            parse_command("1 c 單選題、配合題"),
            EditCommand::Edit(RowEdit {
                index: 0,
                raw_weight: None,
                category: Some("單選題、配合題".into()),
            })
        );
    }

    #[test]
    fn test_parse_control_commands() {
        assert_eq!(parse_command("q"), EditCommand::Quit);
        assert_eq!(parse_command(""), EditCommand::Print);
        assert_eq!(parse_command(" p "), EditCommand::Print);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(parse_command("0 w 1"), EditCommand::Invalid(_)));
        assert!(matches!(parse_command("x w 1"), EditCommand::Invalid(_)));
        assert!(matches!(parse_command("1 w abc"), EditCommand::Invalid(_)));
        assert!(matches!(parse_command("1 z 3"), EditCommand::Invalid(_)));
        assert!(matches!(parse_command("1 w"), EditCommand::Invalid(_)));
    }
}
