//! Excel生成（CLI版）
//!
//! 共通ライブラリでバッファを作り、ファイルに書き出す

use crate::error::{AppError, Result};
use objective_table_common::export::excel_core::generate_excel_buffer;
use objective_table_common::{ScoredTable, SheetLayout};
use std::path::Path;

pub fn generate_excel(table: &ScoredTable, output_path: &Path) -> Result<()> {
    let layout = SheetLayout::for_table(table);
    generate_excel_with_layout(table, &layout, output_path)
}

pub fn generate_excel_with_layout(
    table: &ScoredTable,
    layout: &SheetLayout,
    output_path: &Path,
) -> Result<()> {
    let buffer = generate_excel_buffer(table, layout).map_err(AppError::ExcelGeneration)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, buffer)
        .map_err(|e| AppError::ExcelGeneration(format!("ファイル書き込みエラー: {}", e)))?;

    Ok(())
}
