//! Excel生成（共通ライブラリ）
//!
//! layout.rs の列定義を使用して學習目標審核表を生成

use crate::layout::{CellValue, SheetLayout, HEADER_FILL, TOTAL_LABEL};
use crate::pipeline::ScoredTable;
use rust_xlsxwriter::*;

/// Excelをバッファに生成
///
/// # Arguments
/// * `table` - 配分済みの表
/// * `layout` - 列定義（通常は `SheetLayout::for_table`）
///
/// 見出し行、データ行、合計行の順に書き出す。
pub fn generate_excel_buffer(table: &ScoredTable, layout: &SheetLayout) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    // フォーマット定義
    let header_format = Format::new()
        .set_bold()
        .set_text_wrap()
        .set_align(FormatAlign::VerticalCenter)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_border(FormatBorder::Thin);

    let wrap_format = Format::new()
        .set_text_wrap()
        .set_align(FormatAlign::VerticalCenter);

    let total_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::VerticalCenter)
        .set_border_top(FormatBorder::Thin);

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(&layout.sheet_name)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    // 列幅・見出し
    for (col, spec) in layout.columns.iter().enumerate() {
        let col = col as u16;
        worksheet
            .set_column_width(col, spec.width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
        worksheet
            .write_string_with_format(0, col, &spec.label, &header_format)
            .map_err(|e| format!("見出し書き込みエラー: {}", e))?;
    }
    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;

    // データ行
    for (i, row) in table.rows.iter().enumerate() {
        let excel_row = i as u32 + 1;
        for (col, spec) in layout.columns.iter().enumerate() {
            let col = col as u16;
            match spec.value(row) {
                CellValue::Text(text) => worksheet
                    .write_string_with_format(excel_row, col, &text, &wrap_format)
                    .map_err(|e| format!("値書き込みエラー: {}", e))?,
                CellValue::Number(number) => worksheet
                    .write_number_with_format(excel_row, col, number, &wrap_format)
                    .map_err(|e| format!("値書き込みエラー: {}", e))?,
            };
        }
    }

    // 合計行
    if let Some(score_col) = layout.score_column() {
        let total_row = table.rows.len() as u32 + 1;
        worksheet
            .write_string_with_format(total_row, 0, TOTAL_LABEL, &total_format)
            .map_err(|e| format!("合計書き込みエラー: {}", e))?;
        worksheet
            .write_number_with_format(
                total_row,
                score_col as u16,
                f64::from(table.total_score()),
                &total_format,
            )
            .map_err(|e| format!("合計書き込みエラー: {}", e))?;
    }

    // バッファに書き出し
    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{run, PipelineConfig};

    #[test]
    fn test_generate_excel_buffer() {
        let text = "|單元名稱|學習目標|題型|配分|\n|A|一|單選題|60|\n|B|二|配合題|60|";
        let table = run(text, &PipelineConfig::default()).unwrap();
        let layout = SheetLayout::for_table(&table);

        let buffer = generate_excel_buffer(&table, &layout).unwrap();
        // xlsxはZIP形式
        assert!(buffer.starts_with(b"PK"));
    }

    #[test]
    fn test_generate_excel_buffer_empty_rows() {
        let table = ScoredTable {
            header: vec![],
            roles: Default::default(),
            rows: vec![],
            target_total: 100,
            mode: Default::default(),
            diagnostics: Default::default(),
        };
        let layout = SheetLayout::for_table(&table);

        assert!(generate_excel_buffer(&table, &layout).is_ok());
    }
}
