//! AI回答パーサー
//!
//! 生成AIが返すMarkdown風の表を文字列セルの表に変換する。
//!
//! 処理順:
//! 1. 区切り文字の正規化（全角パイプ・太字記号・`||` の行結合）
//! 2. 見出しキーワードをすべて含む行を探す
//! 3. 見出し以降のセルを1本の列に並べ、区切り行（`---` がN個以上続く部分）を除く
//! 4. 見出しの列数Nごとに切って行にする
//!
//! 行単位ではなくN個ずつ切るのは、AIの出力で行の改行が失われ、
//! 複数行が1行にくっつくことがあるため。見出し行に1行目のデータが
//! くっついている場合も、最後のキーワードセルで見出しを切る。
//! データ中の単独の `-`（「なし」の意味）はセルとして残す。

use crate::error::ParseError;
use crate::types::{RawRow, RowRepair, Table};
use tracing::{debug, warn};

/// 区切り文字の揺れを正規化する
///
/// - `｜` → `|`
/// - `**` を除去
/// - `||` は改行の欠落とみなして `|\n|` に展開
pub fn preprocess(raw: &str) -> String {
    raw.replace('｜', "|")
        .replace("**", "")
        .replace("||", "|\n|")
}

/// 行の最初と最後の `|` に挟まれた部分をセルに分割する
///
/// 表の外側の文章は無視する。セルが取れない行は `None`。
fn split_cells(line: &str) -> Option<Vec<String>> {
    let start = line.find('|')?;
    let end = line.rfind('|')?;
    if end <= start {
        return None;
    }

    let inner = &line[start + 1..end];
    if inner.trim().is_empty() {
        return None;
    }

    Some(inner.split('|').map(|c| c.trim().to_string()).collect())
}

/// `---` や `:--:` のような区切り行のセルか
pub fn is_separator_cell(cell: &str) -> bool {
    !cell.is_empty()
        && cell.contains('-')
        && cell.chars().all(|c| c == '-' || c == ':' || c == ' ')
}

/// 表を抽出する
///
/// # Arguments
/// * `raw_text` - AIの回答全文
/// * `header_keywords` - 見出し行がすべて含むべきキーワード
///
/// # Returns
/// * `Ok(Table)` - 抽出成功
/// * `Err(ParseError)` - 見出しが無い、またはデータ行が無い
///
/// # Examples
/// ```
/// use objective_table_common::parse;
///
/// let text = "|單元名稱|學習目標|配分||A|一|10||A|二|20|";
/// let table = parse(text, &["單元", "目標", "配分"]).unwrap();
/// assert_eq!(table.len(), 2);
/// ```
pub fn parse<S: AsRef<str>>(raw_text: &str, header_keywords: &[S]) -> Result<Table, ParseError> {
    parse_with_repair(raw_text, header_keywords).map(|(table, _)| table)
}

/// 見出し行のセルを見出しと後続のデータセルに分ける
///
/// 最後のキーワードセルより後ろにセルがあり、次の行の列数が
/// 見出し行全体と一致しなければ、後ろのセルは1行目のデータとみなす。
fn split_header<S: AsRef<str>>(
    cells: Vec<String>,
    header_keywords: &[S],
    next_width: Option<usize>,
) -> (Vec<String>, Vec<String>) {
    let last = cells.iter().rposition(|cell| {
        header_keywords
            .iter()
            .map(|k| k.as_ref())
            .any(|k| !k.is_empty() && cell.contains(k))
    });

    match last {
        Some(last) if last + 1 < cells.len() && next_width != Some(cells.len()) => {
            let mut header = cells;
            let overflow = header.split_off(last + 1);
            (header, overflow)
        }
        _ => (cells, Vec::new()),
    }
}

/// 1行分のセルから区切り行を取り除く
///
/// 全セルが区切りの行は捨てる。それ以外は区切りセルがN個以上
/// 続く部分（くっついた区切り行）だけを捨て、短い連続はデータとして残す。
fn strip_separators(cells: Vec<String>, width: usize) -> Vec<String> {
    if cells.iter().all(|c| is_separator_cell(c)) {
        return Vec::new();
    }

    let mut kept = Vec::with_capacity(cells.len());
    let mut run: Vec<String> = Vec::new();
    for cell in cells {
        if is_separator_cell(&cell) {
            run.push(cell);
            continue;
        }
        if run.len() < width {
            kept.append(&mut run);
        } else {
            run.clear();
        }
        kept.push(cell);
    }
    if run.len() < width {
        kept.append(&mut run);
    }

    kept
}

/// 表を抽出し、列数補正の件数も返す
pub fn parse_with_repair<S: AsRef<str>>(
    raw_text: &str,
    header_keywords: &[S],
) -> Result<(Table, RowRepair), ParseError> {
    let text = preprocess(raw_text);
    let lines: Vec<&str> = text.lines().collect();

    // 見出し行を探す
    let (position, header_cells) = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| {
            let matches = header_keywords.iter().all(|k| line.contains(k.as_ref()));
            if matches {
                split_cells(line).map(|cells| (i, cells))
            } else {
                None
            }
        })
        .ok_or_else(|| {
            let joined: Vec<&str> = header_keywords.iter().map(|k| k.as_ref()).collect();
            ParseError::NoHeaderFound(joined.join(", "))
        })?;

    let rest = &lines[position + 1..];
    let next_width = rest.iter().find_map(|line| split_cells(line)).map(|c| c.len());
    let (header, overflow) = split_header(header_cells, header_keywords, next_width);

    let width = header.len();
    if !overflow.is_empty() {
        warn!(width, overflow = overflow.len(), "見出し行に続くセルをデータとして扱う");
    }
    debug!(width, header = ?header, "見出し行を検出");

    // 見出し以降のセルを1本に並べる
    let cells: Vec<String> = std::iter::once(overflow)
        .chain(rest.iter().filter_map(|line| split_cells(line)))
        .flat_map(|line| strip_separators(line, width))
        .collect();

    if cells.len() < width {
        return Err(ParseError::EmptyTable);
    }

    let rows: Vec<RawRow> = cells
        .chunks(width)
        .filter(|chunk| chunk.iter().any(|c| !c.is_empty()))
        .map(|chunk| chunk.to_vec())
        .collect();

    if rows.is_empty() {
        return Err(ParseError::EmptyTable);
    }

    let (table, repair) = Table::from_rows(header, rows);
    if !repair.is_clean() {
        warn!(
            padded = repair.padded,
            truncated = repair.truncated,
            width = table.width(),
            "列数が見出しと合わない行を補正"
        );
    }
    debug!(rows = table.len(), "表を抽出");

    Ok((table, repair))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYWORDS: [&str; 3] = ["單元", "目標", "配分"];

    fn cells(row: &[String]) -> Vec<&str> {
        row.iter().map(|s| s.as_str()).collect()
    }

    // =============================================
    // preprocess テスト
    // =============================================

    #[test]
    fn test_preprocess_fullwidth_and_bold() {
        let text = "｜**單元名稱**｜學習目標｜";
        assert_eq!(preprocess(text), "|單元名稱|學習目標|");
    }

    #[test]
    fn test_preprocess_double_pipe() {
        assert_eq!(preprocess("|a||b|"), "|a|\n|b|");
    }

    #[test]
    fn test_is_separator_cell() {
        assert!(is_separator_cell("---"));
        assert!(is_separator_cell(":---:"));
        assert!(is_separator_cell(" -- "));
        assert!(!is_separator_cell(""));
        assert!(!is_separator_cell("A-1"));
        assert!(!is_separator_cell(":"));
    }

    // =============================================
    // parse テスト
    // =============================================

    #[test]
    fn test_parse_standard_markdown() {
        let text = r#"以下是審核表：

| 單元名稱 | 學習目標 | 題型 | 配分 |
|---|---|---|---|
| 第一單元 | 能說出分數的意義 | 單選題 | 10分 |
| 第二單元 | 能比較分數大小 | 配合題 | 20 |

以上供參考。"#;

        let table = parse(text, &KEYWORDS).unwrap();
        assert_eq!(cells(table.header()), vec!["單元名稱", "學習目標", "題型", "配分"]);
        assert_eq!(table.len(), 2);
        assert_eq!(cells(&table.rows()[0]), vec!["第一單元", "能說出分數的意義", "單選題", "10分"]);
        assert_eq!(cells(&table.rows()[1])[3], "20");
    }

    #[test]
    fn test_parse_glued_rows() {
        let text = "|單元名稱|學習目標|配分||A|一|10||A|二|20|";

        let table = parse(text, &KEYWORDS).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(cells(&table.rows()[0]), vec!["A", "一", "10"]);
        assert_eq!(cells(&table.rows()[1]), vec!["A", "二", "20"]);
    }

    #[test]
    fn test_parse_rows_glued_without_double_pipe() {
        // 改行が失われ1行に2行分のセルが並んでいる
        let text = "|單元名稱|學習目標|配分|\n|---|---|---|\n|A|一|10|A|二|20|\n|B|三|30|";

        let table = parse(text, &KEYWORDS).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(cells(&table.rows()[1]), vec!["A", "二", "20"]);
        assert_eq!(cells(&table.rows()[2]), vec!["B", "三", "30"]);
    }

    #[test]
    fn test_parse_pads_trailing_partial_row() {
        let text = "|單元名稱|學習目標|配分|\n|A|一|10|\n|B|二|";

        let (table, repair) = parse_with_repair(text, &KEYWORDS).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(cells(&table.rows()[1]), vec!["B", "二", ""]);
        assert_eq!(repair.padded, 1);
    }

    #[test]
    fn test_parse_fullwidth_pipes_and_bold() {
        let text = "｜**單元名稱**｜**學習目標**｜**配分**｜\n｜A｜一｜10｜";

        let table = parse(text, &KEYWORDS).unwrap();
        assert_eq!(cells(table.header()), vec!["單元名稱", "學習目標", "配分"]);
        assert_eq!(cells(&table.rows()[0]), vec!["A", "一", "10"]);
    }

    #[test]
    fn test_parse_ignores_lines_without_pipes() {
        let text = "|單元名稱|學習目標|配分|\n|A|一|10|\n說明文字\n|B|二|20|";

        let table = parse(text, &KEYWORDS).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_parse_no_header() {
        let text = "|名稱|內容|\n|A|B|";

        let result = parse(text, &KEYWORDS);
        assert!(matches!(result, Err(ParseError::NoHeaderFound(_))));
    }

    #[test]
    fn test_parse_header_needs_all_keywords() {
        // 「配分」が無い行は見出しにしない
        let text = "|單元名稱|學習目標|\n|A|一|";

        let result = parse(text, &KEYWORDS);
        assert!(matches!(result, Err(ParseError::NoHeaderFound(_))));
    }

    #[test]
    fn test_parse_header_only() {
        let text = "|單元名稱|學習目標|配分|\n|---|---|---|";

        assert_eq!(parse(text, &KEYWORDS), Err(ParseError::EmptyTable));
    }

    #[test]
    fn test_parse_fewer_cells_than_header() {
        let text = "|單元名稱|學習目標|配分|\n|A|一|";

        assert_eq!(parse(text, &KEYWORDS), Err(ParseError::EmptyTable));
    }

    #[test]
    fn test_parse_skips_blank_rows() {
        let text = "|單元名稱|學習目標|配分|\n|A|一|10|\n| | | |";

        let table = parse(text, &KEYWORDS).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(parse("", &KEYWORDS), Err(ParseError::NoHeaderFound(_))));
    }

    #[test]
    fn test_parse_keeps_dash_data_cell() {
        // 「-」は「なし」の意味のデータ。列がずれてはいけない
        let text = "|單元名稱|學習目標|題型|配分|\n|---|---|---|---|\n|A|一|-|10|\n|B|二|單選題|20|\n|C|三|配合題|30|";

        let table = parse(text, &KEYWORDS).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(cells(&table.rows()[0]), vec!["A", "一", "-", "10"]);
        assert_eq!(cells(&table.rows()[1]), vec!["B", "二", "單選題", "20"]);
        assert_eq!(cells(&table.rows()[2]), vec!["C", "三", "配合題", "30"]);
    }

    #[test]
    fn test_parse_drops_glued_separator_row() {
        let text = "|單元名稱|學習目標|配分|\n|:--|:--:|--:|A|一|10|\n|B|-|-|";

        let table = parse(text, &KEYWORDS).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(cells(&table.rows()[0]), vec!["A", "一", "10"]);
        assert_eq!(cells(&table.rows()[1]), vec!["B", "-", "-"]);
    }

    #[test]
    fn test_parse_first_row_glued_to_header() {
        let text = "|單元名稱|學習目標|配分|A|一|10|\n|B|二|20|";

        let table = parse(text, &KEYWORDS).unwrap();
        assert_eq!(cells(table.header()), vec!["單元名稱", "學習目標", "配分"]);
        assert_eq!(table.len(), 2);
        assert_eq!(cells(&table.rows()[0]), vec!["A", "一", "10"]);
        assert_eq!(cells(&table.rows()[1]), vec!["B", "二", "20"]);
    }

    #[test]
    fn test_parse_keeps_trailing_header_column() {
        // 「題型」はキーワードではないが、次の行と列数が一致するので見出しの一部
        let text = "|單元名稱|學習目標|配分|題型|\n|---|---|---|---|\n|A|一|10|單選題|";

        let table = parse(text, &KEYWORDS).unwrap();
        assert_eq!(cells(table.header()), vec!["單元名稱", "學習目標", "配分", "題型"]);
        assert_eq!(cells(&table.rows()[0]), vec!["A", "一", "10", "單選題"]);
    }
}
