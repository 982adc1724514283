pub mod excel;

use crate::error::{AppError, Result};
use objective_table_common::{pipeline, PipelineConfig, ScoredTable};
use std::path::{Path, PathBuf};
use tracing::warn;

/// 出力先がディレクトリなら `title.extension` を付ける
pub fn output_path_for_format(output: &Path, title: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", title, extension))
    } else {
        output.to_path_buf()
    }
}

/// 入力ファイルと同じ場所・同じ名前で拡張子だけ変えたパス
pub fn sibling_path(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}

/// 配分済みJSONを読み込む
///
/// 手で編集されたファイルもあるので、題型と配分は読み込み時に計算し直す。
pub fn read_table(path: &Path) -> Result<ScoredTable> {
    if !path.exists() {
        return Err(AppError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let table: ScoredTable = serde_json::from_str(&content)?;
    let refreshed = pipeline::refresh(&table, &PipelineConfig::default().category_delimiters);
    if refreshed.rows != table.rows {
        warn!(path = %path.display(), "スナップショットの題型・配分を補正");
    }
    Ok(refreshed)
}

/// 配分済みJSONを書き出す
pub fn write_table(table: &ScoredTable, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(table)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// AI回答テキストを読み込む
pub fn read_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(AppError::FileNotFound(path.display().to_string()));
    }

    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_for_file() {
        let path = output_path_for_format(Path::new("out/result.xlsx"), "審核表", "xlsx");
        assert_eq!(path, PathBuf::from("out/result.xlsx"));
    }

    #[test]
    fn test_output_path_for_dir() {
        let path = output_path_for_format(Path::new("out"), "審核表", "xlsx");
        assert_eq!(path, PathBuf::from("out/審核表.xlsx"));
    }

    #[test]
    fn test_sibling_path() {
        assert_eq!(sibling_path(Path::new("a/answer.md"), "json"), PathBuf::from("a/answer.json"));
    }
}
