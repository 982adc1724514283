//! エラー型定義
//!
//! パイプラインが呼び出し側に返すのは `NoHeaderFound` と `EmptyTable` だけ。
//! 列数の不一致・数値の読み取り失敗・重みゼロは各段で吸収し、
//! `Diagnostics` に件数として残す。

use thiserror::Error;

/// 表抽出に失敗した理由
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("見出し行が見つかりません（キーワード: {0}）")]
    NoHeaderFound(String),

    #[error("データ行がありません")]
    EmptyTable,
}

/// 失敗した処理段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Parse,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Config => write!(f, "設定"),
            Stage::Parse => write!(f, "表解析"),
        }
    }
}

/// パイプラインの失敗（どの段で失敗したかを保持する）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("表解析エラー: {0}")]
    Parse(#[from] ParseError),

    #[error("設定が不正: {0}")]
    InvalidConfig(String),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Parse(_) => Stage::Parse,
            PipelineError::InvalidConfig(_) => Stage::Config,
        }
    }

    /// 利用者向けの固定メッセージ
    pub fn user_message(&self) -> &'static str {
        match self {
            PipelineError::Parse(_) => "無法從此回應中擷取表格，請重新產生或檢查來源文件。",
            PipelineError::InvalidConfig(_) => "設定內容有誤，請檢查設定檔。",
        }
    }
}

/// 行編集の失敗
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("行番号が範囲外です: {index}（全{len}行）")]
    RowOutOfRange { index: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_error_stage() {
        let err = PipelineError::from(ParseError::EmptyTable);
        assert_eq!(err.stage(), Stage::Parse);

        let err = PipelineError::InvalidConfig("header_keywords が空".into());
        assert_eq!(err.stage(), Stage::Config);
    }

    #[test]
    fn test_parse_errors_share_user_message() {
        let a = PipelineError::from(ParseError::EmptyTable);
        let b = PipelineError::from(ParseError::NoHeaderFound("單元".into()));
        assert_eq!(a.user_message(), b.user_message());
        assert!(a.user_message().contains("表格"));
    }

    #[test]
    fn test_error_display_no_header() {
        let err = ParseError::NoHeaderFound("單元, 目標".into());
        let display = format!("{}", err);
        assert!(display.contains("見出し行"));
        assert!(display.contains("單元, 目標"));
    }
}
