use clap::{Parser, Subcommand};
use objective_table_common::WeightMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "objective-table")]
#[command(about = "AI回答の學習目標表を読み取り、配分を計算するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 設定ファイル（省略時は ~/.config/objective-table/config.json）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// AI回答テキストを解析して配分済みJSONを出力
    Parse {
        /// AI回答テキストファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力JSONファイル（デフォルト: 入力ファイル名.json）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 重みモード (direct/hierarchical)
        #[arg(short, long)]
        mode: Option<WeightMode>,

        /// 配分する合計点
        #[arg(short, long)]
        target: Option<u32>,
    },

    /// 配分済みJSONからExcelを生成
    Export {
        /// 入力JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ファイル名（拡張子なし）
        #[arg(short = 'T', long)]
        title: Option<String>,
    },

    /// 解析からExcel出力まで一括実行
    Run {
        /// AI回答テキストファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 重みモード (direct/hierarchical)
        #[arg(short, long)]
        mode: Option<WeightMode>,

        /// 配分する合計点
        #[arg(short, long)]
        target: Option<u32>,
    },

    /// 配分済みJSONの行を編集して再配分
    Edit {
        /// 配分済みJSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 編集する行（1始まり）。省略時は対話モード
        #[arg(short, long)]
        row: Option<usize>,

        /// 新しい重み
        #[arg(short, long)]
        weight: Option<f64>,

        /// 新しい題型
        #[arg(short, long)]
        category: Option<String>,

        /// 出力先（省略時は上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/初期化
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定の設定ファイルを書き出す
        #[arg(long)]
        init: bool,
    },
}
