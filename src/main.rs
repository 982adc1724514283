use clap::Parser;
use objective_table::{cli, config, editor, error, export, logging};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use objective_table_common::{pipeline, RowEdit, ScoredTable};

/// 解析結果の要約を表示
fn print_summary(table: &ScoredTable) {
    let diagnostics = &table.diagnostics;
    println!("✔ {}行を抽出（モード: {}）", table.rows.len(), table.mode);

    if diagnostics.zero_weight_pool {
        println!("⚠️ 配分が読み取れないため、{}点を均等に割り当てました", table.target_total);
    } else if diagnostics.was_rescaled(table.target_total) {
        println!(
            "⚖️ AIの原配分合計 {} を {}点に補正しました",
            diagnostics.source_total, table.target_total
        );
    }
    if diagnostics.padded_rows > 0 {
        println!("- セル不足の行を補完: {}行", diagnostics.padded_rows);
    }
    if diagnostics.unparseable_numbers > 0 {
        println!("- 数値を読み取れず0とした欄: {}件", diagnostics.unparseable_numbers);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Parse { input, output, mode, target } => {
            println!("📋 objective-table - 表解析\n");

            let text = export::read_text(&input)?;
            let table = pipeline::run(&text, &config.pipeline_with(mode, target))?;
            print_summary(&table);

            let output = output.unwrap_or_else(|| export::sibling_path(&input, "json"));
            export::write_table(&table, &output)?;
            println!("✔ 結果を保存: {}", output.display());

            println!("\n✅ 解析完了");
        }

        Commands::Export { input, output, title } => {
            println!("📄 objective-table - エクスポート\n");

            let table = export::read_table(&input)?;
            let title = title.unwrap_or_else(|| config.sheet_title.clone());
            let output_dir = output.unwrap_or_else(|| std::path::PathBuf::from("."));
            let output_path = export::output_path_for_format(&output_dir, &title, "xlsx");

            println!("- Excelを生成中...");
            export::excel::generate_excel(&table, &output_path)?;
            println!("✔ Excel出力: {}", output_path.display());

            println!("\n✅ エクスポート完了");
        }

        Commands::Run { input, output, mode, target } => {
            println!("🚀 objective-table - 一括処理\n");

            println!("[1/2] 表を解析中...");
            let text = export::read_text(&input)?;
            let table = pipeline::run(&text, &config.pipeline_with(mode, target))?;
            print_summary(&table);
            println!();

            println!("[2/2] エクスポート中...");
            let output_path = match output {
                Some(output) => export::output_path_for_format(&output, &config.sheet_title, "xlsx"),
                None => export::sibling_path(&input, "xlsx"),
            };
            export::excel::generate_excel(&table, &output_path)?;
            println!("✔ Excel出力: {}", output_path.display());

            println!("\n✅ 完了");
        }

        Commands::Edit { input, row, weight, category, output } => match row {
            Some(row) => {
                if row == 0 {
                    return Err(error::AppError::CliExecution("行番号は1から指定してください".into()));
                }
                let edit = RowEdit {
                    index: row - 1,
                    raw_weight: weight,
                    category,
                };
                let table = editor::run_single_edit(&input, output.as_deref(), &edit, &config.pipeline)?;
                editor::print_table(&table);
            }
            None => {
                println!("✏️  objective-table - 行編集\n");
                editor::run_interactive_edit(&input, output.as_deref(), &config.pipeline)?;
            }
        },

        Commands::Config { show, init } => {
            if init {
                let path = Config::default().save()?;
                println!("✔ 設定ファイルを作成しました: {}", path.display());
            }

            if show || !init {
                println!("設定:");
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}
