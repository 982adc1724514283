//! Objective Table Common Library
//!
//! AIが生成した學習目標の表を読み取り、配分（合計100点など）を計算するエンジン。
//! ファイル入出力は行わない。

pub mod types;
pub mod error;
pub mod parser;
pub mod normalizer;
pub mod weight;
pub mod allocator;
pub mod pipeline;
pub mod layout;
pub mod export;

pub use types::{NormalizedRow, RawRow, RowRepair, ScoredRow, Table, UnitGroup, WeightMode};
pub use error::{EditError, ParseError, PipelineError, Stage};
pub use parser::{parse, parse_with_repair};
pub use normalizer::{clean_category, extract_number, locate_columns, normalize, ColumnKeywords, ColumnRoles};
pub use weight::{resolve_weights, unit_groups, ResolvedWeights, WeightedRow};
pub use allocator::{allocate, allocate_scores};
pub use pipeline::{apply_edit, refresh, rescore, run, Diagnostics, PipelineConfig, RowEdit, ScoredTable};
pub use layout::SheetLayout;
