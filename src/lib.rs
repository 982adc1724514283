//! objective-table
//!
//! AI回答の學習目標表を配分済みの審核表に変換するCLIのライブラリ部分。

pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod logging;
