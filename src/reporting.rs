//! # Reporting Module / 报告模块
//!
//! This module handles the display of run results: a colored console summary
//! and an optional standalone HTML report.
//!
//! 此模块处理运行结果的展示：带颜色的控制台摘要和可选的独立 HTML 报告。

pub mod console;
pub mod html;

// Re-export common reporting functions
pub use console::{print_failure_details, print_summary};
pub use html::generate_html_report;
