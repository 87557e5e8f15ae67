//! # Console Reporting Module / 控制台报告模块
//!
//! Prints the colored step summary at the end of a run.
//!
//! 在运行结束时打印带颜色的步骤摘要。

use colored::*;

use crate::core::models::{RunReport, StepOutcome};
use crate::infra::t;

/// Prints a formatted summary of the executed steps to the console.
///
/// # Output Format / 输出格式
/// ```text
/// --- Step Summary ---
///   - Passed           | Install APK              |      3.21s
///   - Passed           | Trace                    |     41.07s
///   - Ignored          | Force-stop app           |      0.30s
///   - Failed (exit 2)  | Replay frames            |      8.88s
/// ```
pub fn print_summary(report: &RunReport) {
    println!("\n{}", t!("summary_banner").bold());

    for record in &report.records {
        let status_str = record.outcome.get_status_str();
        let status_colored = match record.outcome {
            StepOutcome::Passed => status_str.green(),
            StepOutcome::Failed { .. } => status_str.red(),
            StepOutcome::Ignored { .. } => status_str.yellow(),
        };
        println!(
            "  - {:<18} | {:<24} | {:>10}",
            status_colored,
            record.step.label(),
            format!("{:.2?}", record.duration)
        );
    }

    if report.passed() {
        println!("\n{}", t!("all_steps_passed").green().bold());
    } else {
        println!("\n{}", t!("run_failed", code = report.exit_code).red().bold());
    }
}

/// Prints the captured output of the step that ended the run.
/// 打印结束本次运行的步骤所捕获的输出。
pub fn print_failure_details(report: &RunReport) {
    let Some(record) = report.failed_step() else {
        return;
    };

    println!("\n{}", t!("failure_banner").red().bold());
    println!("{}", "-".repeat(80));
    println!("{} '{}'", t!("report_header_failure").red(), record.step.label().cyan());
    println!("{} {}", t!("run.command_prefix").blue(), record.command);
    println!("\n--- {} ---\n", t!("step_log").yellow());
    if record.output.trim().is_empty() {
        println!("{}", t!("no_output").dimmed());
    } else {
        println!("{}", record.output.trim_end());
    }
    println!("\n{}", "-".repeat(80));
}
