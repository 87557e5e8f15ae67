//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders a run report as a standalone HTML page: overall
//! status, the parameters used, and a table of steps whose command line and
//! captured output can be expanded.
//!
//! 此模块将运行报告渲染为独立的 HTML 页面：总体状态、所用参数，
//! 以及一个可以展开命令行和捕获输出的步骤表格。

use anyhow::{Context, Result};
use chrono::Local;
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::Path;

use crate::core::models::RunReport;
use crate::core::params::TestParameters;
use crate::infra::t;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = "\
body{font-family:-apple-system,Segoe UI,Helvetica,Arial,sans-serif;margin:2em;color:#222}\
table{border-collapse:collapse;width:100%;margin-top:1em}\
th,td{border-bottom:1px solid #ddd;padding:6px 10px;text-align:left;vertical-align:top}\
.status-Passed{color:#1a7f37;font-weight:600}\
.status-Failed{color:#cf222e;font-weight:600}\
.status-Ignored{color:#9a6700;font-weight:600}\
.duration-cell{text-align:right;white-space:nowrap}\
pre{background:#f6f8fa;padding:8px;overflow-x:auto;white-space:pre-wrap}\
.params td{border:none;padding:2px 10px}";

/// Renders the report page.
///
/// # Arguments / 参数
/// * `report` - The finished run
/// * `params` - Parameters the run used, listed at the top of the page
pub fn render_html_report(report: &RunReport, params: &TestParameters) -> Markup {
    let overall_class = if report.passed() { "status-Passed" } else { "status-Failed" };
    let overall = if report.passed() {
        t!("html_report.overall_passed").to_string()
    } else {
        t!("html_report.overall_failed", code = report.exit_code).to_string()
    };

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title")) }
                style { (maud::PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header")) }
                p class=(overall_class) { (overall) }
                p { (t!("html_report.generated_at", time = Local::now().format("%Y-%m-%d %H:%M:%S"))) }

                h2 { (t!("html_report.parameters")) }
                table class="params" {
                    @for (key, value) in params.iter() {
                        tr { td { code { (key) } } td { (value) } }
                    }
                }

                h2 { (t!("html_report.steps")) }
                table {
                    thead {
                        tr {
                            th { (t!("html_report.table.header.name")) }
                            th { (t!("html_report.table.header.status")) }
                            th { (t!("html_report.table.header.started")) }
                            th class="duration-cell" { (t!("html_report.table.header.duration")) }
                        }
                    }
                    tbody {
                        @for record in &report.records {
                            tr {
                                td {
                                    (record.step.label())
                                    details {
                                        summary { (t!("html_report.toggle_output")) }
                                        pre { (record.command) }
                                        @if !record.output.trim().is_empty() {
                                            pre { (record.output) }
                                        }
                                    }
                                }
                                td class=(record.outcome.get_status_class()) { (record.outcome.get_status_str()) }
                                td { (record.started_at.format("%H:%M:%S").to_string()) }
                                td class="duration-cell" { (format!("{:.2}s", record.duration.as_secs_f64())) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Writes the HTML report for `report` to `output_path`.
///
/// # Errors / 错误
/// Returns an error if the file cannot be written.
pub fn generate_html_report(
    report: &RunReport,
    params: &TestParameters,
    output_path: &Path,
) -> Result<()> {
    let page = render_html_report(report, params);
    fs::write(output_path, page.into_string())
        .with_context(|| t!("html_report.write_failed", path = output_path.display()).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{StepOutcome, StepRecord};
    use crate::core::steps::Step;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn params() -> TestParameters {
        TestParameters::from_map(BTreeMap::from([
            ("apk".to_string(), "app.apk".to_string()),
            ("package".to_string(), "com.example.app".to_string()),
            ("activity".to_string(), "MainActivity".to_string()),
        ]))
        .unwrap()
    }

    #[test]
    fn escapes_captured_output() {
        let report = RunReport {
            records: vec![StepRecord {
                step: Step::Video,
                command: "gapit video".to_string(),
                outcome: StepOutcome::Failed { code: 2 },
                duration: Duration::from_millis(1500),
                output: "<replay failed & exited>".to_string(),
                started_at: Local::now(),
            }],
            exit_code: 2,
        };
        let page = render_html_report(&report, &params()).into_string();
        assert!(page.contains("&lt;replay failed &amp; exited&gt;"));
        assert!(page.contains("status-Failed"));
        assert!(page.contains("1.50s"));
        assert!(page.contains("com.example.app"));
    }
}
