//! # Data Models Module / 数据模型模块
//!
//! This module defines the records produced while running the check: the
//! outcome of each step and the report of the whole run.
//!
//! 此模块定义运行检查时产生的记录：每个步骤的结果以及整次运行的报告。

use chrono::{DateTime, Local};
use serde::Serialize;
use std::time::Duration;

use crate::core::steps::Step;
use crate::infra::t;

/// Outcome of a single step.
/// 单个步骤的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepOutcome {
    /// The process exited with code 0.
    /// 进程以退出码 0 结束。
    Passed,
    /// The process exited non-zero, timed out, or was killed. `code` is what the run propagates.
    /// 进程以非零码退出、超时或被终止。`code` 是本次运行传播的状态码。
    Failed { code: i32 },
    /// A best-effort step whose result does not affect the run.
    /// 尽力而为的步骤，其结果不影响本次运行。
    Ignored { code: Option<i32> },
}

impl StepOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, StepOutcome::Failed { .. })
    }

    /// Gets the status of the outcome as a string for display.
    /// 以字符串形式获取结果的状态以供显示。
    pub fn get_status_str(&self) -> String {
        match self {
            StepOutcome::Passed => t!("report.status_passed").to_string(),
            StepOutcome::Failed { code } => t!("report.status_failed", code = code).to_string(),
            StepOutcome::Ignored { .. } => t!("report.status_ignored").to_string(),
        }
    }

    /// Gets the appropriate CSS class for the status.
    pub fn get_status_class(&self) -> &'static str {
        match self {
            StepOutcome::Passed => "status-Passed",
            StepOutcome::Failed { .. } => "status-Failed",
            StepOutcome::Ignored { .. } => "status-Ignored",
        }
    }
}

/// Everything recorded about one executed step.
/// 关于一个已执行步骤的全部记录。
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub step: Step,
    /// Shell-quoted command line that was run.
    pub command: String,
    pub outcome: StepOutcome,
    pub duration: Duration,
    /// Combined stdout and stderr of the process.
    pub output: String,
    pub started_at: DateTime<Local>,
}

/// The result of a complete run: the steps that executed, in order, and the
/// status the process should exit with.
///
/// 一次完整运行的结果：按顺序执行的步骤，以及进程应返回的状态码。
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub records: Vec<StepRecord>,
    pub exit_code: i32,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.exit_code == 0
    }

    /// The step that ended the run, if any.
    /// 结束本次运行的步骤（如果有）。
    pub fn failed_step(&self) -> Option<&StepRecord> {
        self.records.iter().find(|r| r.outcome.is_failure())
    }

    /// The steps that were executed, in order.
    pub fn steps(&self) -> Vec<Step> {
        self.records.iter().map(|r| r.step).collect()
    }

    pub fn record(&self, step: Step) -> Option<&StepRecord> {
        self.records.iter().find(|r| r.step == step)
    }
}
