//! # Check Execution Engine Module / 检查执行引擎模块
//!
//! This module runs the capture/replay check: install the app, trace it,
//! stop it, then replay, screenshot, profile and frame-graph the trace.
//! Every step blocks until its process exits, and the first failing step
//! ends the run with that step's exit code.
//!
//! 此模块运行捕获/重放检查：安装应用、录制 trace、停止应用，
//! 然后对 trace 进行重放、截图、性能分析和帧图生成。
//! 每个步骤都会阻塞直到其进程退出，第一个失败的步骤以其退出码结束本次运行。

use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::{
    core::{
        models::{RunReport, StepOutcome, StepRecord},
        params::TestParameters,
        steps::{Artifacts, GapitPlan, Step},
    },
    infra::{
        adb::Adb,
        command::{CommandRunner, Invocation},
        fs::is_valid_json,
        t,
    },
};

/// Status returned when the APK cannot be installed, whatever adb reported.
/// 无论 adb 报告什么，APK 无法安装时返回的状态码。
pub const INSTALL_FAILURE_CODE: i32 = 1;

/// Everything a run needs once the command line has been validated.
/// 命令行验证完成后，一次运行所需的全部信息。
#[derive(Debug, Clone)]
pub struct RunContext {
    /// AGI build directory containing `gapit`.
    pub agi_dir: PathBuf,
    /// Writable directory receiving the artifacts.
    pub out_dir: PathBuf,
    pub params: TestParameters,
    pub adb: Adb,
}

impl RunContext {
    pub fn artifacts(&self) -> Artifacts {
        Artifacts::new(&self.out_dir, self.params.package())
    }
}

/// Runs the whole check against `runner`.
///
/// # Arguments
/// * `runner` - Executes the external processes
/// * `ctx` - Validated directories, parameters and adb program
///
/// # Returns
/// A `RunReport` whose `exit_code` is 0 on success, 1 if the install failed,
/// or the exit code of the first failing `gapit` step. An `Err` means the run
/// could not be carried out at all (`gapit` missing, malformed JSON output).
pub async fn run_check<R: CommandRunner>(runner: &R, ctx: &RunContext) -> Result<RunReport> {
    let artifacts = ctx.artifacts();
    let plan = GapitPlan::new(&ctx.agi_dir, &ctx.params, &artifacts);
    let mut report = RunReport::default();

    let install = ctx.adb.install(ctx.params.apk(), ctx.params.abi());
    if run_step(runner, Step::Install, &install, &mut report)
        .await?
        .is_failure()
    {
        report.exit_code = INSTALL_FAILURE_CODE;
        return Ok(report);
    }

    let trace = run_step(runner, Step::Trace, &plan.trace(), &mut report).await?;
    if let Some(code) = failure_code(trace) {
        report.exit_code = code;
        return Ok(report);
    }

    // Stop the app right away so the device can cool down during replay.
    let force_stop = ctx.adb.force_stop(ctx.params.package());
    run_step(runner, Step::ForceStop, &force_stop, &mut report).await?;

    for (step, invocation, json_output) in [
        (Step::Video, plan.video(), None),
        (Step::Screenshot, plan.screenshot(), None),
        (Step::Profile, plan.profile(), Some(&artifacts.profile_json)),
        (Step::Framegraph, plan.framegraph(), Some(&artifacts.framegraph_json)),
    ] {
        let outcome = run_step(runner, step, &invocation, &mut report).await?;
        if let Some(code) = failure_code(outcome) {
            report.exit_code = code;
            return Ok(report);
        }
        if let Some(path) = json_output {
            ensure_valid_json(step, path)?;
        }
    }

    report.exit_code = 0;
    Ok(report)
}

fn failure_code(outcome: StepOutcome) -> Option<i32> {
    match outcome {
        StepOutcome::Failed { code } => Some(code),
        _ => None,
    }
}

fn ensure_valid_json(step: Step, path: &Path) -> Result<()> {
    let valid = is_valid_json(path)
        .with_context(|| t!("run.json_unreadable", step = step.label()).to_string())?;
    if !valid {
        bail!("{}", t!("run.invalid_json", step = step.label(), path = path.display()));
    }
    println!("{}", t!("run.json_valid", path = path.display()).green());
    Ok(())
}

/// Runs one step, prints its progress, and appends a `StepRecord` to `report`.
///
/// Install and force-stop never fail the run through an `Err`: an adb that
/// cannot be spawned is a failed install or an ignored force-stop. A `gapit`
/// that cannot be spawned is an error.
async fn run_step<R: CommandRunner>(
    runner: &R,
    step: Step,
    invocation: &Invocation,
    report: &mut RunReport,
) -> Result<StepOutcome> {
    let command = invocation.command_line();
    println!("{}", t!("run.running_step", name = step.label()).blue());
    println!("{} {}", t!("run.command_prefix").blue(), command);

    let started_at = Local::now();
    let start = Instant::now();
    let result = runner.run(invocation).await;
    let duration = start.elapsed();

    let (outcome, output, spawn_error) = match result {
        Ok(process) => {
            let outcome = if !step.is_gating() {
                StepOutcome::Ignored { code: process.code }
            } else if process.success() {
                StepOutcome::Passed
            } else {
                StepOutcome::Failed {
                    code: process.exit_code(),
                }
            };
            (outcome, process.output, None)
        }
        Err(e) => {
            let outcome = if step.is_gating() {
                StepOutcome::Failed { code: 1 }
            } else {
                StepOutcome::Ignored { code: None }
            };
            (outcome, e.to_string(), Some(e))
        }
    };

    if !output.trim().is_empty() {
        println!("{}", output.trim());
    }

    let secs = format!("{:.2}", duration.as_secs_f64());
    match outcome {
        StepOutcome::Passed => println!(
            "{}",
            t!("run.step_passed", name = step.label(), duration = secs).green()
        ),
        StepOutcome::Failed { code } => println!(
            "{}",
            t!("run.step_failed", name = step.label(), code = code, duration = secs).red()
        ),
        StepOutcome::Ignored { .. } => {
            println!("{}", t!("run.step_ignored", name = step.label()).yellow())
        }
    }

    report.records.push(StepRecord {
        step,
        command,
        outcome,
        duration,
        output,
        started_at,
    });

    match spawn_error {
        Some(e) if step.is_gapit() => Err(anyhow!(e)
            .context(t!("run.spawn_failed", program = invocation.program.display()).to_string())),
        _ => Ok(outcome),
    }
}
