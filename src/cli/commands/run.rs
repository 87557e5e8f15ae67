//! # Run Command Module / 运行命令模块
//!
//! This module implements the check's only command: validate the two
//! directories, load the test parameters, run the pipeline against real
//! processes, report, and turn the result into a process exit status.
//!
//! 此模块实现检查的唯一命令：验证两个目录、加载测试参数、
//! 针对真实进程运行流水线、输出报告，并将结果转换为进程退出状态。

use anyhow::{Context, Result};
use colored::*;
use std::env;

use crate::{
    cli::RunArgs,
    core::{RunContext, TestParameters, run_check},
    infra::{adb::Adb, command::ProcessRunner, fs, t},
    reporting::{generate_html_report, print_failure_details, print_summary},
};

/// Executes the run command with the provided arguments.
///
/// # Returns
/// The exit status byte: 0 on success, otherwise the failing step's status
pub async fn execute(args: RunArgs) -> Result<u8> {
    let ctx = prepare_context(&args)?;

    println!("{}", t!("agi_dir_detected", path = ctx.agi_dir.display()));
    println!("{}", t!("out_dir_detected", path = ctx.out_dir.display()));
    println!(
        "{}",
        t!("testing_package", name = ctx.params.component().yellow())
    );
    println!("{}", t!("current_os", os = env::consts::OS).cyan());

    let report = run_check(&ProcessRunner, &ctx).await?;

    print_summary(&report);
    print_failure_details(&report);

    if let Some(report_path) = &args.html {
        println!("\n{}", t!("html_report.generating", path = report_path.display()));
        if let Err(e) = generate_html_report(&report, &ctx.params, report_path) {
            eprintln!("{} {:#}", t!("html_report.failed").red(), e);
        }
    }

    Ok(exit_status_byte(report.exit_code))
}

/// Validates the command line and loads everything a run needs.
/// 验证命令行并加载一次运行所需的全部内容。
pub fn prepare_context(args: &RunArgs) -> Result<RunContext> {
    let agi_dir = fs::require_directory(&args.agi_dir)
        .with_context(|| t!("agi_dir_invalid").to_string())?;
    let out_dir = fs::require_directory(&args.out_dir)
        .with_context(|| t!("out_dir_invalid").to_string())?;

    let params_path = fs::expand_path(&args.params)?;
    println!("{}", t!("loading_params", path = params_path.display()));
    let params = TestParameters::load(&params_path)?;
    let adb = Adb::resolve(&args.adb)?;

    Ok(RunContext {
        agi_dir,
        out_dir,
        params,
        adb,
    })
}

/// Maps a step status onto a process exit byte, never turning a failure into 0.
/// 将步骤状态映射为进程退出字节，绝不会把失败变成 0。
pub fn exit_status_byte(code: i32) -> u8 {
    if code == 0 {
        return 0;
    }
    match u8::try_from(code & 0xff) {
        Ok(0) | Err(_) => 1,
        Ok(byte) => byte,
    }
}
