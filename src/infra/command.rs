//! # Command Execution Module / 命令执行模块
//!
//! This module provides the injectable process-execution capability used by
//! every step of the check: a `CommandRunner` trait, its tokio-backed
//! implementation, and the helper that spawns a process while capturing its
//! combined stdout and stderr.
//!
//! 此模块提供检查中每个步骤使用的可注入进程执行能力：
//! `CommandRunner` trait、基于 tokio 的实现，以及在捕获合并的 stdout 和 stderr 的同时
//! 派生进程的辅助函数。

use std::ffi::OsString;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::infra::t;

/// A fully resolved external command: program, arguments and an optional timeout.
/// 一个完全解析的外部命令：程序、参数和可选的超时时间。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub timeout: Option<Duration>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Renders the invocation as a shell-quoted command line for logs and reports.
    /// 将调用渲染为经过 shell 引用的命令行，用于日志和报告。
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|part| {
                let part = part.to_string_lossy();
                shlex::try_quote(&part).map_or_else(|_| part.to_string(), |q| q.into_owned())
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The observable result of one external process.
/// 单个外部进程的可观察结果。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// `None` when the process was killed by a signal or hit its timeout.
    /// 当进程被信号终止或超时时为 `None`。
    pub code: Option<i32>,
    /// Combined stdout and stderr.
    /// 合并的 stdout 和 stderr。
    pub output: String,
}

impl ProcessOutcome {
    pub fn exited(code: i32) -> Self {
        Self {
            code: Some(code),
            output: String::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// The status this outcome propagates as; a missing exit code counts as 1.
    /// 此结果传播的状态码；缺失的退出码记为 1。
    pub fn exit_code(&self) -> i32 {
        self.code.unwrap_or(1)
    }
}

/// Runs external commands. Implemented by [`ProcessRunner`] for real processes
/// and by scripted fakes in tests.
///
/// 运行外部命令。真实进程由 [`ProcessRunner`] 实现，测试中由脚本化的替身实现。
pub trait CommandRunner {
    fn run(
        &self,
        invocation: &Invocation,
    ) -> impl Future<Output = std::io::Result<ProcessOutcome>> + Send;
}

/// Runs invocations as child processes through `tokio::process`.
/// 通过 `tokio::process` 将调用作为子进程运行。
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessOutcome> {
        let mut cmd = tokio::process::Command::new(&invocation.program);
        cmd.args(&invocation.args).kill_on_drop(true);

        let capture = spawn_and_capture(cmd);
        let (status, output) = match invocation.timeout {
            Some(limit) => match tokio::time::timeout(limit, capture).await {
                Ok(res) => res,
                Err(_) => {
                    // Dropping the capture future drops the child, which kills it.
                    return Ok(ProcessOutcome {
                        code: None,
                        output: t!("command.timed_out", seconds = limit.as_secs()).to_string(),
                    });
                }
            },
            None => capture.await,
        };

        let status = status?;
        Ok(ProcessOutcome {
            code: status.code(),
            output,
        })
    }
}

/// Spawns a command, captures its stdout and stderr.
/// The output streams are read concurrently and combined into a single string.
///
/// # Returns
/// A tuple containing:
/// - The `ExitStatus` of the process wrapped in an `io::Result`.
/// - The combined stdout and stderr as a `String`.
///
/// 派生一个命令，捕获其 stdout 和 stderr。
/// 输出流被并发读取并合并到一个字符串中。
pub async fn spawn_and_capture(
    mut cmd: tokio::process::Command,
) -> (std::io::Result<std::process::ExitStatus>, String) {
    let mut child = match cmd
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return (Err(e), String::new()),
    };

    let stdout = match child.stdout.take() {
        Some(stdout) => stdout,
        None => {
            return (
                Err(std::io::Error::other(t!("command.capture_stdout_failed").to_string())),
                String::new(),
            );
        }
    };
    let stderr = match child.stderr.take() {
        Some(stderr) => stderr,
        None => {
            return (
                Err(std::io::Error::other(t!("command.capture_stderr_failed").to_string())),
                String::new(),
            );
        }
    };

    // Both readers append to the same buffer so interleaving roughly follows the child.
    // 两个读取任务写入同一个缓冲区，使交错顺序大致与子进程一致。
    let output = Arc::new(tokio::sync::Mutex::new(String::new()));

    let stdout_output = Arc::clone(&output);
    let stdout_handle = tokio::spawn(async move {
        let mut lines = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let mut output = stdout_output.lock().await;
            output.push_str(&line);
            output.push('\n');
        }
    });

    let stderr_output = Arc::clone(&output);
    let stderr_handle = tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let mut output = stderr_output.lock().await;
            output.push_str(&line);
            output.push('\n');
        }
    });

    let status = child.wait().await;

    if let Err(e) = stdout_handle.await {
        eprintln!("Failed to join stdout task: {}", e);
    }
    if let Err(e) = stderr_handle.await {
        eprintln!("Failed to join stderr task: {}", e);
    }

    (status, output.lock().await.clone())
}
