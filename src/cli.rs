//! # Command-Line Interface Module / 命令行接口模块
//!
//! Builds the clap command with localized help and dispatches to the run command.
//!
//! 构建带有本地化帮助信息的 clap 命令，并分发到运行命令。

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::infra::t;

pub mod commands;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` or `--lang=<VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--lang") {
        return args.get(pos + 1).cloned();
    }
    args.iter()
        .find_map(|arg| arg.strip_prefix("--lang="))
        .map(str::to_string)
}

pub fn build_cli() -> Command {
    Command::new("capture-replay-check")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about").to_string())
        .arg(
            Arg::new("agi_dir")
                .help(t!("arg_agi_dir").to_string())
                .value_name("AGI_DIR")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("out_dir")
                .help(t!("arg_out_dir").to_string())
                .value_name("OUT_DIR")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("params")
                .short('p')
                .long("params")
                .help(t!("arg_params").to_string())
                .value_name("PARAMS")
                .default_value("params.json")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("adb")
                .long("adb")
                .help(t!("arg_adb").to_string())
                .value_name("ADB")
                .default_value("adb")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("html")
                .long("html")
                .help(t!("arg_html").to_string())
                .value_name("HTML")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang").to_string())
                .value_name("LANGUAGE")
                .action(ArgAction::Set),
        )
}

/// Options of a run, extracted from the parsed command line.
/// 从解析后的命令行中提取的运行选项。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    pub agi_dir: PathBuf,
    pub out_dir: PathBuf,
    pub params: PathBuf,
    pub adb: String,
    pub html: Option<PathBuf>,
}

impl RunArgs {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let path = |id: &str| matches.get_one::<PathBuf>(id).cloned().unwrap_or_default();
        Self {
            agi_dir: path("agi_dir"),
            out_dir: path("out_dir"),
            params: path("params"),
            adb: matches.get_one::<String>("adb").cloned().unwrap_or_default(),
            html: matches.get_one::<PathBuf>("html").cloned(),
        }
    }
}

/// Parses the process arguments and runs the check.
///
/// # Returns
/// The byte the process should exit with.
pub async fn run() -> Result<u8> {
    // Language must be known before help texts are built.
    crate::init(pre_parse_language().as_deref());

    let matches = build_cli().get_matches();
    let args = RunArgs::from_matches(&matches);
    commands::run::execute(args).await
}
