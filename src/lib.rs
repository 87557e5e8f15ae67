//! # Capture/Replay Check Library / 捕获重放检查库
//!
//! This library provides the core functionality for the capture/replay check,
//! an end-to-end device test of the AGI `gapit` tool: it installs an Android
//! app, traces it, replays the trace and validates the profiling and
//! frame-graph outputs.
//!
//! 此库为捕获/重放检查提供核心功能，
//! 这是对 AGI `gapit` 工具的端到端设备测试：安装 Android 应用、录制 trace、
//! 重放 trace 并验证性能分析和帧图输出。
//!
//! ## Modules / 模块
//!
//! - `core` - Test parameters, step planning and the execution pipeline
//! - `infra` - Infrastructure services like command execution, adb and file system operations
//! - `reporting` - Console summary and HTML report
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 测试参数、步骤规划和执行流水线
//! - `infra` - 基础设施服务，如命令执行、adb 和文件系统操作
//! - `reporting` - 控制台摘要和 HTML 报告
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::execution;
pub use core::models;
pub use core::params;

/// Selects the user-interface language.
///
/// An explicit `language` wins; otherwise the system locale is used. The full
/// locale (e.g. "zh-CN") is tried first, then just the language code (e.g.
/// "en"), and finally the default language ("en").
pub fn init(language: Option<&str>) {
    let locale = language
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    let lang = if available_locales.contains(&locale.as_str()) {
        &locale
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
