//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for the check,
//! including command execution, adb invocations, file system operations and i18n support.
//!
//! 此模块为检查提供基础设施服务，
//! 包括命令执行、adb 调用、文件系统操作和国际化支持。

pub mod adb;
pub mod command;
pub mod fs;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
