//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides the path handling used by the check: expanding and
//! validating the directories given on the command line, and verifying that
//! the JSON artifacts written by the capture tool are well-formed.
//!
//! 此模块提供检查所用的路径处理：展开并验证命令行给出的目录，
//! 以及验证捕获工具写出的 JSON 产物格式正确。

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::infra::t;

/// Expands `~` and environment variables in a user-supplied path.
/// A path that already exists as typed is returned unchanged, so names
/// containing a literal `$` or `~` are never rewritten.
///
/// # Arguments
/// * `path` - Path as typed by the user
///
/// # Returns
/// The expanded path, or an error if a referenced variable is undefined
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Ok(path.to_path_buf());
    }
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .with_context(|| t!("fs.expand_failed", path = raw).to_string())?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Lexically normalizes a path: drops `.` components and folds `..` into the
/// preceding component without touching the file system.
///
/// 对路径进行词法规范化：去掉 `.` 组件，并将 `..` 折叠到前一个组件，不访问文件系统。
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                ) && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Checks if a path exists and is a directory.
///
/// # Returns
/// `true` if the path exists and is a directory, `false` otherwise
pub fn is_directory(path: &Path) -> bool {
    path.exists() && path.is_dir()
}

/// Expands, normalizes and checks a directory argument.
///
/// # Arguments
/// * `path` - Directory path from the command line
///
/// # Returns
/// The normalized path, or an error if it is not an existing directory
pub fn require_directory(path: &Path) -> Result<PathBuf> {
    let expanded = normalize(&expand_path(path)?);
    if !is_directory(&expanded) {
        bail!("{}", t!("fs.not_a_directory", path = expanded.display()));
    }
    Ok(expanded)
}

/// Reports whether `path` holds a syntactically valid JSON document.
/// An unreadable file is an error; unparsable content is `Ok(false)`.
///
/// 报告 `path` 是否包含语法有效的 JSON 文档。
/// 无法读取的文件返回错误；无法解析的内容返回 `Ok(false)`。
pub fn is_valid_json(path: &Path) -> Result<bool> {
    let content = fs::read_to_string(path)
        .with_context(|| t!("fs.read_failed", path = path.display()).to_string())?;
    Ok(serde_json::from_str::<serde_json::Value>(&content).is_ok())
}
