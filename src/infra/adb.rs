//! # ADB Module / ADB 模块
//!
//! Resolves the `adb` program and builds the two device-side invocations the
//! check needs: installing the APK under test and force-stopping it.
//!
//! 解析 `adb` 程序并构建检查所需的两个设备端调用：安装被测 APK 和强制停止它。

use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::infra::command::Invocation;
use crate::infra::t;

pub const INSTALL_TIMEOUT: Duration = Duration::from_secs(120);
pub const FORCE_STOP_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_ADB: &str = "adb";

/// Strips surrounding whitespace and one layer of matching quotes.
pub fn normalize_command_path(value: &str) -> String {
    let trimmed = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|candidate| candidate.strip_suffix(quote))
        {
            return inner.trim().to_string();
        }
    }
    trimmed.to_string()
}

/// The `adb` executable used for device commands.
/// 用于设备命令的 `adb` 可执行文件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adb {
    program: PathBuf,
}

impl Default for Adb {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_ADB),
        }
    }
}

impl Adb {
    /// Resolves a configured program. An empty value falls back to `adb` on `PATH`;
    /// anything else must point at an existing file.
    ///
    /// 解析配置的程序。空值回退到 `PATH` 上的 `adb`；其他值必须指向已存在的文件。
    pub fn resolve(configured: &str) -> Result<Self> {
        let normalized = normalize_command_path(configured);
        if normalized.is_empty() || normalized == DEFAULT_ADB {
            return Ok(Self::default());
        }
        let path = Path::new(&normalized);
        if path.is_dir() {
            bail!("{}", t!("adb.path_is_directory", path = normalized));
        }
        if !path.exists() {
            bail!("{}", t!("adb.not_found", path = normalized));
        }
        Ok(Self {
            program: PathBuf::from(normalized),
        })
    }

    /// `adb install -g -t [--abi <abi>] <apk>`
    pub fn install(&self, apk: &str, abi: Option<&str>) -> Invocation {
        let mut inv = Invocation::new(&self.program).args(["install", "-g", "-t"]);
        if let Some(abi) = abi {
            inv = inv.arg("--abi").arg(abi);
        }
        inv.arg(apk).timeout(INSTALL_TIMEOUT)
    }

    /// `adb shell am force-stop <package>`
    pub fn force_stop(&self, package: &str) -> Invocation {
        Invocation::new(&self.program)
            .args(["shell", "am", "force-stop", package])
            .timeout(FORCE_STOP_TIMEOUT)
    }
}
