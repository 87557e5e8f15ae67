//! # Test Parameters Module / 测试参数模块
//!
//! Test parameters are a flat string-to-string mapping. Defaults are merged
//! with a parameter file (JSON, or TOML by extension) that must supply the
//! APK, package and activity of the app under test.
//!
//! 测试参数是一个扁平的字符串到字符串映射。默认值会与参数文件（JSON，或按扩展名为 TOML）合并，
//! 该文件必须提供被测应用的 APK、包名和 Activity。

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::infra::t;

pub const KEY_APK: &str = "apk";
pub const KEY_PACKAGE: &str = "package";
pub const KEY_ACTIVITY: &str = "activity";
pub const KEY_API: &str = "api";
pub const KEY_START_FRAME: &str = "startframe";
pub const KEY_NUM_FRAMES: &str = "numframes";
pub const KEY_OBSERVE_FRAMES: &str = "observe_frames";
pub const KEY_ADDITIONAL_ARGS: &str = "additionalargs";
pub const KEY_ABI: &str = "abi";

/// Keys the parameter file must provide.
/// 参数文件必须提供的键。
pub const REQUIRED_KEYS: [&str; 3] = [KEY_APK, KEY_PACKAGE, KEY_ACTIVITY];

/// Values used when the parameter file does not override them.
/// 参数文件未覆盖时使用的值。
pub const DEFAULTS: [(&str, &str); 4] = [
    (KEY_START_FRAME, "100"),
    (KEY_NUM_FRAMES, "5"),
    (KEY_OBSERVE_FRAMES, "1"),
    (KEY_API, "vulkan"),
];

/// Validated test parameters. A value of this type always carries the required keys.
/// 经过验证的测试参数。此类型的值始终包含必需的键。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestParameters {
    values: BTreeMap<String, String>,
}

impl TestParameters {
    /// Reads and validates a parameter file.
    ///
    /// # Arguments
    /// * `path` - Parameter file; `.toml` files are parsed as TOML, everything else as JSON
    ///
    /// # Returns
    /// The defaults merged with the file's values
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| t!("params.read_failed", path = path.display()).to_string())?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let loaded = if is_toml {
            parse_toml(&content)
        } else {
            parse_json(&content)
        }
        .with_context(|| t!("params.parse_failed", path = path.display()).to_string())?;

        Self::from_map(loaded)
            .with_context(|| t!("params.invalid", path = path.display()).to_string())
    }

    /// Merges `loaded` over the defaults, failing if a required key is missing.
    /// 将 `loaded` 合并到默认值之上，如果缺少必需的键则失败。
    pub fn from_map(loaded: BTreeMap<String, String>) -> Result<Self> {
        if let Some(missing) = REQUIRED_KEYS.iter().find(|key| !loaded.contains_key(**key)) {
            bail!("{}", t!("params.missing_key", key = missing));
        }

        let mut values: BTreeMap<String, String> = DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        values.extend(loaded);
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn apk(&self) -> &str {
        self.value(KEY_APK)
    }

    pub fn package(&self) -> &str {
        self.value(KEY_PACKAGE)
    }

    pub fn activity(&self) -> &str {
        self.value(KEY_ACTIVITY)
    }

    pub fn api(&self) -> &str {
        self.value(KEY_API)
    }

    pub fn start_frame(&self) -> &str {
        self.value(KEY_START_FRAME)
    }

    pub fn num_frames(&self) -> &str {
        self.value(KEY_NUM_FRAMES)
    }

    pub fn observe_frames(&self) -> &str {
        self.value(KEY_OBSERVE_FRAMES)
    }

    pub fn additional_args(&self) -> Option<&str> {
        self.get(KEY_ADDITIONAL_ARGS)
    }

    pub fn abi(&self) -> Option<&str> {
        self.get(KEY_ABI)
    }

    /// `<package>/<activity>`, the component `gapit trace` launches.
    pub fn component(&self) -> String {
        format!("{}/{}", self.package(), self.activity())
    }
}

fn parse_json(content: &str) -> Result<BTreeMap<String, String>> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let serde_json::Value::Object(map) = value else {
        bail!("{}", t!("params.not_a_table"));
    };
    map.into_iter()
        .map(|(key, value)| {
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => return Err(anyhow!("{}", t!("params.not_scalar", key = key))),
            };
            Ok((key, text))
        })
        .collect()
}

fn parse_toml(content: &str) -> Result<BTreeMap<String, String>> {
    let table: toml::Table = toml::from_str(content)?;
    table
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                _ => return Err(anyhow!("{}", t!("params.not_scalar", key = key))),
            };
            Ok((key, text))
        })
        .collect()
}
