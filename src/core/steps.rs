//! # Step Planning Module / 步骤规划模块
//!
//! This module turns validated test parameters into the exact command lines
//! of each step of the check, and derives the artifact paths written into
//! the output directory.
//!
//! 此模块将经过验证的测试参数转换为检查中每个步骤的确切命令行，
//! 并推导写入输出目录的产物路径。

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::params::TestParameters;
use crate::infra::command::Invocation;
use crate::infra::t;

/// Draw call index at which `gapit screenshot` grabs the framebuffer.
pub const SCREENSHOT_EXECUTED_DRAWS: u32 = 5;

#[cfg(windows)]
const GAPIT_BINARY: &str = "gapit.exe";
#[cfg(not(windows))]
const GAPIT_BINARY: &str = "gapit";

/// The steps of the check, in execution order.
/// 检查的各个步骤，按执行顺序排列。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Step {
    Install,
    Trace,
    ForceStop,
    Video,
    Screenshot,
    Profile,
    Framegraph,
}

impl Step {
    pub const ALL: [Step; 7] = [
        Step::Install,
        Step::Trace,
        Step::ForceStop,
        Step::Video,
        Step::Screenshot,
        Step::Profile,
        Step::Framegraph,
    ];

    /// Stable identifier, matching the `gapit` verb where there is one.
    /// 稳定的标识符，有对应 `gapit` 子命令时与之一致。
    pub fn id(self) -> &'static str {
        match self {
            Step::Install => "install",
            Step::Trace => "trace",
            Step::ForceStop => "force-stop",
            Step::Video => "video",
            Step::Screenshot => "screenshot",
            Step::Profile => "profile",
            Step::Framegraph => "framegraph",
        }
    }

    /// Localized, human-readable step name.
    /// 本地化的、可读的步骤名称。
    pub fn label(self) -> String {
        match self {
            Step::Install => t!("step.install"),
            Step::Trace => t!("step.trace"),
            Step::ForceStop => t!("step.force_stop"),
            Step::Video => t!("step.video"),
            Step::Screenshot => t!("step.screenshot"),
            Step::Profile => t!("step.profile"),
            Step::Framegraph => t!("step.framegraph"),
        }
        .to_string()
    }

    /// Whether a failing outcome of this step ends the run.
    pub fn is_gating(self) -> bool {
        self != Step::ForceStop
    }

    /// Whether the step runs `gapit` (as opposed to `adb`).
    pub fn is_gapit(self) -> bool {
        !matches!(self, Step::Install | Step::ForceStop)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Files the capture tool writes, all named `<out_dir>/<package>.<suffix>`.
/// 捕获工具写出的文件，均命名为 `<out_dir>/<package>.<suffix>`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub trace: PathBuf,
    pub frames: PathBuf,
    pub screenshot: PathBuf,
    pub profile_json: PathBuf,
    pub framegraph_json: PathBuf,
}

impl Artifacts {
    pub fn new(out_dir: &Path, package: &str) -> Self {
        let file = |suffix: &str| out_dir.join(format!("{package}.{suffix}"));
        Self {
            trace: file("gfxtrace"),
            frames: file("frame.png"),
            screenshot: file("png"),
            profile_json: file("profiling.json"),
            framegraph_json: file("framegraph.json"),
        }
    }
}

/// Builds `gapit` command lines for one app's capture and replay.
/// 为一个应用的捕获和重放构建 `gapit` 命令行。
#[derive(Debug, Clone)]
pub struct GapitPlan<'a> {
    gapit: PathBuf,
    params: &'a TestParameters,
    artifacts: &'a Artifacts,
}

impl<'a> GapitPlan<'a> {
    pub fn new(agi_dir: &Path, params: &'a TestParameters, artifacts: &'a Artifacts) -> Self {
        Self {
            gapit: agi_dir.join(GAPIT_BINARY),
            params,
            artifacts,
        }
    }

    fn verb(&self, verb: &str) -> Invocation {
        Invocation::new(&self.gapit).arg(verb)
    }

    pub fn trace(&self) -> Invocation {
        let p = self.params;
        let mut inv = self.verb("trace").args([
            "-api",
            p.api(),
            "-start-at-frame",
            p.start_frame(),
            "-capture-frames",
            p.num_frames(),
            "-observe-frames",
            p.observe_frames(),
            "-out",
        ]);
        inv = inv.arg(&self.artifacts.trace);
        if let Some(extra) = p.additional_args() {
            inv = inv.arg("-additionalargs").arg(extra);
        }
        inv.arg(p.component())
    }

    /// Replays into a series of side-by-side PNG frames rather than an mp4,
    /// so the hosts do not need ffmpeg.
    pub fn video(&self) -> Invocation {
        self.verb("video")
            .args([
                "-gapir-nofallback",
                "-type",
                "sxs-frames",
                "-frames-minimum",
                self.params.num_frames(),
                "-out",
            ])
            .arg(&self.artifacts.frames)
            .arg(&self.artifacts.trace)
    }

    pub fn screenshot(&self) -> Invocation {
        self.verb("screenshot")
            .arg("-executeddraws")
            .arg(SCREENSHOT_EXECUTED_DRAWS.to_string())
            .arg("-out")
            .arg(&self.artifacts.screenshot)
            .arg(&self.artifacts.trace)
    }

    pub fn profile(&self) -> Invocation {
        self.verb("profile")
            .args(["-json", "-out"])
            .arg(&self.artifacts.profile_json)
            .arg(&self.artifacts.trace)
    }

    pub fn framegraph(&self) -> Invocation {
        self.verb("framegraph")
            .arg("-json")
            .arg(&self.artifacts.framegraph_json)
            .arg(&self.artifacts.trace)
    }
}
