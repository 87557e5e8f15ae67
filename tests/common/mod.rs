// Shared test helpers for integration tests
#![allow(dead_code)]

use capture_replay_check::core::{RunContext, TestParameters};
use capture_replay_check::infra::adb::Adb;
use capture_replay_check::infra::command::{CommandRunner, Invocation, ProcessOutcome};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::{TempDir, tempdir};

/// Identifies which step an invocation belongs to, by adb sub-command or gapit verb.
pub fn step_key(inv: &Invocation) -> &str {
    let is_gapit = inv
        .program
        .file_stem()
        .is_some_and(|stem| stem == "gapit");
    match (is_gapit, inv.args.first().and_then(|a| a.to_str())) {
        (true, Some(verb)) => verb,
        (false, Some("install")) => "install",
        (false, Some("shell")) => "force-stop",
        _ => "unknown",
    }
}

fn arg_after<'a>(inv: &'a Invocation, flag: &str) -> Option<&'a OsStr> {
    let pos = inv.args.iter().position(|a| a == flag)?;
    inv.args.get(pos + 1).map(OsString::as_os_str)
}

/// A fake `CommandRunner` that records every invocation, answers with
/// scripted exit codes, and writes the files a real `gapit` would write.
pub struct ScriptedRunner {
    calls: Mutex<Vec<Invocation>>,
    codes: HashMap<String, i32>,
    unspawnable: HashSet<String>,
    pub profile_json: String,
    pub framegraph_json: String,
}

impl Default for ScriptedRunner {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            codes: HashMap::new(),
            unspawnable: HashSet::new(),
            profile_json: r#"{"slices": [], "counters": []}"#.to_string(),
            framegraph_json: r#"{"nodes": [], "edges": []}"#.to_string(),
        }
    }
}

impl ScriptedRunner {
    pub fn exit_with(mut self, step: &str, code: i32) -> Self {
        self.codes.insert(step.to_string(), code);
        self
    }

    pub fn fail_to_spawn(mut self, step: &str) -> Self {
        self.unspawnable.insert(step.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn steps(&self) -> Vec<String> {
        self.calls().iter().map(|c| step_key(c).to_string()).collect()
    }

    fn write_output(&self, inv: &Invocation, key: &str) {
        let (flag, content) = match key {
            "profile" => ("-out", self.profile_json.as_str()),
            "framegraph" => ("-json", self.framegraph_json.as_str()),
            "trace" | "video" | "screenshot" => ("-out", "binary"),
            _ => return,
        };
        if let Some(path) = arg_after(inv, flag) {
            fs::write(path, content).unwrap();
        }
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessOutcome> {
        self.calls.lock().unwrap().push(invocation.clone());
        let key = step_key(invocation).to_string();
        if self.unspawnable.contains(&key) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", invocation.program.display()),
            ));
        }
        let code = self.codes.get(&key).copied().unwrap_or(0);
        if code == 0 {
            self.write_output(invocation, &key);
        }
        Ok(ProcessOutcome {
            code: Some(code),
            output: format!("{key} finished\n"),
        })
    }
}

pub fn example_params() -> TestParameters {
    TestParameters::from_map(BTreeMap::from([
        ("apk".to_string(), "app.apk".to_string()),
        ("package".to_string(), "com.example.app".to_string()),
        ("activity".to_string(), "MainActivity".to_string()),
    ]))
    .unwrap()
}

/// A context whose output directory lives inside `temp_dir`.
pub fn context_in(temp_dir: &TempDir) -> RunContext {
    RunContext {
        agi_dir: PathBuf::from("/build"),
        out_dir: temp_dir.path().to_path_buf(),
        params: example_params(),
        adb: Adb::default(),
    }
}

pub fn artifact(out_dir: &Path, suffix: &str) -> PathBuf {
    out_dir.join(format!("com.example.app.{suffix}"))
}

pub fn temp() -> TempDir {
    tempdir().expect("Failed to create temporary directory")
}

/// Writes a `params.json` with the required keys into `dir`.
pub fn write_params(dir: &Path) -> PathBuf {
    let path = dir.join("params.json");
    fs::write(
        &path,
        r#"{"apk": "app.apk", "package": "com.example.app", "activity": "MainActivity"}"#,
    )
    .unwrap();
    path
}

/// Installs shell-script stand-ins for `gapit` and `adb`.
///
/// The fake `gapit` writes whatever file follows `-out` (or `-json` for
/// `framegraph`), and exits with `$FAKE_GAPIT_FAIL_<VERB>` if that is set.
#[cfg(unix)]
pub fn install_fake_tools(agi_dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let gapit = agi_dir.join("gapit");
    let script = r#"#!/bin/sh
verb="$1"
shift
var="FAKE_GAPIT_FAIL_$(echo "$verb" | tr '[:lower:]' '[:upper:]')"
eval "code=\${$var:-0}"
if [ "$code" != "0" ]; then
  echo "gapit $verb failed" 1>&2
  exit "$code"
fi
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    -out) out="$2"; shift ;;
    -json) if [ "$verb" = "framegraph" ]; then out="$2"; shift; fi ;;
  esac
  shift
done
case "$verb" in
  profile|framegraph) echo '{"ok": true}' > "$out" ;;
  *) echo "data" > "$out" ;;
esac
echo "gapit $verb ok"
"#;
    fs::write(&gapit, script).unwrap();
    fs::set_permissions(&gapit, fs::Permissions::from_mode(0o755)).unwrap();

    let adb = agi_dir.join("adb");
    fs::write(&adb, "#!/bin/sh\necho \"adb $*\"\nexit ${FAKE_ADB_EXIT:-0}\n").unwrap();
    fs::set_permissions(&adb, fs::Permissions::from_mode(0o755)).unwrap();
    adb
}
