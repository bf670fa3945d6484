//! External process execution with captured output and scoped environment.

use indexmap::IndexMap;
use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

/// Output from one external process invocation.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Environment variables applied to a single child process. The parent
/// environment is never mutated, so the overlay ends with the child.
#[derive(Debug, Clone, Default)]
pub struct EnvOverlay {
    vars: IndexMap<String, String>,
}

impl EnvOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn extend<I, K, V>(&mut self, vars: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in vars {
            self.vars.insert(k.into(), v.into());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    fn apply(&self, cmd: &mut Command) {
        for (k, v) in &self.vars {
            cmd.env(k, v);
        }
    }
}

/// Run an external command, capturing stdout and stderr.
pub fn run<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    cwd: Option<&Path>,
    env: &EnvOverlay,
) -> Result<ExecOutput, String> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    env.apply(&mut cmd);

    let output = cmd
        .output()
        .map_err(|e| format!("failed to spawn {}: {}", program, e))?;

    Ok(ExecOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Run an external command and treat a non-zero exit as an error, with the
/// child's stderr propagated verbatim.
pub fn run_checked<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    cwd: Option<&Path>,
    env: &EnvOverlay,
) -> Result<ExecOutput, String> {
    let out = run(program, args, cwd, env)?;
    if !out.success() {
        return Err(format!(
            "{} exited with code {}: {}",
            program,
            out.exit_code,
            out.stderr.trim()
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_echo() {
        let out = run("sh", &["-c", "echo hello"], None, &EnvOverlay::new()).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[test]
    fn test_run_failure_exit_code() {
        let out = run("sh", &["-c", "exit 42"], None, &EnvOverlay::new()).unwrap();
        assert!(!out.success());
        assert_eq!(out.exit_code, 42);
    }

    #[test]
    fn test_run_captures_stderr() {
        let out = run("sh", &["-c", "echo err >&2"], None, &EnvOverlay::new()).unwrap();
        assert!(out.success());
        assert!(out.stderr.contains("err"));
    }

    #[test]
    fn test_run_missing_program() {
        let result = run(
            "empaque-no-such-program",
            &["x"],
            None,
            &EnvOverlay::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_run_checked_propagates_stderr() {
        let err = run_checked(
            "sh",
            &["-c", "echo broken >&2; exit 3"],
            None,
            &EnvOverlay::new(),
        )
        .unwrap_err();
        assert!(err.contains("code 3"), "got: {}", err);
        assert!(err.contains("broken"), "got: {}", err);
    }

    #[test]
    fn test_run_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
        let out = run("sh", &["-c", "ls"], Some(dir.path()), &EnvOverlay::new()).unwrap();
        assert!(out.stdout.contains("marker.txt"));
    }

    #[test]
    fn test_env_overlay_visible_to_child() {
        let mut env = EnvOverlay::new();
        env.set("EMPAQUE_TEST_VAR", "overlay-value");
        let out = run(
            "sh",
            &["-c", "printf '%s' \"$EMPAQUE_TEST_VAR\""],
            None,
            &env,
        )
        .unwrap();
        assert_eq!(out.stdout, "overlay-value");
    }

    #[test]
    fn test_env_overlay_does_not_leak_to_parent() {
        let mut env = EnvOverlay::new();
        env.set("EMPAQUE_LEAK_CHECK", "v");
        run("sh", &["-c", "true"], None, &env).unwrap();
        assert!(std::env::var("EMPAQUE_LEAK_CHECK").is_err());
    }

    #[test]
    fn test_env_overlay_extend_and_get() {
        let mut env = EnvOverlay::new();
        env.extend([("A", "1"), ("B", "2")]);
        assert_eq!(env.get("A"), Some("1"));
        assert_eq!(env.get("B"), Some("2"));
        assert_eq!(env.get("C"), None);
        assert!(!env.is_empty());
        assert!(EnvOverlay::new().is_empty());
    }
}
