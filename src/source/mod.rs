//! Source acquisition — clone the recipe's repository and pin the revision.

use crate::exec::{self, EnvOverlay};
use std::path::Path;

/// Clone `url` into `dest` and check out `reference`. Network failures and
/// unknown revisions propagate as errors; no retries.
pub fn fetch(url: &str, reference: &str, dest: &Path) -> Result<(), String> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("cannot create {}: {}", parent.display(), e))?;
    }

    let env = EnvOverlay::new();

    let dest_str = dest.to_string_lossy();
    exec::run_checked("git", &["clone", url, dest_str.as_ref()], None, &env)
        .map_err(|e| format!("clone of {} failed: {}", url, e))?;

    exec::run_checked("git", &["checkout", reference], Some(dest), &env)
        .map_err(|e| format!("checkout of '{}' failed: {}", reference, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn git_available() -> bool {
        exec::run("git", &["--version"], None, &EnvOverlay::new())
            .map(|o| o.success())
            .unwrap_or(false)
    }

    /// Build a local repository with one tagged commit and a second commit
    /// on top, so checkout of the tag is observable.
    fn make_upstream(dir: &Path) {
        let env = EnvOverlay::new();
        let run = |args: &[&str]| {
            exec::run_checked("git", args, Some(dir), &env).unwrap();
        };
        exec::run_checked(
            "git",
            &["init", "-q", dir.to_string_lossy().as_ref()],
            None,
            &env,
        )
        .unwrap();
        std::fs::write(dir.join("lib.txt"), "v1").unwrap();
        run(&["add", "lib.txt"]);
        run(&[
            "-c",
            "user.email=test@example.com",
            "-c",
            "user.name=test",
            "commit",
            "-q",
            "-m",
            "v1",
        ]);
        run(&["tag", "0.10.1-rc"]);
        std::fs::write(dir.join("lib.txt"), "v2").unwrap();
        run(&["add", "lib.txt"]);
        run(&[
            "-c",
            "user.email=test@example.com",
            "-c",
            "user.name=test",
            "commit",
            "-q",
            "-m",
            "v2",
        ]);
    }

    #[test]
    fn test_fetch_clones_and_checks_out_tag() {
        if !git_available() {
            return;
        }
        let upstream = tempfile::tempdir().unwrap();
        make_upstream(upstream.path());

        let work = tempfile::tempdir().unwrap();
        let dest = work.path().join("source");
        fetch(
            upstream.path().to_string_lossy().as_ref(),
            "0.10.1-rc",
            &dest,
        )
        .unwrap();

        let content = std::fs::read_to_string(dest.join("lib.txt")).unwrap();
        assert_eq!(content, "v1", "tag checkout should see the first commit");
    }

    #[test]
    fn test_fetch_unknown_revision_fails() {
        if !git_available() {
            return;
        }
        let upstream = tempfile::tempdir().unwrap();
        make_upstream(upstream.path());

        let work = tempfile::tempdir().unwrap();
        let dest = work.path().join("source");
        let err = fetch(
            upstream.path().to_string_lossy().as_ref(),
            "no-such-tag",
            &dest,
        )
        .unwrap_err();
        assert!(err.contains("checkout"), "got: {}", err);
    }

    #[test]
    fn test_fetch_bad_url_fails() {
        if !git_available() {
            return;
        }
        let work = tempfile::tempdir().unwrap();
        let dest = work.path().join("source");
        let err = fetch("/nonexistent/upstream.git", "main", &dest).unwrap_err();
        assert!(err.contains("clone"), "got: {}", err);
    }
}
