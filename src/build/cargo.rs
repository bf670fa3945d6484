//! Constrained build path — direct cargo cross build for the UWP arm64
//! target. No generator step: the general build-file generator has no
//! support for this target, so the compiler is invoked directly under a
//! scoped environment overlay.

use crate::core::options::{CONSTRAINED_CARGO_FLAGS, CONSTRAINED_CHANNEL};
use crate::core::platform::{BuildType, CROSS_TARGET};
use crate::exec::{self, EnvOverlay};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Arguments for the cross build. Release mode adds `--release`; debug is
/// cargo's default profile.
pub fn cross_args(build_type: BuildType) -> Vec<String> {
    let mut args: Vec<String> = vec!["build".to_string()];
    args.extend(
        CONSTRAINED_CARGO_FLAGS
            .split_whitespace()
            .map(str::to_string),
    );
    args.push("--target".to_string());
    args.push(CROSS_TARGET.to_string());
    if build_type == BuildType::Release {
        args.push("--release".to_string());
    }
    args
}

/// Environment overlay for the cross build: the pinned channel plus the
/// recipe's runtime variables. Applied to the child invocation only.
pub fn cross_env(recipe_env: &IndexMap<String, String>) -> EnvOverlay {
    let mut env = EnvOverlay::new();
    env.set("RUSTUP_TOOLCHAIN", CONSTRAINED_CHANNEL);
    env.extend(recipe_env.iter().map(|(k, v)| (k.clone(), v.clone())));
    env
}

/// Run the cross build in the fetched source folder.
pub fn build_cross(
    source_dir: &Path,
    build_type: BuildType,
    recipe_env: &IndexMap<String, String>,
) -> Result<(), String> {
    let args = cross_args(build_type);
    let env = cross_env(recipe_env);
    exec::run_checked("cargo", &args, Some(source_dir), &env)?;
    Ok(())
}

/// Output folder the cross build drops artifacts into.
pub fn target_output_dir(source_dir: &Path, build_type: BuildType) -> PathBuf {
    source_dir
        .join("target")
        .join(CROSS_TARGET)
        .join(build_type.profile_dir())
}
