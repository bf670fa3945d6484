//! Standard build path — the external toolchain's three lifecycle calls
//! (write toolchain file, configure, build) plus the separate install call.

use crate::core::platform::BuildType;
use crate::exec::{self, EnvOverlay};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// File name of the generated toolchain file.
pub const TOOLCHAIN_FILE: &str = "empaque_toolchain.cmake";

/// Render the toolchain file: one forced cache entry per translated option.
pub fn render_toolchain(vars: &IndexMap<String, String>) -> String {
    let mut out = String::from("# Generated by empaque. Do not edit.\n");
    for (name, value) in vars {
        out.push_str(&format!("set({} \"{}\" CACHE STRING \"\" FORCE)\n", name, value));
    }
    out
}

/// Write the toolchain file into the build folder.
pub fn write_toolchain(
    build_dir: &Path,
    vars: &IndexMap<String, String>,
) -> Result<PathBuf, String> {
    std::fs::create_dir_all(build_dir)
        .map_err(|e| format!("cannot create {}: {}", build_dir.display(), e))?;
    let path = build_dir.join(TOOLCHAIN_FILE);
    std::fs::write(&path, render_toolchain(vars))
        .map_err(|e| format!("cannot write {}: {}", path.display(), e))?;
    Ok(path)
}

/// Arguments for the configure call.
pub fn configure_args(
    source_dir: &Path,
    build_dir: &Path,
    toolchain: &Path,
    build_type: BuildType,
) -> Vec<String> {
    vec![
        "-S".to_string(),
        source_dir.to_string_lossy().to_string(),
        "-B".to_string(),
        build_dir.to_string_lossy().to_string(),
        format!("-DCMAKE_TOOLCHAIN_FILE={}", toolchain.display()),
        format!("-DCMAKE_BUILD_TYPE={}", build_type.as_str()),
    ]
}

/// Arguments for the build call.
pub fn build_args(build_dir: &Path, build_type: BuildType) -> Vec<String> {
    vec![
        "--build".to_string(),
        build_dir.to_string_lossy().to_string(),
        "--config".to_string(),
        build_type.as_str().to_string(),
    ]
}

/// Arguments for the install call.
pub fn install_args(build_dir: &Path, package_dir: &Path, build_type: BuildType) -> Vec<String> {
    vec![
        "--install".to_string(),
        build_dir.to_string_lossy().to_string(),
        "--prefix".to_string(),
        package_dir.to_string_lossy().to_string(),
        "--config".to_string(),
        build_type.as_str().to_string(),
    ]
}

/// Run the configure step. Failures are fatal and propagated verbatim.
pub fn configure(
    source_dir: &Path,
    build_dir: &Path,
    toolchain: &Path,
    build_type: BuildType,
    env: &EnvOverlay,
) -> Result<(), String> {
    let args = configure_args(source_dir, build_dir, toolchain, build_type);
    exec::run_checked("cmake", &args, None, env)?;
    Ok(())
}

/// Run the build step.
pub fn build(build_dir: &Path, build_type: BuildType, env: &EnvOverlay) -> Result<(), String> {
    let args = build_args(build_dir, build_type);
    exec::run_checked("cmake", &args, None, env)?;
    Ok(())
}

/// Run the install step into the package folder.
pub fn install(
    build_dir: &Path,
    package_dir: &Path,
    build_type: BuildType,
    env: &EnvOverlay,
) -> Result<(), String> {
    let args = install_args(build_dir, package_dir, build_type);
    exec::run_checked("cmake", &args, None, env)?;
    Ok(())
}
