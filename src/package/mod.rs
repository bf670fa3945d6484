//! Package assembly — copy build outputs into the fixed `bin/`, `lib/`,
//! `include/` layout.
//!
//! Manual selection only happens on the Windows family; everything else
//! delegates to the external toolchain's install step. The per-platform
//! file selection is a declarative table: adding a platform means adding
//! rules, not new branching.

use crate::build::cargo;
use crate::core::platform::{BuildType, TargetClass};
use crate::core::types::{ArtifactRecord, RecipeConfig};
use crate::trace::hasher;
use std::path::{Path, PathBuf};

/// One pattern-based copy into the package layout.
#[derive(Debug, Clone)]
pub struct CopyRule {
    /// Folder the pattern is evaluated in. A missing folder matches nothing
    /// (headers have two candidate locations, either may be absent).
    pub root: PathBuf,
    /// Glob pattern relative to `root`
    pub pattern: String,
    /// Destination subfolder of the package (`bin`, `lib`, `include`)
    pub dest: String,
    /// Drop source subfolders, keeping only the file name
    pub flatten: bool,
}

/// Pattern-based deletion run before any copy.
#[derive(Debug, Clone)]
pub struct CleanupRule {
    pub root: PathBuf,
    pub pattern: String,
}

/// The packaging decision for one target class.
#[derive(Debug, Clone)]
pub struct PackagePlan {
    /// Hand the whole step to the external toolchain's install call
    pub delegate_install: bool,
    pub cleanup: Vec<CleanupRule>,
    pub rules: Vec<CopyRule>,
}

/// Build-output folder manual packaging selects from.
pub fn bin_path(
    target: TargetClass,
    build_type: BuildType,
    source_dir: &Path,
    build_dir: &Path,
) -> PathBuf {
    match target {
        TargetClass::ConstrainedArm64 => cargo::target_output_dir(source_dir, build_type),
        // Multi-config generator output
        TargetClass::WindowsX64 | TargetClass::OtherDesktop => {
            build_dir.join(build_type.as_str())
        }
    }
}

/// The declarative packaging table.
pub fn plan(
    target: TargetClass,
    build_type: BuildType,
    source_dir: &Path,
    build_dir: &Path,
) -> PackagePlan {
    if !target.manual_packaging() {
        return PackagePlan {
            delegate_install: true,
            cleanup: Vec::new(),
            rules: Vec::new(),
        };
    }

    let out = bin_path(target, build_type, source_dir, build_dir);

    // Transitive copies of the produced binaries land in the nested
    // dependency-output folder; delete them so the primary is the only
    // candidate.
    let cleanup = vec![
        CleanupRule {
            root: out.join("deps"),
            pattern: "*.dll".to_string(),
        },
        CleanupRule {
            root: out.join("deps"),
            pattern: "*.lib".to_string(),
        },
    ];

    let rules = vec![
        CopyRule {
            root: build_dir.join("include"),
            pattern: "**/*.h".to_string(),
            dest: "include".to_string(),
            flatten: false,
        },
        CopyRule {
            root: source_dir.join("include"),
            pattern: "**/*.h".to_string(),
            dest: "include".to_string(),
            flatten: false,
        },
        CopyRule {
            root: out.clone(),
            pattern: "*.lib".to_string(),
            dest: "lib".to_string(),
            flatten: true,
        },
        CopyRule {
            root: out,
            pattern: "*.dll".to_string(),
            dest: "bin".to_string(),
            flatten: true,
        },
    ];

    PackagePlan {
        delegate_install: false,
        cleanup,
        rules,
    }
}

/// Execute a manual packaging plan: cleanup first, then pattern copies.
/// Returns a record per copied artifact with its content hash.
pub fn assemble(plan: &PackagePlan, package_dir: &Path) -> Result<Vec<ArtifactRecord>, String> {
    std::fs::create_dir_all(package_dir)
        .map_err(|e| format!("cannot create {}: {}", package_dir.display(), e))?;

    for rule in &plan.cleanup {
        for path in glob_files(&rule.root, &rule.pattern)? {
            std::fs::remove_file(&path)
                .map_err(|e| format!("cannot delete {}: {}", path.display(), e))?;
        }
    }

    let mut artifacts = Vec::new();
    for rule in &plan.rules {
        for path in glob_files(&rule.root, &rule.pattern)? {
            let rel = if rule.flatten {
                PathBuf::from(path.file_name().ok_or_else(|| {
                    format!("no file name in {}", path.display())
                })?)
            } else {
                path.strip_prefix(&rule.root)
                    .map_err(|e| format!("path prefix error: {}", e))?
                    .to_path_buf()
            };

            let dest = package_dir.join(&rule.dest).join(&rel);
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("cannot create {}: {}", parent.display(), e))?;
            }
            std::fs::copy(&path, &dest).map_err(|e| {
                format!("cannot copy {} to {}: {}", path.display(), dest.display(), e)
            })?;

            artifacts.push(ArtifactRecord {
                path: format!("{}/{}", rule.dest, rel.display()),
                hash: hasher::hash_file(&dest)?,
            });
        }
    }

    Ok(artifacts)
}

/// Matching regular files under `root`. A missing root matches nothing.
fn glob_files(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, String> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    let full = root.join(pattern);
    let paths = glob::glob(full.to_string_lossy().as_ref())
        .map_err(|e| format!("bad glob pattern {}: {}", full.display(), e))?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| format!("glob error: {}", e))?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// The library base names exposed to downstream consumers. One entry: the
/// recipe's library name, with the debug suffix appended in debug builds.
pub fn library_names(recipe: &RecipeConfig, build_type: BuildType) -> Vec<String> {
    if build_type.is_debug() {
        vec![format!("{}{}", recipe.library, recipe.debug_suffix)]
    } else {
        vec![recipe.library.clone()]
    }
}
