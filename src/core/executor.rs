//! Pipeline executor — runs the stages of one recipe invocation in order.
//!
//! The sequence is strictly linear and derived from the target class:
//!
//! ```text
//! constrained-arm64:  fetch -> patch -> build -> package
//! everything else:    fetch -> configure -> build -> package
//! ```
//!
//! Classification happens before any stage touches the filesystem, so an
//! unsupported platform combination fails without side effects. Every
//! stage transition is appended to the working folder's event log.

use crate::build::{cargo, cmake};
use crate::core::options;
use crate::core::platform::{BuildSettings, TargetClass};
use crate::core::types::{
    ArtifactRecord, RecipeConfig, RecipeEvent, RunReport, Stage, StageReport,
};
use crate::exec::EnvOverlay;
use crate::trace::eventlog;
use crate::{package, patch, source};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Everything one invocation needs, resolved up front.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub recipe: RecipeConfig,
    pub settings: BuildSettings,
    /// Working folder: source checkout, build tree, event log
    pub work_dir: PathBuf,
    /// Destination of the assembled package layout
    pub package_dir: PathBuf,
    /// Reuse an existing checkout instead of cloning again
    pub skip_fetch: bool,
    /// Report the stage sequence and library names without touching disk
    pub dry_run: bool,
}

impl RunConfig {
    pub fn source_dir(&self) -> PathBuf {
        self.work_dir.join("source")
    }

    pub fn build_dir(&self) -> PathBuf {
        self.work_dir.join("build")
    }
}

/// The stage sequence for a target class.
pub fn stage_sequence(target: TargetClass) -> Vec<Stage> {
    let prepare = if target.is_constrained() {
        Stage::Patch
    } else {
        Stage::Configure
    };
    vec![Stage::Fetch, prepare, Stage::Build, Stage::Package]
}

/// Run the full pipeline. Fails on the first stage error; the failure is
/// recorded in the event log before it propagates.
pub fn run(config: &RunConfig) -> Result<RunReport, String> {
    // No filesystem effects until the platform has a packaging rule
    let target = TargetClass::classify(&config.settings)?;

    let recipe = &config.recipe;

    if config.dry_run {
        return Ok(RunReport {
            recipe: recipe.name.clone(),
            package_version: recipe.package_version.clone(),
            stages: stage_sequence(target)
                .into_iter()
                .map(|stage| StageReport {
                    stage,
                    duration_seconds: 0.0,
                })
                .collect(),
            libraries: package::library_names(recipe, config.settings.build_type),
            artifacts: Vec::new(),
            total_duration: std::time::Duration::ZERO,
        });
    }

    let run_id = eventlog::generate_run_id();
    let started = Instant::now();

    eventlog::append_event(
        &config.work_dir,
        RecipeEvent::RunStarted {
            recipe: recipe.name.clone(),
            package_version: recipe.package_version.clone(),
            run_id: run_id.clone(),
            empaque_version: env!("CARGO_PKG_VERSION").to_string(),
        },
    )?;

    let source_dir = config.source_dir();
    let build_dir = config.build_dir();
    let mut stages: Vec<StageReport> = Vec::new();

    run_stage(&config.work_dir, Stage::Fetch, &mut stages, || {
        if config.skip_fetch && source_dir.exists() {
            return Ok(());
        }
        source::fetch(
            &recipe.source.url,
            recipe.source_reference(),
            &source_dir,
        )
    })?;

    let env = build_env(recipe);

    if target.is_constrained() {
        run_stage(&config.work_dir, Stage::Patch, &mut stages, || {
            let ops = patch::uwp::pin_ops(&source_dir, recipe.source_reference())?;
            patch::apply_all(&ops)?;
            Ok(())
        })?;

        run_stage(&config.work_dir, Stage::Build, &mut stages, || {
            cargo::build_cross(&source_dir, config.settings.build_type, &recipe.env)
        })?;
    } else {
        run_stage(&config.work_dir, Stage::Configure, &mut stages, || {
            let vars = options::cache_variables(recipe, &config.settings, target);
            let toolchain = cmake::write_toolchain(&build_dir, &vars)?;
            cmake::configure(
                &source_dir,
                &build_dir,
                &toolchain,
                config.settings.build_type,
                &env,
            )
        })?;

        run_stage(&config.work_dir, Stage::Build, &mut stages, || {
            cmake::build(&build_dir, config.settings.build_type, &env)
        })?;
    }

    let mut artifacts: Vec<ArtifactRecord> = Vec::new();
    run_stage(&config.work_dir, Stage::Package, &mut stages, || {
        let plan = package::plan(
            target,
            config.settings.build_type,
            &source_dir,
            &build_dir,
        );
        if plan.delegate_install {
            return cmake::install(
                &build_dir,
                &config.package_dir,
                config.settings.build_type,
                &env,
            );
        }
        artifacts = package::assemble(&plan, &config.package_dir)?;
        for artifact in &artifacts {
            eventlog::append_event(
                &config.work_dir,
                RecipeEvent::ArtifactPackaged {
                    path: artifact.path.clone(),
                    hash: artifact.hash.clone(),
                },
            )?;
        }
        Ok(())
    })?;

    let libraries = package::library_names(recipe, config.settings.build_type);
    let total_duration = started.elapsed();

    eventlog::append_event(
        &config.work_dir,
        RecipeEvent::RunCompleted {
            run_id,
            libraries: libraries.clone(),
            total_seconds: total_duration.as_secs_f64(),
        },
    )?;

    Ok(RunReport {
        recipe: recipe.name.clone(),
        package_version: recipe.package_version.clone(),
        stages,
        libraries,
        artifacts,
        total_duration,
    })
}

/// Environment overlay for external build invocations: the recipe's extra
/// variables, applied to child processes only.
fn build_env(recipe: &RecipeConfig) -> EnvOverlay {
    let mut env = EnvOverlay::new();
    env.extend(recipe.env.iter().map(|(k, v)| (k.clone(), v.clone())));
    env
}

fn run_stage<F>(
    work_dir: &Path,
    stage: Stage,
    stages: &mut Vec<StageReport>,
    f: F,
) -> Result<(), String>
where
    F: FnOnce() -> Result<(), String>,
{
    eventlog::append_event(
        work_dir,
        RecipeEvent::StageStarted {
            stage: stage.to_string(),
        },
    )?;
    let start = Instant::now();

    match f() {
        Ok(()) => {
            let duration_seconds = start.elapsed().as_secs_f64();
            eventlog::append_event(
                work_dir,
                RecipeEvent::StageCompleted {
                    stage: stage.to_string(),
                    duration_seconds,
                },
            )?;
            stages.push(StageReport {
                stage,
                duration_seconds,
            });
            Ok(())
        }
        Err(error) => {
            eventlog::append_event(
                work_dir,
                RecipeEvent::StageFailed {
                    stage: stage.to_string(),
                    error: error.clone(),
                },
            )?;
            Err(format!("{} stage failed: {}", stage, error))
        }
    }
}
