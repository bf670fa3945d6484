//! CLI subcommands — init, validate, plan, run, info.

use crate::core::platform::{Arch, BuildSettings, BuildType, Os, TargetClass};
use crate::core::types::RunReport;
use crate::core::{executor, options, parser, types};
use crate::package;
use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new recipe
    Init {
        /// Directory to initialize (default: current)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Validate empaque.yaml without running anything
    Validate {
        /// Path to empaque.yaml
        #[arg(short, long, default_value = "empaque.yaml")]
        file: PathBuf,
    },

    /// Show the stage sequence and build variables for a target
    Plan {
        /// Path to empaque.yaml
        #[arg(short, long, default_value = "empaque.yaml")]
        file: PathBuf,

        /// Target OS (default: host)
        #[arg(long)]
        os: Option<String>,

        /// Target architecture (default: host)
        #[arg(long)]
        arch: Option<String>,

        /// Build type: release or debug
        #[arg(long)]
        build_type: Option<String>,
    },

    /// Fetch, build, and package the recipe
    Run {
        /// Path to empaque.yaml
        #[arg(short, long, default_value = "empaque.yaml")]
        file: PathBuf,

        /// Target OS (default: host)
        #[arg(long)]
        os: Option<String>,

        /// Target architecture (default: host)
        #[arg(long)]
        arch: Option<String>,

        /// Build type: release or debug
        #[arg(long)]
        build_type: Option<String>,

        /// Working directory for checkout, build tree, and event log
        #[arg(long, default_value = "work")]
        work_dir: PathBuf,

        /// Destination of the package layout
        #[arg(long, default_value = "package")]
        package_dir: PathBuf,

        /// Reuse an existing checkout in the working directory
        #[arg(long)]
        skip_fetch: bool,

        /// Show the stage sequence and library names without executing
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the library names consumers link against
    Info {
        /// Path to empaque.yaml
        #[arg(short, long, default_value = "empaque.yaml")]
        file: PathBuf,

        /// Build type: release or debug
        #[arg(long)]
        build_type: Option<String>,
    },
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<(), String> {
    match cmd {
        Commands::Init { path } => cmd_init(&path),
        Commands::Validate { file } => cmd_validate(&file),
        Commands::Plan {
            file,
            os,
            arch,
            build_type,
        } => {
            let settings =
                resolve_settings(os.as_deref(), arch.as_deref(), build_type.as_deref())?;
            cmd_plan(&file, &settings)
        }
        Commands::Run {
            file,
            os,
            arch,
            build_type,
            work_dir,
            package_dir,
            skip_fetch,
            dry_run,
        } => {
            let settings =
                resolve_settings(os.as_deref(), arch.as_deref(), build_type.as_deref())?;
            cmd_run(&file, &settings, work_dir, package_dir, skip_fetch, dry_run)
        }
        Commands::Info { file, build_type } => {
            let settings = resolve_settings(None, None, build_type.as_deref())?;
            cmd_info(&file, settings.build_type)
        }
    }
}

/// Host settings with per-flag overrides applied.
fn resolve_settings(
    os: Option<&str>,
    arch: Option<&str>,
    build_type: Option<&str>,
) -> Result<BuildSettings, String> {
    let mut settings = BuildSettings::from_host()?;
    if let Some(s) = os {
        settings.os = Os::parse(s)?;
    }
    if let Some(s) = arch {
        settings.arch = Arch::parse(s)?;
    }
    if let Some(s) = build_type {
        settings.build_type = BuildType::parse(s)?;
    }
    Ok(settings)
}

fn cmd_init(path: &Path) -> Result<(), String> {
    let recipe_path = path.join("empaque.yaml");
    if recipe_path.exists() {
        return Err(format!("{} already exists", recipe_path.display()));
    }

    let template = r#"version: "1.0"
name: zenoh-c
description: "Managed by empaque"
package_version: "0.10.1-rc"
library: zenohc

source:
  url: https://github.com/eclipse-zenoh/zenoh-c.git

options:
  ZENOHC_BUILD_WITH_SHARED_MEMORY: true
  BUILD_SHARED_LIBS: true

env: {}
"#;
    std::fs::write(&recipe_path, template)
        .map_err(|e| format!("cannot write {}: {}", recipe_path.display(), e))?;

    println!("Initialized recipe at {}", recipe_path.display());
    Ok(())
}

fn cmd_validate(file: &Path) -> Result<(), String> {
    let recipe = parser::parse_recipe_file(file)?;
    let errors = parser::validate_recipe(&recipe);

    if errors.is_empty() {
        println!(
            "OK: {} {} ({} options)",
            recipe.name,
            recipe.package_version,
            recipe.options.len()
        );
        Ok(())
    } else {
        for e in &errors {
            eprintln!("  ERROR: {}", e);
        }
        Err(format!("{} validation error(s)", errors.len()))
    }
}

/// Parse and validate a recipe file, returning errors if invalid.
fn parse_and_validate(file: &Path) -> Result<types::RecipeConfig, String> {
    let recipe = parser::parse_recipe_file(file)?;
    let errors = parser::validate_recipe(&recipe);
    if errors.is_empty() {
        return Ok(recipe);
    }
    for e in &errors {
        eprintln!("  ERROR: {}", e);
    }
    Err("validation failed".to_string())
}

fn cmd_plan(file: &Path, settings: &BuildSettings) -> Result<(), String> {
    let recipe = parse_and_validate(file)?;
    let target = TargetClass::classify(settings)?;

    println!(
        "Planning: {} {} on {} ({})",
        recipe.name, recipe.package_version, settings, target
    );
    println!();

    println!("Stages:");
    for stage in executor::stage_sequence(target) {
        println!("  {}", stage);
    }
    println!();

    if target.is_constrained() {
        println!(
            "Build: direct cargo cross build ({} channel, target {})",
            options::CONSTRAINED_CHANNEL,
            crate::core::platform::CROSS_TARGET
        );
    } else {
        println!("Build variables:");
        for (name, value) in options::cache_variables(&recipe, settings, target) {
            println!("  {} = {}", name, value);
        }
    }
    println!();

    println!(
        "Libraries: {}",
        package::library_names(&recipe, settings.build_type).join(", ")
    );
    Ok(())
}

fn cmd_run(
    file: &Path,
    settings: &BuildSettings,
    work_dir: PathBuf,
    package_dir: PathBuf,
    skip_fetch: bool,
    dry_run: bool,
) -> Result<(), String> {
    let recipe = parse_and_validate(file)?;

    println!(
        "Running: {} {} on {}",
        recipe.name, recipe.package_version, settings
    );

    let config = executor::RunConfig {
        recipe,
        settings: *settings,
        work_dir,
        package_dir,
        skip_fetch,
        dry_run,
    };
    let report = executor::run(&config)?;

    if dry_run {
        println!("Dry run — stages:");
        for stage in &report.stages {
            println!("  {}", stage.stage);
        }
        println!("Libraries: {}", report.libraries.join(", "));
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &RunReport) {
    for stage in &report.stages {
        println!("  {}: {:.1}s", stage.stage, stage.duration_seconds);
    }
    println!();
    println!(
        "Run complete: {} {} — libraries [{}], {} artifact(s) ({:.1}s)",
        report.recipe,
        report.package_version,
        report.libraries.join(", "),
        report.artifacts.len(),
        report.total_duration.as_secs_f64()
    );
}

fn cmd_info(file: &Path, build_type: BuildType) -> Result<(), String> {
    let recipe = parse_and_validate(file)?;

    println!("Recipe: {} {}", recipe.name, recipe.package_version);
    if let Some(description) = &recipe.description {
        println!("  {}", description);
    }
    println!("  Source: {} @ {}", recipe.source.url, recipe.source_reference());
    println!(
        "  Libraries ({}): {}",
        build_type,
        package::library_names(&recipe, build_type).join(", ")
    );
    Ok(())
}
