//! All types of the recipe schema and the pipeline.
//!
//! Defines the YAML schema for empaque.yaml (the recipe), the pipeline
//! stages, run reports, and provenance events. Schema types derive
//! Serialize/Deserialize for YAML roundtripping.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Top-level empaque.yaml
// ============================================================================

/// Root recipe — everything needed to fetch, build, and package one version
/// of one external library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeConfig {
    /// Schema version (must be "1.0")
    pub version: String,

    /// Recipe name (e.g. "zenoh-c")
    pub name: String,

    /// Version of the library being packaged
    pub package_version: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Produced library base name (e.g. "zenohc")
    pub library: String,

    /// Suffix appended to the library name in debug builds
    #[serde(default = "default_debug_suffix")]
    pub debug_suffix: String,

    /// Where the source tree comes from
    pub source: SourceSpec,

    /// Build options, translated into build-system variables (order-preserving)
    #[serde(default)]
    pub options: IndexMap<String, OptionValue>,

    /// Extra environment variables for build invocations
    #[serde(default)]
    pub env: IndexMap<String, String>,
}

fn default_debug_suffix() -> String {
    "d".to_string()
}

impl RecipeConfig {
    /// Revision the source stage checks out. Falls back to the package
    /// version when the recipe does not pin an explicit reference.
    pub fn source_reference(&self) -> &str {
        self.source
            .reference
            .as_deref()
            .unwrap_or(&self.package_version)
    }
}

/// Source location — repository URL plus pinned revision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Git repository URL
    pub url: String,

    /// Commit, tag, or branch to check out (default: package_version)
    #[serde(default)]
    pub reference: Option<String>,
}

/// A build option value — bool, integer, or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

// ============================================================================
// Pipeline stages
// ============================================================================

/// A pipeline stage. Each invocation runs a strictly linear sequence of
/// these; exactly one of Patch / Configure appears, depending on the
/// target class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Patch,
    Configure,
    Build,
    Package,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch"),
            Self::Patch => write!(f, "patch"),
            Self::Configure => write!(f, "configure"),
            Self::Build => write!(f, "build"),
            Self::Package => write!(f, "package"),
        }
    }
}

/// Timing record for one completed stage.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: Stage,
    pub duration_seconds: f64,
}

/// A packaged artifact with its content hash.
#[derive(Debug, Clone)]
pub struct ArtifactRecord {
    /// Path relative to the package folder
    pub path: String,

    /// BLAKE3 hash of the copied file
    pub hash: String,
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub recipe: String,
    pub package_version: String,
    pub stages: Vec<StageReport>,
    pub libraries: Vec<String>,
    pub artifacts: Vec<ArtifactRecord>,
    pub total_duration: std::time::Duration,
}

// ============================================================================
// Provenance events
// ============================================================================

/// Provenance event for the JSONL event log in the working folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RecipeEvent {
    RunStarted {
        recipe: String,
        package_version: String,
        run_id: String,
        empaque_version: String,
    },
    StageStarted {
        stage: String,
    },
    StageCompleted {
        stage: String,
        duration_seconds: f64,
    },
    StageFailed {
        stage: String,
        error: String,
    },
    ArtifactPackaged {
        path: String,
        hash: String,
    },
    RunCompleted {
        run_id: String,
        libraries: Vec<String>,
        total_seconds: f64,
    },
}

/// Timestamped event wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimestampedEvent {
    pub ts: String,
    #[serde(flatten)]
    pub event: RecipeEvent,
}

// ============================================================================
// Tests
// ============================================================================
