//! Option translation — recipe options become build-system variables.
//!
//! Booleans render as the ON/OFF tokens the external toolchain expects;
//! everything else is stringified. Unknown options pass through unchanged.

use super::platform::{BuildSettings, TargetClass, CROSS_TARGET};
use super::types::{OptionValue, RecipeConfig};
use indexmap::IndexMap;

/// Cargo flags required by the constrained cross build.
pub const CONSTRAINED_CARGO_FLAGS: &str = "-Z build-std=panic_abort,std";

/// Toolchain channel the constrained cross build is pinned to.
pub const CONSTRAINED_CHANNEL: &str = "nightly";

/// Render one option value as a variable string.
pub fn render_value(value: &OptionValue) -> String {
    match value {
        OptionValue::Bool(true) => "ON".to_string(),
        OptionValue::Bool(false) => "OFF".to_string(),
        OptionValue::Int(n) => n.to_string(),
        OptionValue::Str(s) => s.clone(),
    }
}

/// Translate the recipe's option set into build-system cache variables for
/// the given target. The constrained path overrides with its fixed
/// cross-build variables; shared memory is unavailable there.
pub fn cache_variables(
    recipe: &RecipeConfig,
    settings: &BuildSettings,
    target: TargetClass,
) -> IndexMap<String, String> {
    let mut vars: IndexMap<String, String> = IndexMap::new();

    for (name, value) in &recipe.options {
        vars.insert(name.clone(), render_value(value));
    }

    vars.insert(
        "CMAKE_BUILD_TYPE".to_string(),
        settings.build_type.as_str().to_string(),
    );

    if target.is_constrained() {
        vars.insert(
            "ZENOHC_CARGO_CHANNEL".to_string(),
            CONSTRAINED_CHANNEL.to_string(),
        );
        vars.insert("ZENOHC_CUSTOM_TARGET".to_string(), CROSS_TARGET.to_string());
        vars.insert(
            "ZENOHC_CARGO_FLAGS".to_string(),
            CONSTRAINED_CARGO_FLAGS.to_string(),
        );
        vars.insert(
            "ZENOHC_BUILD_WITH_SHARED_MEMORY".to_string(),
            "OFF".to_string(),
        );
    }

    vars
}
