//! Recipe parsing and validation.
//!
//! Parses empaque.yaml and validates structural constraints:
//! - Schema version must be "1.0"
//! - name, package_version, library, and source.url must be non-empty

use super::types::RecipeConfig;
use std::path::Path;

/// Validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Parse an empaque.yaml file from disk.
pub fn parse_recipe_file(path: &Path) -> Result<RecipeConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    parse_recipe(&content)
}

/// Parse an empaque.yaml from a string.
pub fn parse_recipe(yaml: &str) -> Result<RecipeConfig, String> {
    serde_yaml_ng::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))
}

/// Validate a parsed recipe. Returns a list of errors (empty = valid).
pub fn validate_recipe(recipe: &RecipeConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if recipe.version != "1.0" {
        errors.push(ValidationError {
            message: format!("version must be \"1.0\", got \"{}\"", recipe.version),
        });
    }

    if recipe.name.is_empty() {
        errors.push(ValidationError {
            message: "name must not be empty".to_string(),
        });
    }

    if recipe.package_version.is_empty() {
        errors.push(ValidationError {
            message: "package_version must not be empty".to_string(),
        });
    }

    if recipe.library.is_empty() {
        errors.push(ValidationError {
            message: "library must not be empty".to_string(),
        });
    }

    if recipe.source.url.is_empty() {
        errors.push(ValidationError {
            message: "source.url must not be empty".to_string(),
        });
    }

    if let Some(ref reference) = recipe.source.reference {
        if reference.is_empty() {
            errors.push(ValidationError {
                message: "source.reference must not be empty when set".to_string(),
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_YAML: &str = r#"
version: "1.0"
name: zenoh-c
package_version: "0.10.1-rc"
library: zenohc
source:
  url: https://github.com/eclipse-zenoh/zenoh-c.git
options:
  ZENOHC_BUILD_WITH_SHARED_MEMORY: true
"#;

    #[test]
    fn test_parse_valid() {
        let recipe = parse_recipe(VALID_YAML).unwrap();
        assert_eq!(recipe.name, "zenoh-c");
        let errors = validate_recipe(&recipe);
        assert!(
            errors.is_empty(),
            "unexpected errors: {:?}",
            errors.iter().map(|e| &e.message).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_bad_schema_version() {
        let yaml = VALID_YAML.replace("version: \"1.0\"", "version: \"2.0\"");
        let recipe = parse_recipe(&yaml).unwrap();
        let errors = validate_recipe(&recipe);
        assert!(errors.iter().any(|e| e.message.contains("version")));
    }

    #[test]
    fn test_empty_library() {
        let yaml = VALID_YAML.replace("library: zenohc", "library: \"\"");
        let recipe = parse_recipe(&yaml).unwrap();
        let errors = validate_recipe(&recipe);
        assert!(errors.iter().any(|e| e.message.contains("library")));
    }

    #[test]
    fn test_empty_url() {
        let yaml = r#"
version: "1.0"
name: zenoh-c
package_version: "0.10.1-rc"
library: zenohc
source:
  url: ""
"#;
        let recipe = parse_recipe(yaml).unwrap();
        let errors = validate_recipe(&recipe);
        assert!(errors.iter().any(|e| e.message.contains("source.url")));
    }

    #[test]
    fn test_empty_explicit_reference() {
        let yaml = r#"
version: "1.0"
name: zenoh-c
package_version: "0.10.1-rc"
library: zenohc
source:
  url: https://github.com/eclipse-zenoh/zenoh-c.git
  reference: ""
"#;
        let recipe = parse_recipe(yaml).unwrap();
        let errors = validate_recipe(&recipe);
        assert!(errors.iter().any(|e| e.message.contains("source.reference")));
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empaque.yaml");
        std::fs::write(&path, VALID_YAML).unwrap();
        let recipe = parse_recipe_file(&path).unwrap();
        assert_eq!(recipe.package_version, "0.10.1-rc");
    }

    #[test]
    fn test_parse_missing_file() {
        let result = parse_recipe_file(Path::new("/nonexistent/empaque.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = parse_recipe("not: [valid: yaml: {{");
        assert!(result.is_err());
    }
}
