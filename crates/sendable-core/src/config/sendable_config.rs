//! Configuration types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::SendableError;
use crate::result::Result;

/// Root of a configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SendableConfiguration {
    /// JSON schema reference, ignored by the tool
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    #[schemars(description = "JSON schema reference")]
    pub schema: Option<String>,

    /// File discovery configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Which Swift files to process")]
    pub files: Option<FilesConfiguration>,

    /// Rewrite configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "What the rewrite passes add")]
    pub rewrite: Option<RewriteConfiguration>,
}

/// Files configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FilesConfiguration {
    /// Glob patterns to include, relative to each root
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Glob patterns for files to include")]
    pub include: Option<Vec<String>>,

    /// Glob patterns to exclude, relative to each root
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Glob patterns for files to exclude")]
    pub exclude: Option<Vec<String>>,
}

/// A rewrite pass that can be listed in `rewrite.passes`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PassKind {
    /// `@unchecked` marker on classes with mutable stored state
    Unchecked,
    /// Plain marker on public value types (and protocols when enabled)
    Marker,
    /// Plain marker on classes without mutable stored state
    ImmutableClasses,
    /// Final modifier on classes that carry the plain marker
    Final,
}

impl PassKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unchecked => "unchecked",
            Self::Marker => "marker",
            Self::ImmutableClasses => "immutable-classes",
            Self::Final => "final",
        }
    }
}

impl std::fmt::Display for PassKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rewrite configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RewriteConfiguration {
    /// Conformance added to declarations
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Conformance added to declarations (default: Sendable)")]
    pub marker: Option<String>,

    /// Attribute wrapping the marker in the unchecked pass
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Attribute used by the unchecked pass (default: unchecked)")]
    pub unchecked_attribute: Option<String>,

    /// Modifier added by the final pass
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Modifier added by the final pass (default: final)")]
    pub final_modifier: Option<String>,

    /// Visibility modifiers that make a value type eligible
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Visibility modifiers that make a value type eligible (default: public, open)")]
    pub visibility: Option<Vec<String>>,

    /// Also add the marker to protocols
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Add the marker to eligible protocols as a requirement")]
    pub protocols: Option<bool>,

    /// Passes to run, in order
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Passes to run, in order (default: unchecked, marker, final)")]
    pub passes: Option<Vec<PassKind>>,
}

const VISIBILITY_MODIFIERS: &[&str] = &["public", "open", "package", "internal", "fileprivate", "private"];

impl RewriteConfiguration {
    pub fn marker(&self) -> &str {
        self.marker.as_deref().unwrap_or("Sendable")
    }

    pub fn unchecked_attribute(&self) -> &str {
        self.unchecked_attribute.as_deref().unwrap_or("unchecked")
    }

    pub fn final_modifier(&self) -> &str {
        self.final_modifier.as_deref().unwrap_or("final")
    }

    pub fn visibility(&self) -> Vec<String> {
        self.visibility
            .clone()
            .unwrap_or_else(|| vec!["public".to_string(), "open".to_string()])
    }

    pub fn protocols(&self) -> bool {
        self.protocols.unwrap_or(false)
    }

    pub fn passes(&self) -> Vec<PassKind> {
        self.passes
            .clone()
            .unwrap_or_else(|| vec![PassKind::Unchecked, PassKind::Marker, PassKind::Final])
    }
}

impl SendableConfiguration {
    /// Load configuration from a `.toml` or `.json` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| SendableError::io_error(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => toml::from_str(&content).map_err(|e| {
                SendableError::config_error(format!("{}: {e}", path.display()))
            })?,
            Some("json") => serde_json::from_str(&content).map_err(|e| {
                SendableError::config_error(format!("{}: {e}", path.display()))
            })?,
            _ => {
                return Err(SendableError::config_error(format!(
                    "{}: unsupported file extension (expected .toml or .json)",
                    path.display()
                )));
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| SendableError::config_error(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn files_config(&self) -> FilesConfiguration {
        self.files.clone().unwrap_or_default()
    }

    pub fn rewrite_config(&self) -> RewriteConfiguration {
        self.rewrite.clone().unwrap_or_default()
    }

    /// Reject values the rewrite passes cannot use
    pub fn validate(&self) -> Result<()> {
        let rewrite = self.rewrite_config();
        for (field, value) in [
            ("marker", rewrite.marker()),
            ("uncheckedAttribute", rewrite.unchecked_attribute()),
            ("finalModifier", rewrite.final_modifier()),
        ] {
            if !is_identifier(value) {
                return Err(SendableError::config_error(format!(
                    "rewrite.{field} must be an identifier, got '{value}'"
                )));
            }
        }
        for visibility in rewrite.visibility() {
            if !VISIBILITY_MODIFIERS.contains(&visibility.as_str()) {
                return Err(SendableError::config_error(format!(
                    "rewrite.visibility: unknown visibility modifier '{visibility}'"
                )));
            }
        }
        let passes = rewrite.passes();
        if passes.is_empty() {
            return Err(SendableError::config_error("rewrite.passes must not be empty"));
        }
        for (i, pass) in passes.iter().enumerate() {
            if passes[..i].contains(pass) {
                return Err(SendableError::config_error(format!(
                    "rewrite.passes lists '{pass}' more than once"
                )));
            }
        }
        let files = self.files_config();
        for pattern in files.include.iter().chain(&files.exclude).flatten() {
            glob::Pattern::new(pattern).map_err(|e| {
                SendableError::config_error(format!("invalid glob pattern '{pattern}': {e}"))
            })?;
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SendableError::config_error(e.to_string()))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SendableError::config_error(e.to_string()))
    }

    /// Configuration with every default spelled out, used by `config init`
    pub fn documented_defaults() -> Self {
        let rewrite = RewriteConfiguration::default();
        Self {
            schema: None,
            files: Some(FilesConfiguration {
                include: Some(vec!["**/*.swift".to_string()]),
                exclude: Some(Vec::new()),
            }),
            rewrite: Some(RewriteConfiguration {
                marker: Some(rewrite.marker().to_string()),
                unchecked_attribute: Some(rewrite.unchecked_attribute().to_string()),
                final_modifier: Some(rewrite.final_modifier().to_string()),
                visibility: Some(rewrite.visibility()),
                protocols: Some(rewrite.protocols()),
                passes: Some(rewrite.passes()),
            }),
        }
    }

    /// JSON schema of the configuration file
    pub fn json_schema() -> Result<String> {
        let schema = schemars::schema_for!(SendableConfiguration);
        serde_json::to_string_pretty(&schema).map_err(|e| SendableError::config_error(e.to_string()))
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let rewrite = RewriteConfiguration::default();
        assert_eq!(rewrite.marker(), "Sendable");
        assert_eq!(rewrite.unchecked_attribute(), "unchecked");
        assert_eq!(rewrite.final_modifier(), "final");
        assert_eq!(rewrite.visibility(), vec!["public", "open"]);
        assert!(!rewrite.protocols());
        assert_eq!(
            rewrite.passes(),
            vec![PassKind::Unchecked, PassKind::Marker, PassKind::Final]
        );
    }

    #[test]
    fn test_toml_parsing() {
        let config = SendableConfiguration::from_toml_str(
            r#"
            [files]
            exclude = ["**/Generated/**"]

            [rewrite]
            protocols = true
            uncheckedAttribute = "unchecked"
            passes = ["unchecked", "marker", "immutable-classes", "final"]
            "#,
        )
        .unwrap();
        let rewrite = config.rewrite_config();
        assert!(rewrite.protocols());
        assert_eq!(rewrite.passes()[2], PassKind::ImmutableClasses);
        assert_eq!(
            config.files_config().exclude.unwrap(),
            vec!["**/Generated/**".to_string()]
        );
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let err = SendableConfiguration::from_toml_str("[rewrite]\nmarkr = \"Sendable\"\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_validation() {
        for content in [
            "[rewrite]\nmarker = \"Send able\"\n",
            "[rewrite]\nvisibility = [\"exported\"]\n",
            "[rewrite]\npasses = []\n",
            "[rewrite]\npasses = [\"final\", \"final\"]\n",
            "[files]\ninclude = [\"[\"]\n",
        ] {
            assert!(
                SendableConfiguration::from_toml_str(content).is_err(),
                "accepted {content:?}"
            );
        }
    }

    #[test]
    fn test_documented_defaults_round_trip_through_toml() {
        let config = SendableConfiguration::documented_defaults();
        let text = config.to_toml_string().unwrap();
        assert_eq!(SendableConfiguration::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_json_schema_names_sections() {
        let schema = SendableConfiguration::json_schema().unwrap();
        assert!(schema.contains("\"files\""));
        assert!(schema.contains("\"rewrite\""));
        assert!(schema.contains("immutable-classes"));
    }
}
