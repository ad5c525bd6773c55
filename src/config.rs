//! Configuration for the RAP tooling
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (rap.toml, .rap.toml, config/rap.toml)
//! - The user config directory
//! - An explicit `--config` file
//! - Environment variables (RAP__SECTION__KEY)
//!
//! ## Example config file (rap.toml):
//! ```toml
//! [output]
//! schemas_dir = "schemas/v1"
//! format = "pretty"
//!
//! [validation]
//! instances_dir = "samples"
//! extensions = ["jsonld"]
//! default_kind = "research-product"
//! populate_by_name = false
//!
//! [policy]
//! closed_entities = ["ResearchProduct"]
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RapError, Result};
use crate::schema::SchemaKind;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RapConfig {
    /// Schema output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Instance validation settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Closed-object policy shared by projector and validator
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Where and how generated schemas are written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_schemas_dir")]
    pub schemas_dir: PathBuf,

    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

/// Instance discovery and validation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Directory scanned recursively for instance documents
    #[serde(default = "default_instances_dir")]
    pub instances_dir: PathBuf,

    /// File extensions treated as instance documents (without the dot)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Kind every discovered instance is validated as
    #[serde(default = "default_kind")]
    pub default_kind: SchemaKind,

    /// Also accept internal snake_case field names on input
    #[serde(default)]
    pub populate_by_name: bool,
}

/// Which entities reject unknown top-level fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_closed_entities")]
    pub closed_entities: Vec<String>,
}

// Default value functions
fn default_schemas_dir() -> PathBuf {
    PathBuf::from("schemas/v1")
}

fn default_instances_dir() -> PathBuf {
    PathBuf::from("samples")
}

fn default_extensions() -> Vec<String> {
    vec!["jsonld".to_string()]
}

fn default_kind() -> SchemaKind {
    SchemaKind::ResearchProduct
}

fn default_closed_entities() -> Vec<String> {
    vec!["ResearchProduct".to_string()]
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            schemas_dir: default_schemas_dir(),
            format: OutputFormat::Pretty,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            instances_dir: default_instances_dir(),
            extensions: default_extensions(),
            default_kind: default_kind(),
            populate_by_name: false,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            closed_entities: default_closed_entities(),
        }
    }
}

impl PolicyConfig {
    /// A policy under which every entity stays open
    pub fn open() -> Self {
        Self { closed_entities: Vec::new() }
    }

    /// Whether `definition` rejects unknown top-level fields
    pub fn is_closed(&self, definition: &str) -> bool {
        self.closed_entities.iter().any(|name| name == definition)
    }
}

impl ValidationConfig {
    /// Whether `path` has one of the configured instance extensions
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.trim_start_matches('.') == ext))
    }
}

impl RapConfig {
    /// Load configuration from the default locations, layering an explicit
    /// file (when given) and `RAP__*` environment variables on top
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = ["rap.toml", ".rap.toml", "config/rap.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("io", "evidencepub", "rap") {
            let xdg_config = config_dir.config_dir().join("rap.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        // Load from environment variables (RAP__*)
        builder = builder.add_source(
            Environment::with_prefix("RAP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("validation.extensions")
                .with_list_parse_key("policy.closed_entities"),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| RapError::Config(config_crate::ConfigError::Message(e.to_string())))
    }
}
