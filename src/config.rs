//! Generator configuration: package metadata, global document sections and
//! the list of sub-projects that each get their own document.
//!
//! Configuration files may be written as JSON (`.json`) or YAML (`.yaml` /
//! `.yml`). Keys use the camelCase names of the Swagger document they feed,
//! e.g. `securityDefinitions`, `externalDocs`, `docsFolder`.

use crate::error::{Error, Result};
use crate::openapi_builder::{ExternalDocs, Info};
use crate::tags::Tag;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Host used when the configuration does not name one
pub const DEFAULT_HOST: &str = "localhost:8080";

/// Top-level generator configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwaggerConfig {
    /// Package manifest record, source of the `info` section (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<PackageMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Authoritative tags, emitted before any derived tag
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub definitions: Map<String, Value>,
    #[serde(default)]
    pub security_definitions: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    /// Sub-projects, in declaration order
    #[serde(default)]
    pub projects: Vec<ProjectConfig>,
    /// Enables on-disk publication when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_folder: Option<PathBuf>,
}

/// A named sub-project with optional `info` overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,
}

/// The subset of a package manifest used to build the `info` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

/// Package author, either a bare string or a person record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Name(String),
    Person {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

impl Author {
    pub fn name(&self) -> &str {
        match self {
            Author::Name(name) => name,
            Author::Person { name, .. } => name,
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            Author::Name(_) => None,
            Author::Person { email, .. } => email.as_deref(),
        }
    }
}

impl SwaggerConfig {
    /// Loads a configuration from a JSON or YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: SwaggerConfig = read_structured(path)?;
        debug!(
            "Loaded configuration from {} ({} project(s))",
            path.display(),
            config.projects.len()
        );
        Ok(config)
    }

    /// Overrides the docs folder, e.g. from the command line
    pub fn with_docs_folder(mut self, folder: PathBuf) -> Self {
        self.docs_folder = Some(folder);
        self
    }

    /// The configured host, or [`DEFAULT_HOST`]
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }
}

/// Reads a JSON or YAML file into `T`, choosing the format by extension.
///
/// Files without a recognised extension are parsed as YAML, which also
/// accepts plain JSON.
pub(crate) fn read_structured<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::Configuration(format!("cannot read {}: {}", path.display(), e))
    })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("json") => Ok(serde_json::from_str(&content)?),
        _ => Ok(serde_yaml::from_str(&content)?),
    }
}
