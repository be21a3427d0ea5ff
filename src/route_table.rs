//! Route table ingestion.
//!
//! A host framework's route table maps route keys (`"[VERB ]/path/:param"`)
//! to either a structured route entry or an opaque handler reference. Each
//! key is classified once, when the table is ingested, into a
//! [`RouteTarget`]; later stages never re-inspect the raw value.
//!
//! A route entry is documentable when it carries a `swagger` (or `apiSpec`)
//! object:
//!
//! ```json
//! {
//!   "post /api/pets/:id": {
//!     "controller": "PetController",
//!     "action": "update",
//!     "swagger": { "summary": "Update a pet", "responses": { "200": { "description": "OK" } } }
//!   },
//!   "get /health": "HealthController.check"
//! }
//! ```

use crate::config::read_structured;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Framework-internal routes that are never documented
pub const SYSTEM_ROUTES: [&str; 4] = ["/*", "/__getcookie", "/csrfToken", "/csrftoken"];

/// Keys under which a route entry may carry its documentation fragment
const SPEC_KEYS: [&str; 2] = ["swagger", "apiSpec"];

/// What a route key points at, resolved once on ingestion
#[derive(Debug, Clone, PartialEq)]
pub enum RouteTarget {
    /// Framework-internal utility route
    System,
    /// Route without a usable documentation fragment
    HandlerOnly,
    /// Route carrying a documentation fragment
    Documented(RouteEntry),
}

/// A documentable route entry
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry {
    /// Logical owner of the route, used as the fallback tag
    pub controller: String,
    pub action: Option<String>,
    pub spec: RouteSpec,
}

/// The per-route documentation fragment.
///
/// `tags` and `project` are pulled out for the translator; every other field
/// (summary, parameters, responses, ...) is kept verbatim and in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Sub-project this route belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RouteSpec {
    /// True when the fragment declares at least one tag
    pub fn has_tags(&self) -> bool {
        self.tags.as_ref().is_some_and(|tags| !tags.is_empty())
    }

    /// Whether this route belongs to `project`, ignoring case
    pub fn belongs_to(&self, project: &str) -> bool {
        self.project
            .as_deref()
            .is_some_and(|own| own.to_lowercase() == project.to_lowercase())
    }
}

/// An ordered route table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteTable {
    routes: IndexMap<String, RouteTarget>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingests a raw route table. The top-level value must be an object.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(raw) = value else {
            return Err(Error::Configuration(
                "route table must be an object mapping route keys to handlers".to_string(),
            ));
        };

        let mut table = RouteTable::new();
        for (key, handler) in raw {
            let target = classify(key, handler);
            table.insert(key.clone(), target);
        }

        debug!(
            "Ingested {} routes ({} documented)",
            table.len(),
            table.documented().count()
        );
        Ok(table)
    }

    /// Loads a route table from a JSON or YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let value: Value = read_structured(path)?;
        Self::from_value(&value)
    }

    /// Adds an already classified route, replacing any previous target for `key`
    pub fn insert(&mut self, key: impl Into<String>, target: RouteTarget) {
        self.routes.insert(key.into(), target);
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RouteTarget)> {
        self.routes.iter().map(|(key, target)| (key.as_str(), target))
    }

    /// Documented routes, in table order
    pub fn documented(&self) -> impl Iterator<Item = (&str, &RouteEntry)> {
        self.iter().filter_map(|(key, target)| match target {
            RouteTarget::Documented(entry) => Some((key, entry)),
            _ => None,
        })
    }
}

/// Whether `key` is a framework-internal route that is never documented
pub fn is_system_route(key: &str) -> bool {
    SYSTEM_ROUTES.contains(&key)
}

fn classify(key: &str, handler: &Value) -> RouteTarget {
    if is_system_route(key) {
        return RouteTarget::System;
    }

    let Value::Object(entry) = handler else {
        return RouteTarget::HandlerOnly;
    };

    let Some(raw_spec) = SPEC_KEYS.iter().find_map(|k| entry.get(*k)) else {
        return RouteTarget::HandlerOnly;
    };
    if !raw_spec.is_object() {
        debug!("Route '{}' has a non-object documentation fragment, ignoring", key);
        return RouteTarget::HandlerOnly;
    }

    let spec: RouteSpec = match serde_json::from_value(raw_spec.clone()) {
        Ok(spec) => spec,
        Err(e) => {
            warn!("Route '{}' has a malformed documentation fragment: {}", key, e);
            return RouteTarget::HandlerOnly;
        }
    };

    RouteTarget::Documented(RouteEntry {
        controller: entry
            .get("controller")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        action: entry.get("action").and_then(Value::as_str).map(str::to_string),
        spec,
    })
}
