//! Route-to-path translation.
//!
//! Turns the documented entries of a [`RouteTable`] into Swagger path items:
//! the HTTP verb is read from the route key, `:param` placeholders become
//! `{param}`, routes without tags are tagged with their controller name, and
//! two routes that land on the same path and verb abort the translation.

use crate::error::{Error, Result};
use crate::openapi_builder::{Operation, PathItem};
use crate::route_table::{is_system_route, RouteTable};
use crate::tags::{Tag, TagSet};
use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Leading verb token followed by whitespace and a non-blank remainder
static VERB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(options|get|head|post|put|patch|delete|trace)\s+(\S.*)$")
        .expect("verb pattern is valid")
});

/// `:name` and `:name?` path parameters
static PATH_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(\w+)\??").expect("path parameter pattern is valid"));

/// HTTP methods that can key a Swagger path item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Trace,
    ];

    /// Lower-case name, as used for path item keys
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Trace => "trace",
        }
    }

    /// Parses a verb, ignoring case
    pub fn parse(verb: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(verb))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a translation pass
#[derive(Debug, Clone, Default)]
pub struct Translation {
    /// Path template -> path item, in route table order
    pub paths: IndexMap<String, PathItem>,
    /// Tags derived from controller names, one per controller
    pub tags: Vec<Tag>,
}

/// Splits a route key into its verb and path.
///
/// Keys without a leading verb token default to `GET`. The verb must be a
/// whole token followed by whitespace and a non-blank path, so `post/x`,
/// `post ` and a bare `post` are all read as `GET` paths rather than `POST`
/// routes with a glued or empty path.
pub fn split_route_key(key: &str) -> (HttpMethod, &str) {
    if let Some(caps) = VERB_RE.captures(key) {
        let verb = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        if let (Some(method), Some(path)) = (HttpMethod::parse(verb), caps.get(2)) {
            return (method, path.as_str());
        }
    }
    (HttpMethod::Get, key)
}

/// Rewrites `:name` and `:name?` placeholders to `{name}`
pub fn to_path_template(path: &str) -> String {
    PATH_PARAM_RE.replace_all(path, "{${1}}").into_owned()
}

/// Translates a route table into Swagger paths.
///
/// With `project_filter`, only routes whose `project` matches it (ignoring
/// case) are kept. Without it, every documented route is kept.
///
/// # Arguments
///
/// * `routes` - The ingested route table; it is not modified
/// * `project_filter` - Optional project name restricting the output
///
/// # Returns
///
/// Returns the path items keyed by template, in table order, together with
/// the tags derived from controller names.
///
/// # Errors
///
/// Returns [`Error::DuplicateRoute`] when two route keys normalize to the
/// same path template and verb.
///
/// # Example
///
/// ```
/// use routes_swagger::route_table::RouteTable;
/// use routes_swagger::translator::translate;
/// use serde_json::json;
///
/// let routes = RouteTable::from_value(&json!({
///     "post /pets/:id": { "controller": "PetController", "swagger": { "summary": "Update a pet" } }
/// }))
/// .unwrap();
///
/// let translation = translate(&routes, None).unwrap();
/// assert!(translation.paths["/pets/{id}"].post.is_some());
/// assert_eq!(translation.tags[0].name, "PetController");
/// ```
pub fn translate(routes: &RouteTable, project_filter: Option<&str>) -> Result<Translation> {
    let mut paths: IndexMap<String, PathItem> = IndexMap::new();
    let mut derived = TagSet::new();

    for (key, entry) in routes.documented() {
        if is_system_route(key) {
            continue;
        }

        if let Some(project) = project_filter {
            if !entry.spec.belongs_to(project) {
                debug!("Skipping route '{}': not part of project '{}'", key, project);
                continue;
            }
        }

        let (method, path) = split_route_key(key);
        let template = to_path_template(path);

        let tags = if entry.spec.has_tags() {
            entry.spec.tags.clone().unwrap_or_default()
        } else if entry.controller.is_empty() {
            debug!("Route '{}' has neither tags nor a controller", key);
            Vec::new()
        } else {
            derived.insert(Tag::from_controller(&entry.controller));
            vec![entry.controller.clone()]
        };

        let operation = Operation {
            tags,
            fields: entry.spec.fields.clone(),
        };

        let slot = paths.entry(template.clone()).or_default().slot_mut(method);
        if slot.is_some() {
            return Err(Error::DuplicateRoute {
                path: template,
                verb: method.as_str().to_string(),
            });
        }

        debug!("Documented route: {} {}", method, template);
        *slot = Some(operation);
    }

    Ok(Translation {
        paths,
        tags: derived.into_vec(),
    })
}
