use crate::config::{ProjectConfig, SwaggerConfig, DEFAULT_HOST};
use crate::error::{Error, Result};
use crate::package::convert_package;
use crate::route_table::RouteTable;
use crate::serializer::document_file_name;
use crate::tags::{merge_tags, Tag};
use crate::translator::{translate, HttpMethod};
use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::thread;

/// Swagger specification version emitted in every document
pub const SWAGGER_VERSION: &str = "2.0";

/// Name of the document covering every documented route
pub const ALL_DOCUMENT: &str = "all";

/// Swagger Info object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

/// Swagger Contact object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Swagger License object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Swagger External Documentation object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalDocs {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Swagger PathItem object - all operations for a single path template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
}

/// Swagger Operation object.
///
/// Everything but `tags` is carried verbatim from the route's documentation
/// fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Complete Swagger 2.0 document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwaggerDocument {
    pub swagger: String,
    pub info: Info,
    pub host: String,
    pub tags: Vec<Tag>,
    pub definitions: Map<String, Value>,
    pub security_definitions: Map<String, Value>,
    pub paths: IndexMap<String, PathItem>,
    pub external_docs: ExternalDocs,
}

impl Info {
    /// Returns `self` with every unset field filled from `base`
    pub fn overlay(&self, base: &Info) -> Info {
        Info {
            title: self.title.clone().or_else(|| base.title.clone()),
            description: self.description.clone().or_else(|| base.description.clone()),
            version: self.version.clone().or_else(|| base.version.clone()),
            terms_of_service: self
                .terms_of_service
                .clone()
                .or_else(|| base.terms_of_service.clone()),
            contact: self.contact.clone().or_else(|| base.contact.clone()),
            license: self.license.clone().or_else(|| base.license.clone()),
        }
    }
}

impl Contact {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.url.is_none() && self.email.is_none()
    }
}

impl PathItem {
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Trace => self.trace.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
            HttpMethod::Trace => &mut self.trace,
        }
    }

    /// Operations present on this path, in method order
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        HttpMethod::ALL
            .into_iter()
            .filter_map(|method| self.operation(method).map(|op| (method, op)))
    }
}

impl Operation {
    pub fn operation_id(&self) -> Option<&str> {
        self.fields.get("operationId").and_then(Value::as_str)
    }

    pub fn parameters(&self) -> &[Value] {
        self.fields
            .get("parameters")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn responses(&self) -> Option<&Map<String, Value>> {
        self.fields.get("responses").and_then(Value::as_object)
    }
}

/// Assembles one Swagger document.
///
/// With a `project`, only that project's routes are documented and its
/// `info` fields take precedence over the package-derived ones.
///
/// # Errors
///
/// Fails when the package metadata is missing or two routes collide.
pub fn assemble(
    routes: &RouteTable,
    project: Option<&ProjectConfig>,
    config: &SwaggerConfig,
) -> Result<SwaggerDocument> {
    let filter = project.map(|p| p.name.as_str());
    debug!("Assembling document for {}", filter.unwrap_or(ALL_DOCUMENT));

    let translation = translate(routes, filter)?;

    let package_info = convert_package(config.package.as_ref())?;
    let info = match project.and_then(|p| p.info.as_ref()) {
        Some(project_info) => project_info.overlay(&package_info),
        None => package_info,
    };

    Ok(SwaggerDocument {
        swagger: SWAGGER_VERSION.to_string(),
        info,
        host: config.host().to_string(),
        tags: merge_tags(&config.tags, &translation.tags),
        definitions: config.definitions.clone(),
        security_definitions: config.security_definitions.clone(),
        paths: translation.paths,
        external_docs: config.external_docs.clone().unwrap_or_else(|| ExternalDocs {
            url: DEFAULT_HOST.to_string(),
            description: None,
        }),
    })
}

/// Assembles the `"all"` document plus one document per configured project.
///
/// Assemblies run in parallel on scoped threads.
///
/// # Arguments
///
/// * `routes` - The route table shared by every assembly
/// * `config` - Package metadata, global sections and the project list
///
/// # Returns
///
/// Returns the documents keyed by name: `"all"` first, then each project in
/// declaration order.
///
/// # Errors
///
/// Any failure fails the whole call: a blank or clashing project name, missing
/// package metadata, or a duplicate route.
///
/// # Example
///
/// ```ignore
/// use routes_swagger::config::SwaggerConfig;
/// use routes_swagger::openapi_builder::assemble_all;
/// use routes_swagger::route_table::RouteTable;
///
/// let config = SwaggerConfig::from_file(Path::new("swagger.yml"))?;
/// let routes = RouteTable::from_file(Path::new("routes.json"))?;
/// for (name, doc) in assemble_all(&routes, &config)? {
///     println!("{}: {} paths", name, doc.paths.len());
/// }
/// ```
pub fn assemble_all(
    routes: &RouteTable,
    config: &SwaggerConfig,
) -> Result<IndexMap<String, SwaggerDocument>> {
    check_project_names(&config.projects)?;

    let results: Vec<(String, Result<SwaggerDocument>)> = thread::scope(|scope| {
        let all = scope.spawn(|| assemble(routes, None, config));
        let projects: Vec<_> = config
            .projects
            .iter()
            .map(|project| {
                let handle = scope.spawn(move || assemble(routes, Some(project), config));
                (project.name.clone(), handle)
            })
            .collect();

        std::iter::once((ALL_DOCUMENT.to_string(), all))
            .chain(projects)
            .map(|(name, handle)| {
                let result = handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
                (name, result)
            })
            .collect()
    });

    let mut documents = IndexMap::new();
    for (name, result) in results {
        documents.insert(name, result?);
    }

    info!("Assembled {} document(s)", documents.len());
    Ok(documents)
}

/// Project names must map to distinct files, none of them `all.json`
fn check_project_names(projects: &[ProjectConfig]) -> Result<()> {
    let mut seen = HashSet::from([document_file_name(ALL_DOCUMENT)]);
    for project in projects {
        if project.name.trim().is_empty() {
            return Err(Error::Configuration("project names must not be empty".to_string()));
        }
        if !seen.insert(document_file_name(&project.name)) {
            return Err(Error::Configuration(format!(
                "project name '{}' clashes with another document",
                project.name
            )));
        }
    }
    Ok(())
}
