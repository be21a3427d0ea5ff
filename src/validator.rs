//! Document validation.
//!
//! Validation sits behind the [`DocumentValidator`] trait so a full schema
//! validator can be plugged in. [`SwaggerValidator`] enforces the structural
//! rules of Swagger 2.0 that generated documents most often break:
//! - `swagger` must be `"2.0"`; `info.title` and `info.version` are required.
//! - `host` carries neither a scheme nor a path.
//! - Path templates start with `/`.
//! - Every operation declares at least one response.
//! - Tag names and operation ids are unique.
//! - Parameters are unique per (`name`, `in`) within an operation.
//! - Every `{param}` of a template is declared as a required path parameter.
//! - Internal `$ref`s resolve within the document. Generated documents carry
//!   only a `definitions` section, so `#/parameters/...` and
//!   `#/responses/...` references never resolve.
//! - Security requirements name schemes declared in `securityDefinitions`.

use crate::error::{Error, Result, ValidationFailure};
use crate::openapi_builder::{Operation, SwaggerDocument, SWAGGER_VERSION};
use indexmap::IndexMap;
use log::{debug, info};
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::LazyLock;

static TEMPLATE_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").expect("template parameter pattern is valid"));

/// Validates an assembled document
pub trait DocumentValidator: Send + Sync {
    /// Returns every problem found, or `Ok(())` for a valid document
    fn validate(&self, doc: &SwaggerDocument) -> std::result::Result<(), Vec<String>>;
}

/// Structural Swagger 2.0 validator
#[derive(Debug, Clone, Copy, Default)]
pub struct SwaggerValidator;

impl DocumentValidator for SwaggerValidator {
    fn validate(&self, doc: &SwaggerDocument) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if doc.swagger != SWAGGER_VERSION {
            errors.push(format!("swagger must be \"{}\", found \"{}\"", SWAGGER_VERSION, doc.swagger));
        }
        if doc.info.title.as_deref().map_or(true, str::is_empty) {
            errors.push("info.title is required".to_string());
        }
        if doc.info.version.as_deref().map_or(true, str::is_empty) {
            errors.push("info.version is required".to_string());
        }
        if doc.host.contains("://") || doc.host.contains('/') {
            errors.push(format!("host '{}' must not include a scheme or path", doc.host));
        }

        let mut tag_names = HashSet::new();
        for tag in &doc.tags {
            if !tag_names.insert(tag.name.as_str()) {
                errors.push(format!("duplicate tag name '{}'", tag.name));
            }
        }

        let mut operation_ids = HashSet::new();
        for (template, item) in &doc.paths {
            if !template.starts_with('/') {
                errors.push(format!("path '{}' must start with '/'", template));
            }

            let template_params: Vec<&str> = TEMPLATE_PARAM_RE
                .captures_iter(template)
                .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
                .collect();

            for (method, operation) in item.operations() {
                let location = format!("{} {}", method.as_str().to_uppercase(), template);

                if operation.responses().map_or(true, |r| r.is_empty()) {
                    errors.push(format!("{}: at least one response is required", location));
                }

                if let Some(id) = operation.operation_id() {
                    if !operation_ids.insert(id.to_string()) {
                        errors.push(format!("{}: duplicate operationId '{}'", location, id));
                    }
                }

                check_parameters(&location, operation, &template_params, &mut errors);
                check_security(&location, operation, doc, &mut errors);

                let mut refs = Vec::new();
                for value in operation.fields.values() {
                    collect_refs(value, &mut refs);
                }
                check_references(&location, &refs, doc, &mut errors);
            }
        }

        for (name, schema) in &doc.definitions {
            let mut refs = Vec::new();
            collect_refs(schema, &mut refs);
            check_references(&format!("definitions.{}", name), &refs, doc, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_parameters(
    location: &str,
    operation: &Operation,
    template_params: &[&str],
    errors: &mut Vec<String>,
) {
    let mut seen = HashSet::new();
    let mut path_params = HashSet::new();

    for param in operation.parameters() {
        let name = param.get("name").and_then(Value::as_str);
        let place = param.get("in").and_then(Value::as_str);
        let (Some(name), Some(place)) = (name, place) else {
            // $ref parameters are resolved elsewhere
            if param.get("$ref").is_none() {
                errors.push(format!("{}: parameters need both 'name' and 'in'", location));
            }
            continue;
        };

        if !seen.insert((name, place)) {
            errors.push(format!("{}: duplicate parameter '{}' in {}", location, name, place));
        }

        if place == "path" {
            path_params.insert(name);
            if param.get("required").and_then(Value::as_bool) != Some(true) {
                errors.push(format!("{}: path parameter '{}' must be required", location, name));
            }
            if !template_params.contains(&name) {
                errors.push(format!(
                    "{}: path parameter '{}' does not appear in the path",
                    location, name
                ));
            }
        }
    }

    for name in template_params {
        if !path_params.contains(name) {
            errors.push(format!("{}: missing path parameter '{}'", location, name));
        }
    }
}

fn check_security(
    location: &str,
    operation: &Operation,
    doc: &SwaggerDocument,
    errors: &mut Vec<String>,
) {
    let Some(requirements) = operation.fields.get("security") else {
        return;
    };
    let Some(requirements) = requirements.as_array() else {
        errors.push(format!("{}: security must be a list of requirements", location));
        return;
    };

    for requirement in requirements {
        let Some(schemes) = requirement.as_object() else {
            errors.push(format!("{}: security requirements must be objects", location));
            continue;
        };
        for scheme in schemes.keys() {
            if !doc.security_definitions.contains_key(scheme) {
                errors.push(format!(
                    "{}: security scheme '{}' is not declared in securityDefinitions",
                    location, scheme
                ));
            }
        }
    }
}

/// Collects every `$ref` string below `value`
fn collect_refs<'a>(value: &'a Value, refs: &mut Vec<&'a str>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match (key.as_str(), child) {
                    ("$ref", Value::String(reference)) => refs.push(reference),
                    _ => collect_refs(child, refs),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_refs(item, refs);
            }
        }
        _ => {}
    }
}

fn check_references(location: &str, refs: &[&str], doc: &SwaggerDocument, errors: &mut Vec<String>) {
    for reference in refs {
        if !resolves(doc, reference) {
            errors.push(format!("{}: unresolved reference '{}'", location, reference));
        }
    }
}

/// Whether an internal reference points at something in `doc`.
///
/// References to other files are not followed and count as resolved.
fn resolves(doc: &SwaggerDocument, reference: &str) -> bool {
    let Some(pointer) = reference.strip_prefix('#') else {
        return true;
    };
    let pointer = pointer.strip_prefix('/').unwrap_or(pointer);
    let (section, rest) = pointer.split_once('/').unwrap_or((pointer, ""));
    if section != "definitions" || rest.is_empty() {
        return false;
    }

    let (name, tail) = match rest.split_once('/') {
        Some((name, tail)) => (name, Some(tail)),
        None => (rest, None),
    };
    let name = name.replace("~1", "/").replace("~0", "~");

    match (doc.definitions.get(&name), tail) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(schema), Some(tail)) => schema.pointer(&format!("/{}", tail)).is_some(),
    }
}

/// Validates a batch of named documents.
///
/// Every document is checked; the returned error lists all failures.
pub fn validate_all(
    validator: &dyn DocumentValidator,
    documents: &IndexMap<String, SwaggerDocument>,
) -> Result<()> {
    let failures: Vec<ValidationFailure> = documents
        .iter()
        .filter_map(|(name, doc)| match validator.validate(doc) {
            Ok(()) => {
                debug!("Document '{}' is valid", name);
                None
            }
            Err(errors) => Some(ValidationFailure {
                document: name.clone(),
                errors,
            }),
        })
        .collect();

    if failures.is_empty() {
        info!("Validated {} document(s)", documents.len());
        Ok(())
    } else {
        Err(Error::Validation { failures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi_builder::{ExternalDocs, Info, PathItem};
    use crate::tags::Tag;
    use serde_json::{json, Map};

    fn valid_document() -> SwaggerDocument {
        let operation = Operation {
            tags: vec!["pets".to_string()],
            fields: json!({
                "operationId": "getPet",
                "parameters": [{ "name": "id", "in": "path", "required": true, "type": "integer" }],
                "responses": { "200": { "description": "OK" } }
            })
            .as_object()
            .unwrap()
            .clone(),
        };

        let mut paths = IndexMap::new();
        paths.insert(
            "/pets/{id}".to_string(),
            PathItem {
                get: Some(operation),
                ..Default::default()
            },
        );

        SwaggerDocument {
            swagger: "2.0".to_string(),
            info: Info {
                title: Some("petstore".to_string()),
                version: Some("1.0.0".to_string()),
                ..Default::default()
            },
            host: "localhost:8080".to_string(),
            tags: vec![Tag::new("pets", "Pets")],
            definitions: Map::new(),
            security_definitions: Map::new(),
            paths,
            external_docs: ExternalDocs {
                url: "localhost:8080".to_string(),
                description: None,
            },
        }
    }

    fn errors_for(doc: &SwaggerDocument) -> Vec<String> {
        SwaggerValidator.validate(doc).unwrap_err()
    }

    fn get_op(doc: &mut SwaggerDocument) -> &mut Operation {
        doc.paths["/pets/{id}"].get.as_mut().unwrap()
    }

    #[test]
    fn test_valid_document_passes() {
        assert!(SwaggerValidator.validate(&valid_document()).is_ok());
    }

    #[test]
    fn test_missing_info_fields() {
        let mut doc = valid_document();
        doc.info.title = None;
        doc.info.version = Some(String::new());
        let errors = errors_for(&doc);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("info.title"));
        assert!(errors[1].contains("info.version"));
    }

    #[test]
    fn test_host_with_scheme() {
        let mut doc = valid_document();
        doc.host = "http://example.com".to_string();
        assert!(errors_for(&doc)[0].contains("host"));
    }

    #[test]
    fn test_missing_responses() {
        let mut doc = valid_document();
        get_op(&mut doc).fields.remove("responses");
        let errors = errors_for(&doc);
        assert_eq!(errors, vec!["GET /pets/{id}: at least one response is required"]);
    }

    #[test]
    fn test_missing_path_parameter() {
        let mut doc = valid_document();
        get_op(&mut doc).fields.remove("parameters");
        let errors = errors_for(&doc);
        assert_eq!(errors, vec!["GET /pets/{id}: missing path parameter 'id'"]);
    }

    #[test]
    fn test_optional_path_parameter() {
        let mut doc = valid_document();
        get_op(&mut doc).fields["parameters"][0]["required"] = json!(false);
        assert!(errors_for(&doc)[0].contains("must be required"));
    }

    #[test]
    fn test_duplicate_parameters_and_tags() {
        let mut doc = valid_document();
        get_op(&mut doc).fields["parameters"] = json!([
            { "name": "id", "in": "path", "required": true },
            { "name": "id", "in": "path", "required": true },
            { "name": "id", "in": "query" }
        ]);
        doc.tags.push(Tag::new("pets", "again"));
        let errors = errors_for(&doc);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("duplicate tag name 'pets'")));
        assert!(errors.iter().any(|e| e.contains("duplicate parameter 'id' in path")));
    }

    #[test]
    fn test_duplicate_operation_ids() {
        let mut doc = valid_document();
        let copy = doc.paths["/pets/{id}"].get.clone();
        doc.paths["/pets/{id}"].delete = copy;
        let errors = errors_for(&doc);
        assert_eq!(errors, vec!["DELETE /pets/{id}: duplicate operationId 'getPet'"]);
    }

    #[test]
    fn test_relative_path() {
        let mut doc = valid_document();
        let item = doc.paths.shift_remove("/pets/{id}").unwrap();
        doc.paths.insert("pets/{id}".to_string(), item);
        assert!(errors_for(&doc)[0].contains("must start with '/'"));
    }

    #[test]
    fn test_dangling_references() {
        let mut doc = valid_document();
        get_op(&mut doc).fields["responses"]["200"]["schema"] = json!({ "$ref": "#/definitions/Missing" });
        get_op(&mut doc).fields["parameters"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "$ref": "#/parameters/limit" }));
        doc.definitions.insert(
            "Owner".to_string(),
            json!({ "properties": { "pet": { "$ref": "#/definitions/Pet" } } }),
        );

        let errors = errors_for(&doc);
        assert_eq!(
            errors,
            vec![
                "GET /pets/{id}: unresolved reference '#/parameters/limit'",
                "GET /pets/{id}: unresolved reference '#/definitions/Missing'",
                "definitions.Owner: unresolved reference '#/definitions/Pet'",
            ]
        );
    }

    #[test]
    fn test_resolved_references_pass() {
        let mut doc = valid_document();
        doc.definitions.insert(
            "Pet".to_string(),
            json!({ "type": "object", "properties": { "id": { "type": "integer" } } }),
        );
        doc.definitions.insert(
            "Owner".to_string(),
            json!({ "properties": { "pets": { "type": "array", "items": { "$ref": "#/definitions/Pet" } } } }),
        );
        let op = get_op(&mut doc);
        op.fields["responses"]["200"]["schema"] = json!({ "$ref": "#/definitions/Pet/properties/id" });
        op.fields["responses"]["404"] = json!({ "$ref": "errors.json#/NotFound" });

        assert!(SwaggerValidator.validate(&doc).is_ok());
    }

    #[test]
    fn test_undeclared_security_scheme() {
        let mut doc = valid_document();
        doc.security_definitions
            .insert("api_key".to_string(), json!({ "type": "apiKey", "name": "key", "in": "header" }));
        get_op(&mut doc).fields.insert(
            "security".to_string(),
            json!([{ "api_key": [] }, { "undeclared_scheme": [] }]),
        );

        let errors = errors_for(&doc);
        assert_eq!(
            errors,
            vec!["GET /pets/{id}: security scheme 'undeclared_scheme' is not declared in securityDefinitions"]
        );
    }

    #[test]
    fn test_validate_all_aggregates_failures() {
        let mut bad = valid_document();
        bad.info.version = None;

        let mut docs = IndexMap::new();
        docs.insert("all".to_string(), valid_document());
        docs.insert("Store".to_string(), bad.clone());
        docs.insert("Admin".to_string(), bad);

        match validate_all(&SwaggerValidator, &docs) {
            Err(Error::Validation { failures }) => {
                let names: Vec<_> = failures.iter().map(|f| f.document.as_str()).collect();
                assert_eq!(names, vec!["Store", "Admin"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_all_ok() {
        let mut docs = IndexMap::new();
        docs.insert("all".to_string(), valid_document());
        assert!(validate_all(&SwaggerValidator, &docs).is_ok());
    }
}
