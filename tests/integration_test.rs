use pretty_assertions::assert_eq;
use routes_swagger::{
    config::SwaggerConfig,
    error::Error,
    generator::DocGenerator,
    openapi_builder::SwaggerDocument,
    route_table::RouteTable,
    serializer::serialize_json,
    tags::Tag,
};
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn load_fixtures() -> (SwaggerConfig, RouteTable) {
    let config = SwaggerConfig::from_file(&fixture("swagger.yml")).expect("Failed to load config");
    let routes = RouteTable::from_file(&fixture("routes.json")).expect("Failed to load routes");
    (config, routes)
}

#[test]
fn test_end_to_end_generation() {
    let (config, routes) = load_fixtures();
    let generated = DocGenerator::new(config).generate(&routes).expect("Generation failed");

    let names: Vec<_> = generated.documents().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["all", "Store", "Admin Tools"]);

    let all = generated.all();
    assert_eq!(all.swagger, "2.0");
    assert_eq!(all.host, "api.petstore.example.com");
    assert_eq!(all.info.title.as_deref(), Some("petstore"));
    assert_eq!(
        all.info.contact.as_ref().and_then(|c| c.email.as_deref()),
        Some("jane@example.com")
    );
    assert_eq!(
        all.paths.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["/api/pets", "/api/pets/{id}", "/admin/users", "/api/version"]
    );
    assert_eq!(
        all.tags,
        vec![
            Tag::new("Pets", "Everything about pets"),
            Tag::new("petcontroller", "Pet controller operations"),
            Tag::from_controller("UserController"),
            Tag::from_controller("MetaController"),
        ]
    );
    assert!(all.definitions.contains_key("Pet"));
    assert!(all.security_definitions.contains_key("api_key"));
    assert_eq!(all.external_docs.url, "https://docs.petstore.example.com");

    let update = all.paths["/api/pets/{id}"].post.as_ref().unwrap();
    assert_eq!(update.tags, vec!["PetController".to_string()]);
    let delete = all.paths["/api/pets/{id}"].delete.as_ref().unwrap();
    assert_eq!(delete.tags, vec!["Pets".to_string()]);
}

#[test]
fn test_project_documents() {
    let (config, routes) = load_fixtures();
    let generated = DocGenerator::new(config).generate(&routes).unwrap();

    let store = generated.get("Store").unwrap();
    assert_eq!(store.info.title.as_deref(), Some("Pet Store API"));
    assert_eq!(store.info.version.as_deref(), Some("1.0.0"));
    assert_eq!(
        store.paths.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["/api/pets", "/api/pets/{id}"]
    );
    assert_eq!(store.tags.len(), 2);

    let admin = generated.get("Admin Tools").unwrap();
    assert_eq!(admin.info.title.as_deref(), Some("petstore"));
    assert_eq!(
        admin.paths.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["/admin/users"]
    );
    assert_eq!(admin.tags.last(), Some(&Tag::from_controller("UserController")));
}

#[test]
fn test_serialized_documents_hide_internal_fields() {
    let (config, routes) = load_fixtures();
    let generated = DocGenerator::new(config).generate(&routes).unwrap();

    for (name, doc) in generated.documents() {
        let json: Value = serde_json::from_str(&serialize_json(doc).unwrap()).unwrap();
        for (template, item) in json["paths"].as_object().unwrap() {
            assert!(!template.contains(':'), "{}: template {} keeps a colon", name, template);
            for (verb, operation) in item.as_object().unwrap() {
                assert!(
                    operation.get("project").is_none(),
                    "{}: {} {} leaks its project",
                    name,
                    verb,
                    template
                );
            }
        }
    }
}

#[test]
fn test_publishes_one_file_per_document() {
    let (config, routes) = load_fixtures();
    let temp_dir = TempDir::new().unwrap();
    let config = config.with_docs_folder(temp_dir.path().to_path_buf());

    let generated = DocGenerator::new(config).generate(&routes).unwrap();
    assert!(generated.publish_failures().is_empty());

    let mut files: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(files, vec!["admin_tools.json", "all.json", "store.json"]);

    let content = std::fs::read_to_string(temp_dir.path().join("all.json")).unwrap();
    assert!(content.starts_with("{\n  \"swagger\": \"2.0\""));
    let written: SwaggerDocument = serde_json::from_str(&content).unwrap();
    assert_eq!(&written, generated.all().as_ref());
}

#[test]
fn test_duplicate_routes_abort_generation() {
    let (config, _) = load_fixtures();
    let temp_dir = TempDir::new().unwrap();
    let config = config.with_docs_folder(temp_dir.path().to_path_buf());

    let routes = RouteTable::from_value(&json!({
        "get /api/pets/:id": {
            "controller": "PetController",
            "swagger": { "responses": { "200": { "description": "OK" } } }
        },
        "/api/pets/:id?": {
            "controller": "PetController",
            "swagger": { "responses": { "200": { "description": "OK" } } }
        }
    }))
    .unwrap();

    match DocGenerator::new(config).generate(&routes) {
        Err(Error::DuplicateRoute { path, verb }) => {
            assert_eq!(path, "/api/pets/{id}");
            assert_eq!(verb, "get");
        }
        other => panic!("expected duplicate route error, got {:?}", other.map(|g| g.documents().count())),
    }
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_invalid_documents_are_not_published() {
    let (config, _) = load_fixtures();
    let temp_dir = TempDir::new().unwrap();
    let config = config.with_docs_folder(temp_dir.path().to_path_buf());

    // Path parameter declared in the template but not in the operation
    let routes = RouteTable::from_value(&json!({
        "get /api/pets/:id": {
            "controller": "PetController",
            "swagger": { "responses": { "200": { "description": "OK" } }, "project": "store" }
        }
    }))
    .unwrap();

    match DocGenerator::new(config).generate(&routes) {
        Err(Error::Validation { failures }) => {
            let names: Vec<_> = failures.iter().map(|f| f.document.as_str()).collect();
            assert_eq!(names, vec!["all", "Store"]);
            assert!(failures[0].errors[0].contains("missing path parameter 'id'"));
        }
        other => panic!("expected validation error, got {:?}", other.map(|g| g.documents().count())),
    }
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_package_is_a_configuration_error() {
    let (mut config, routes) = load_fixtures();
    config.package = None;
    let result = DocGenerator::new(config).generate(&routes);
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn test_route_without_documentation_is_ignored() {
    let (config, _) = load_fixtures();
    let routes = RouteTable::from_value(&json!({
        "post /api/test/:id": { "controller": "TestController", "action": "save" }
    }))
    .unwrap();

    let generated = DocGenerator::new(config).generate(&routes).unwrap();
    assert!(generated.all().paths.is_empty());
    // Only the configured tags remain
    assert_eq!(generated.all().tags.len(), 2);
}
