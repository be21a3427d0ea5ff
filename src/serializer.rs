//! Serialization and on-disk publication of Swagger documents.
//!
//! Documents are written as pretty-printed JSON (two-space indent) to
//! `<folder>/<name>.json`, where the name is lower-cased with spaces
//! replaced by underscores. Each file is written to a temporary file in the
//! same directory first and then renamed over the destination, so readers
//! never see a partially written document.

use crate::openapi_builder::SwaggerDocument;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A document that could not be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishFailure {
    pub document: String,
    pub path: PathBuf,
    pub error: String,
}

/// Serializes a Swagger document to YAML format.
pub fn serialize_yaml(doc: &SwaggerDocument) -> Result<String> {
    debug!("Serializing Swagger document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize Swagger document to YAML")
}

/// Serializes a Swagger document to JSON with two-space indentation.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &SwaggerDocument) -> Result<String> {
    debug!("Serializing Swagger document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize Swagger document to JSON")
}

/// File name for a document: lower-cased, spaces as underscores, `.json` suffix
pub fn document_file_name(name: &str) -> String {
    format!("{}.json", name.to_lowercase().replace(' ', "_"))
}

/// Writes string content to a file, replacing it atomically.
///
/// Parent directories are created when missing. The content goes to a
/// temporary file next to `path`, which is then renamed into place.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or written.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory: {}", parent.display()))?;

    let mut temp = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
    temp.write_all(content.as_bytes())
        .and_then(|_| temp.flush())
        .with_context(|| format!("Failed to write temporary file for {}", path.display()))?;
    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Writes every document to `folder`.
///
/// Writes are independent: a failure is logged and reported in the returned
/// list, and the remaining documents are still written. Nothing is rolled
/// back.
///
/// # Arguments
///
/// * `documents` - `(name, document)` pairs; the name picks the file name
/// * `folder` - Target directory, created when missing
///
/// # Returns
///
/// Returns one [`PublishFailure`] per document that could not be written.
/// An empty list means every file is in place.
///
/// # Example
///
/// ```ignore
/// use routes_swagger::serializer::publish_documents;
///
/// let failures = publish_documents([("all", &all), ("Public API", &public)], Path::new("docs"));
/// assert!(failures.is_empty()); // docs/all.json and docs/public_api.json
/// ```
pub fn publish_documents<'a, I>(documents: I, folder: &Path) -> Vec<PublishFailure>
where
    I: IntoIterator<Item = (&'a str, &'a SwaggerDocument)>,
{
    let mut failures = Vec::new();
    let mut written = 0;

    for (name, doc) in documents {
        let path = folder.join(document_file_name(name));
        let result = serialize_json(doc).and_then(|json| write_to_file(&json, &path));

        match result {
            Ok(()) => written += 1,
            Err(e) => {
                warn!("Failed to publish document '{}' to {}: {:#}", name, path.display(), e);
                failures.push(PublishFailure {
                    document: name.to_string(),
                    path,
                    error: format!("{:#}", e),
                });
            }
        }
    }

    info!("Published {} document(s) to {}", written, folder.display());
    failures
}
