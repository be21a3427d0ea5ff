//! One generation pass: assemble, validate, publish.
//!
//! Every document is assembled first (in parallel), then the whole batch is
//! validated. Only when every document is valid are files written, so a
//! failing pass never leaves partial output behind.

use crate::config::SwaggerConfig;
use crate::error::{Error, Result};
use crate::openapi_builder::{assemble_all, SwaggerDocument, ALL_DOCUMENT};
use crate::route_table::RouteTable;
use crate::serializer::{publish_documents, PublishFailure};
use crate::validator::{validate_all, DocumentValidator, SwaggerValidator};
use indexmap::IndexMap;
use log::{info, warn};
use std::sync::Arc;

/// Generates Swagger documents from route tables
pub struct DocGenerator {
    config: SwaggerConfig,
    validator: Box<dyn DocumentValidator>,
}

/// Result of a successful generation pass
#[derive(Debug, Clone)]
pub struct GeneratedDocs {
    all: Arc<SwaggerDocument>,
    documents: IndexMap<String, Arc<SwaggerDocument>>,
    publish_failures: Vec<PublishFailure>,
}

impl DocGenerator {
    /// Creates a generator using the built-in [`SwaggerValidator`]
    pub fn new(config: SwaggerConfig) -> Self {
        Self {
            config,
            validator: Box::new(SwaggerValidator),
        }
    }

    /// Replaces the validator
    pub fn with_validator(mut self, validator: impl DocumentValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// Runs one generation pass over `routes`.
    ///
    /// Documents are assembled, validated as a batch and, when `docsFolder`
    /// is configured, written to disk.
    ///
    /// # Arguments
    ///
    /// * `routes` - The route table to document
    ///
    /// # Returns
    ///
    /// Returns the generated documents along with any files that could not
    /// be written.
    ///
    /// # Errors
    ///
    /// Fails on missing package metadata, duplicate routes, clashing project
    /// names, or when any document fails validation. Nothing is written in
    /// those cases. Individual file write failures do not fail the pass; they
    /// are reported through [`GeneratedDocs::publish_failures`].
    ///
    /// # Example
    ///
    /// ```ignore
    /// use routes_swagger::generator::DocGenerator;
    ///
    /// let generated = DocGenerator::new(config).generate(&routes)?;
    /// for failure in generated.publish_failures() {
    ///     eprintln!("could not write {}", failure.path.display());
    /// }
    /// ```
    pub fn generate(&self, routes: &RouteTable) -> Result<GeneratedDocs> {
        info!("Generating Swagger documents from {} routes", routes.len());

        let documents = assemble_all(routes, &self.config)?;
        validate_all(self.validator.as_ref(), &documents)?;

        let publish_failures = match &self.config.docs_folder {
            Some(folder) => publish_documents(
                documents.iter().map(|(name, doc)| (name.as_str(), doc)),
                folder,
            ),
            None => Vec::new(),
        };
        if !publish_failures.is_empty() {
            warn!("{} document(s) could not be written", publish_failures.len());
        }

        let documents: IndexMap<String, Arc<SwaggerDocument>> = documents
            .into_iter()
            .map(|(name, doc)| (name, Arc::new(doc)))
            .collect();
        let all = documents
            .get(ALL_DOCUMENT)
            .cloned()
            .ok_or_else(|| Error::Configuration("the \"all\" document was not assembled".to_string()))?;

        Ok(GeneratedDocs {
            all,
            documents,
            publish_failures,
        })
    }
}

impl GeneratedDocs {
    /// The document covering every documented route
    pub fn all(&self) -> &Arc<SwaggerDocument> {
        &self.all
    }

    /// A document by name: `"all"` or a project's declared name
    pub fn get(&self, name: &str) -> Option<&Arc<SwaggerDocument>> {
        self.documents.get(name)
    }

    /// All documents, `"all"` first, then projects in declaration order
    pub fn documents(&self) -> impl Iterator<Item = (&str, &Arc<SwaggerDocument>)> {
        self.documents.iter().map(|(name, doc)| (name.as_str(), doc))
    }

    pub fn publish_failures(&self) -> &[PublishFailure] {
        &self.publish_failures
    }
}
