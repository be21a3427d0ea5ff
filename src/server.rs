//! HTTP surface for generated documents.
//!
//! - `GET /swagger/ui` returns the in-memory `"all"` document as JSON.
//! - `GET /swagger/ui/{project}` streams `<docsFolder>/<project>.json` from
//!   disk, using the same file naming as publication.

use crate::generator::GeneratedDocs;
use crate::openapi_builder::SwaggerDocument;
use crate::serializer::document_file_name;
use anyhow::{Context, Result};
use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use futures_util::{Stream, TryStreamExt};
use log::{debug, error, info};
use std::io::{self, ErrorKind};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

/// Shared state behind the documentation routes
#[derive(Clone, Default)]
pub struct DocsState {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    all: RwLock<Option<Arc<SwaggerDocument>>>,
    docs_folder: Option<PathBuf>,
}

impl DocsState {
    pub fn new(docs_folder: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                all: RwLock::new(None),
                docs_folder,
            }),
        }
    }

    /// State serving the output of a generation pass
    pub fn from_generated(generated: &GeneratedDocs, docs_folder: Option<PathBuf>) -> Self {
        let state = Self::new(docs_folder);
        state.replace(Arc::clone(generated.all()));
        state
    }

    /// Swaps in a newly generated `"all"` document.
    ///
    /// Requests in flight keep the document they already hold.
    pub fn replace(&self, doc: Arc<SwaggerDocument>) {
        let mut all = self.inner.all.write().unwrap_or_else(|e| e.into_inner());
        *all = Some(doc);
    }

    pub fn current(&self) -> Option<Arc<SwaggerDocument>> {
        self.inner.all.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn docs_folder(&self) -> Option<&std::path::Path> {
        self.inner.docs_folder.as_deref()
    }
}

/// Builds the documentation router
pub fn router(state: DocsState) -> Router {
    Router::new()
        .route("/swagger/ui", get(serve_all))
        .route("/swagger/ui/{project}", get(serve_project))
        .with_state(state)
}

/// Serves the documentation router on `addr` until the process stops
pub async fn serve(addr: SocketAddr, state: DocsState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Serving Swagger documents on http://{}/swagger/ui", addr);

    axum::serve(listener, router(state))
        .await
        .context("HTTP server failed")
}

async fn serve_all(State(state): State<DocsState>) -> Response {
    match state.current() {
        Some(doc) => (StatusCode::OK, Json(doc.as_ref())).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "documentation has not been generated yet",
        )
            .into_response(),
    }
}

async fn serve_project(State(state): State<DocsState>, Path(project): Path<String>) -> Response {
    let Some(folder) = state.docs_folder() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "docsFolder is not configured; per-project documents are unavailable",
        )
            .into_response();
    };

    if project.is_empty() || project.starts_with('.') || project.contains(['/', '\\']) {
        return not_found(&project);
    }

    let path = folder.join(document_file_name(&project));
    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return not_found(&project),
        Err(e) => {
            error!("Failed to open {}: {}", path.display(), e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to read documentation for '{}'", project),
            )
                .into_response();
        }
    };

    debug!("Streaming {}", path.display());
    let content_type = mime_guess::from_path(&path).first_or_octet_stream();
    let body = Body::from_stream(logged_stream(file, &path));

    ([(header::CONTENT_TYPE, content_type.to_string())], body).into_response()
}

/// Streams `reader` in chunks. A read error is logged and ends the stream.
fn logged_stream<R>(
    reader: R,
    path: &std::path::Path,
) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static
where
    R: AsyncRead + Send + 'static,
{
    let path = path.to_path_buf();
    ReaderStream::new(reader)
        .inspect_err(move |e| error!("Failed while streaming {}: {}", path.display(), e))
}

fn not_found(project: &str) -> Response {
    debug!("No documentation file for project '{}'", project);
    (
        StatusCode::NOT_FOUND,
        format!("no documentation for project '{}'", project),
    )
        .into_response()
}
