//! routes-swagger - Swagger 2.0 documentation from a web application's route table.
//!
//! Given a route table (route key -> handler, each optionally carrying a
//! Swagger operation fragment) and a little project metadata, this library
//! builds complete Swagger documents: one covering every documented route,
//! plus one per configured sub-project. Documents are validated as a batch
//! and then written to disk and/or served over HTTP.
//!
//! # Architecture
//!
//! 1. [`route_table`] - Ingests and classifies the raw route table
//! 2. [`package`] - Converts package metadata into the `info` section
//! 3. [`tags`] - Reconciles configured tags with controller-derived ones
//! 4. [`translator`] - Turns routes into Swagger paths
//! 5. [`openapi_builder`] - Document types and per-project assembly
//! 6. [`validator`] - Structural Swagger 2.0 validation
//! 7. [`serializer`] - JSON/YAML output and atomic file publication
//! 8. [`generator`] - One full generation pass
//! 9. [`server`] - HTTP routes serving the generated documents
//!
//! # Example Usage
//!
//! ```no_run
//! use routes_swagger::{config::SwaggerConfig, generator::DocGenerator, route_table::RouteTable};
//! use std::path::Path;
//!
//! let config = SwaggerConfig::from_file(Path::new("swagger.yml")).unwrap();
//! let routes = RouteTable::from_file(Path::new("routes.json")).unwrap();
//!
//! let generated = DocGenerator::new(config).generate(&routes).unwrap();
//! println!("{} paths documented", generated.all().paths.len());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod openapi_builder;
pub mod package;
pub mod route_table;
pub mod serializer;
pub mod server;
pub mod tags;
pub mod translator;
pub mod validator;
