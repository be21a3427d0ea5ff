use crate::config::SwaggerConfig;
use crate::generator::DocGenerator;
use crate::route_table::RouteTable;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use crate::server::{self, DocsState};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Generate validated Swagger 2.0 documents from a web application's route table
#[derive(Parser, Debug)]
#[command(name = "routes-swagger")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Generator configuration (JSON or YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: PathBuf,

    /// Route table (JSON or YAML)
    #[arg(short = 'r', long = "routes", value_name = "FILE")]
    pub routes_path: PathBuf,

    /// Write every document to this folder (overrides docsFolder)
    #[arg(short = 'd', long = "docs-folder", value_name = "DIR")]
    pub docs_folder: Option<PathBuf>,

    /// Output format for the "all" document (json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Write the "all" document to this file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Serve the documents over HTTP on this address, e.g. 127.0.0.1:8080
    #[arg(short = 's', long = "serve", value_name = "ADDR")]
    pub serve: Option<SocketAddr>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    for (label, path) in [("Config", &args.config_path), ("Route table", &args.routes_path)] {
        if !path.is_file() {
            anyhow::bail!("{} file does not exist: {}", label, path.display());
        }
    }

    info!("Config: {}", args.config_path.display());
    info!("Routes: {}", args.routes_path.display());
    if let Some(ref folder) = args.docs_folder {
        info!("Docs folder: {}", folder.display());
    }
    if let Some(ref addr) = args.serve {
        info!("Serve on: {}", addr);
    }

    Ok(args)
}

/// Run the main workflow
pub async fn run(args: CliArgs) -> Result<()> {
    // Step 1: Load configuration and route table
    let mut config = SwaggerConfig::from_file(&args.config_path)
        .with_context(|| format!("Failed to load config {}", args.config_path.display()))?;
    if let Some(folder) = args.docs_folder.clone() {
        config = config.with_docs_folder(folder);
    }

    let routes = RouteTable::from_file(&args.routes_path)
        .with_context(|| format!("Failed to load routes {}", args.routes_path.display()))?;
    if routes.is_empty() {
        warn!("Route table {} is empty", args.routes_path.display());
    } else {
        info!("Loaded {} routes", routes.len());
    }

    // Step 2: Generate, validate and publish
    let docs_folder = config.docs_folder.clone();
    let generator = DocGenerator::new(config);
    let generated = generator
        .generate(&routes)
        .context("Swagger document generation failed")?;

    for failure in generated.publish_failures() {
        warn!("Could not write {}: {}", failure.path.display(), failure.error);
    }

    // Step 3: Output the "all" document when asked, or when nothing else consumes it
    if args.output_path.is_some() || (docs_folder.is_none() && args.serve.is_none()) {
        let content = match args.output_format {
            OutputFormat::Json => serialize_json(generated.all())?,
            OutputFormat::Yaml => serialize_yaml(generated.all())?,
        };
        match &args.output_path {
            Some(path) => {
                write_to_file(&content, path)?;
                info!("Wrote the \"all\" document to {}", path.display());
            }
            None => println!("{}", content),
        }
    }

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Routes: {}", routes.len());
    info!("  - Documented paths: {}", generated.all().paths.len());
    info!("  - Documents: {}", generated.documents().count());

    // Step 4: Serve until stopped
    if let Some(addr) = args.serve {
        let state = DocsState::from_generated(&generated, docs_folder);
        server::serve(addr, state).await?;
    }

    Ok(())
}
