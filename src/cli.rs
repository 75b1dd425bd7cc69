use crate::config::{load_config, DocsConfig};
use crate::error::Error;
use crate::parser::{ManifestParser, ParsedManifest};
use crate::registry::{DocumentRegistry, ResourceRegistration};
use crate::scanner::ManifestScanner;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// Resource Swagger - generate a Swagger 2.0 document from CRUD resource manifests
#[derive(Parser, Debug)]
#[command(name = "resource-swagger")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Manifest file, or directory searched for .json/.yaml/.yml manifests
    #[arg(value_name = "MANIFEST_PATH")]
    pub manifest_path: PathBuf,

    /// Registry configuration file (basePath, docsPath, docExt, info, ...)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Output format (json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE", conflicts_with = "out_dir")]
    pub output_path: Option<PathBuf>,

    /// Print the standalone document of this resource instead of the root document
    #[arg(short = 'r', long = "resource", value_name = "PATH", conflicts_with = "out_dir")]
    pub resource: Option<String>,

    /// Write the root document and every resource document under this directory
    #[arg(short = 'd', long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }

    /// Format implied by a file suffix such as `.json` or `yml`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "yaml" | "yml" => Some(OutputFormat::Yaml),
            _ => None,
        }
    }

    fn render<T: Serialize + ?Sized>(&self, doc: &T) -> Result<String> {
        match self {
            OutputFormat::Json => serialize_json(doc),
            OutputFormat::Yaml => serialize_yaml(doc),
        }
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.manifest_path.exists() {
        anyhow::bail!(
            "Manifest path does not exist: {}",
            args.manifest_path.display()
        );
    }

    if let Some(ref config) = args.config_path {
        if !config.is_file() {
            anyhow::bail!("Config file does not exist: {}", config.display());
        }
    }

    info!("Manifest path: {}", args.manifest_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref dir) = args.out_dir {
        info!("Output directory: {}", dir.display());
    } else if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Build a registry from every manifest found under `args.manifest_path`.
pub fn build_registry(args: &CliArgs) -> Result<DocumentRegistry> {
    let config = match &args.config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => DocsConfig::default(),
    };

    info!("Scanning for manifests...");
    let scanner = ManifestScanner::new(args.manifest_path.clone());
    let scan_result = scanner.scan()?;
    for warning in &scan_result.warnings {
        warn!("{}", warning);
    }
    info!("Found {} manifest files", scan_result.manifest_files.len());

    let parsed: Vec<ParsedManifest> = ManifestParser::parse_files(&scan_result.manifest_files)
        .into_iter()
        .filter_map(|r| match r {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                debug!("Skipping manifest: {}", e);
                None
            }
        })
        .collect();

    let mut registry = DocumentRegistry::new(config);
    let mut registered = 0;
    for manifest in parsed {
        debug!("Registering resources from {}", manifest.path.display());
        for entry in manifest.manifest.resources {
            registry.register(ResourceRegistration::from(entry));
            registered += 1;
        }
    }

    if registered == 0 {
        warn!("No resources found in the manifests");
    }
    info!("Registered {} resources", registered);

    Ok(registry)
}

/// Resolve a published document path beneath `out_dir`.
///
/// A leading `/` is dropped; `..` and other non-relative components are rejected so nothing
/// is written outside `out_dir`.
pub fn output_path(out_dir: &Path, relative: &str) -> crate::error::Result<PathBuf> {
    let mut resolved = out_dir.to_path_buf();
    let mut pushed = false;
    for component in Path::new(relative.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                pushed = true;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::InvalidArgument(format!(
                    "document path escapes the output directory: {}",
                    relative
                )));
            }
        }
    }
    if !pushed {
        return Err(Error::InvalidArgument(format!(
            "empty document path: {:?}",
            relative
        )));
    }
    Ok(resolved)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting document generation...");
    let registry = build_registry(&args)?;

    if let Some(out_dir) = &args.out_dir {
        let root_path = output_path(
            out_dir,
            &format!("{}.{}", registry.docs_path(), args.output_format.extension()),
        )?;
        write_to_file(&args.output_format.render(registry.root_document())?, &root_path)?;
        info!("Wrote root document to {}", root_path.display());

        // A recognizable docExt decides the format of resource documents
        let resource_format =
            OutputFormat::from_extension(registry.doc_ext()).unwrap_or(args.output_format);
        for view in registry.views() {
            let path = output_path(out_dir, &view.document_path)?;
            write_to_file(&resource_format.render(&view.fragment)?, &path)?;
            debug!("Wrote {} document to {}", view.path, path.display());
        }
    } else {
        let content = match &args.resource {
            Some(resource) => {
                let fragment = registry
                    .resource_document(resource)
                    .with_context(|| format!("Resource not registered: {}", resource))?;
                args.output_format.render(fragment)?
            }
            None => args.output_format.render(registry.root_document())?,
        };

        if let Some(output_path) = &args.output_path {
            write_to_file(&content, output_path)?;
            info!("Successfully wrote document to {}", output_path.display());
        } else {
            println!("{}", content);
        }
    }

    let document = registry.root_document();
    info!("Generation complete!");
    info!("Summary:");
    info!("  - Paths: {}", document.paths.len());
    info!("  - Definitions: {}", document.definitions.len());
    info!("  - Tags: {}", document.tags.len());
    info!("  - Warnings: {}", registry.warnings().len());

    Ok(())
}
