//! Resource Swagger - command-line tool for generating Swagger documents from resource manifests.
//!
//! Each manifest lists resources the way a service layer would register them: a path, the
//! CRUD verbs it implements, optional docs fragments and an optional data model. The tool
//! registers them in order and prints (or writes) the resulting documents.
//!
//! # Usage
//!
//! ```bash
//! resource-swagger [OPTIONS] <MANIFEST_PATH>
//! ```
//!
//! # Examples
//!
//! Print the root document:
//! ```bash
//! resource-swagger ./manifests
//! ```
//!
//! Write the root document and every per-resource document as YAML:
//! ```bash
//! resource-swagger ./manifests -c swagger.yaml -f yaml -d ./public
//! ```
//!
//! Print what is left of one resource's docs fragment:
//! ```bash
//! resource-swagger ./manifests -r users -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use resource_swagger::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Resource Swagger starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("Document generation completed successfully");

    Ok(())
}
