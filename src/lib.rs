//! Resource Swagger - Swagger 2.0 documents synthesized from CRUD resource services.
//!
//! Services register resources (a name plus the verbs they implement: find, get, create,
//! update, remove). For each one the registry synthesizes operations on a collection path
//! and an item path, installs the resource's schema and appends a tag, all into one root
//! document shared by every resource.
//!
//! # Architecture
//!
//! 1. [`registry`] - Owns the root document and merges resources into it
//! 2. [`operation`] - Synthesizes operations from verb defaults and author overrides
//! 3. [`schema_mapper`] - Maps storage-type tags to schema types and builds object schemas
//! 4. [`fragment`] - Author-supplied docs fragments
//! 5. [`config`] - Startup configuration
//! 6. [`scanner`] / [`parser`] - Locate and read resource manifests
//! 7. [`serializer`] - Serializes documents to YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use resource_swagger::{
//!     config::DocsConfig,
//!     operation::{Capabilities, Verb},
//!     registry::{DocumentRegistry, ResourceRegistration},
//!     serializer::serialize_json,
//! };
//!
//! let mut registry = DocumentRegistry::new(DocsConfig::default());
//! let view = registry.register(ResourceRegistration::new(
//!     "users",
//!     Capabilities::none().with(Verb::Find).with(Verb::Get),
//! ));
//!
//! println!("{}", serialize_json(registry.root_document()).unwrap());
//! println!("{} -> {}", view.document_path, serialize_json(&view.fragment).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod config;
pub mod error;
pub mod fragment;
pub mod operation;
pub mod parser;
pub mod registry;
pub mod scanner;
pub mod schema_mapper;
pub mod serializer;
