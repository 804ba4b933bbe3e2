// src/lib.rs
//! Declarative package composition for document-generation pipelines.
//!
//! A pipeline is assembled from packages: named bundles of processors,
//! injectable services, configuration callbacks and event handlers, each
//! declaring which other packages it depends on. This crate covers the
//! composition surface only. A [`Package`] validates registrations and
//! records them in a module map of tagged entries; realizing those entries
//! and ordering/executing processors is the job of an external injector
//! and orchestrator consuming the finished descriptor.
//!
//! ## Usage
//!
//! ```ignore
//! use docpack::{FactoryDef, Package, ProcessorDef};
//!
//! let pkg = Package::new("jsdoc", ["base".into()])?
//!     .processor(None, ProcessorDef::named_object("parse-tags", ParseTags::default()))?
//!     .factory(Some("tagDefinitions"), FactoryDef::new(|_| Ok(default_tag_definitions())))?
//!     .event_handler("docsProcessed", FactoryDef::named("checkDocs", make_check_docs))?
//!     .config(|_| Ok(()));
//! ```

pub mod error;
pub mod module;
pub mod package;

pub use error::PackageError;
pub use module::{
    BuildFn, ConfigFn, FactoryDef, ModuleMap, ProcessorDef, Registration, RegistrationKind,
    Service, ServiceResolver, TypeDef,
};
pub use package::{is_package, Package, PackageLike, PackageRef};
