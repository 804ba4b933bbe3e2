// src/package.rs
//! The package descriptor and its registration API.
//!
//! A [`Package`] is a named, declarative bundle of processors, services,
//! configuration callbacks and event handlers, plus references to the
//! packages it depends on. It executes nothing itself: the finished
//! descriptor is handed to an external injector (which realizes the module
//! map) and pipeline orchestrator (which orders processors, runs config
//! callbacks and dispatches events).

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::PackageError;
use crate::module::{
    ConfigFn, FactoryDef, ModuleMap, ProcessorDef, Registration, ServiceResolver, TypeDef,
};

/// A reference to another package, by name or by value.
///
/// Declaration order is preserved, though the external resolver treats the
/// list as a set.
#[derive(Clone, Debug)]
pub enum PackageRef {
    Name(String),
    Package(Arc<Package>),
}

impl PackageRef {
    /// The referenced package's name.
    pub fn name(&self) -> &str {
        match self {
            PackageRef::Name(name) => name,
            PackageRef::Package(package) => package.name(),
        }
    }
}

impl From<&str> for PackageRef {
    fn from(name: &str) -> Self {
        PackageRef::Name(name.to_owned())
    }
}

impl From<String> for PackageRef {
    fn from(name: String) -> Self {
        PackageRef::Name(name)
    }
}

impl From<Package> for PackageRef {
    fn from(package: Package) -> Self {
        PackageRef::Package(Arc::new(package))
    }
}

impl From<Arc<Package>> for PackageRef {
    fn from(package: Arc<Package>) -> Self {
        PackageRef::Package(package)
    }
}

/// A named, composable bundle of pipeline behavior.
///
/// Registration methods consume and return the package, so a package is
/// normally assembled as one fluent chain:
///
/// ```ignore
/// let pkg = Package::new("jsdoc", ["base".into()])?
///     .processor(None, ProcessorDef::named_object("parse-tags", ParseTags::default()))?
///     .factory(Some("tagDefinitions"), FactoryDef::new(default_tag_definitions))?
///     .config(|_| Ok(()));
/// ```
#[derive(Clone)]
pub struct Package {
    name: String,
    dependencies: Vec<PackageRef>,
    module: ModuleMap,
    processors: Vec<String>,
    config_fns: Vec<ConfigFn>,
    handlers: HashMap<String, Vec<String>>,
}

impl Package {
    /// Creates a package with the given name and dependency references.
    ///
    /// Name and dependencies are fixed for the lifetime of the package.
    /// Whether the dependencies can actually be resolved is the external
    /// resolver's concern, not checked here.
    pub fn new(
        name: impl Into<String>,
        dependencies: impl IntoIterator<Item = PackageRef>,
    ) -> Result<Self, PackageError> {
        let name = name.into();
        if name.is_empty() {
            return Err(PackageError::MissingName("package"));
        }
        Ok(Self {
            name,
            dependencies: dependencies.into_iter().collect(),
            module: ModuleMap::new(),
            processors: Vec::new(),
            config_fns: Vec::new(),
            handlers: HashMap::new(),
        })
    }

    /// Registers a processor under `name`, or under the definition's own
    /// declared name when `name` is `None`.
    ///
    /// A factory-backed processor is stored as a factory entry; a ready
    /// object is stored as a value entry. The resolved name is also
    /// recorded in the processor list the orchestrator later orders via
    /// the processors' own run-after/run-before metadata. The list keeps
    /// registration order and never holds a name twice, even when a
    /// re-registration overwrites the module entry.
    pub fn processor(
        mut self,
        name: Option<&str>,
        processor: ProcessorDef,
    ) -> Result<Self, PackageError> {
        let resolved = resolve_name(name, processor.declared_name(), "processor")?;
        let entry = match processor {
            ProcessorDef::Object { value, .. } => Registration::Value(value),
            ProcessorDef::Factory(factory) => Registration::Factory(factory.into_build_fn()),
        };
        log::debug!(
            "package '{}': registered {} processor '{}'",
            self.name,
            entry.kind(),
            resolved
        );
        self.module.insert(resolved.clone(), entry);
        if !self.processors.contains(&resolved) {
            self.processors.push(resolved);
        }
        Ok(self)
    }

    /// Registers a service factory under `name`, or under its own declared
    /// name when `name` is `None`. Overwrites any earlier entry under the
    /// resolved name.
    pub fn factory(mut self, name: Option<&str>, factory: FactoryDef) -> Result<Self, PackageError> {
        let resolved = resolve_name(name, factory.declared_name(), "factory")?;
        log::debug!("package '{}': registered factory '{}'", self.name, resolved);
        self.module
            .insert(resolved, Registration::Factory(factory.into_build_fn()));
        Ok(self)
    }

    /// Registers a type constructor under `name`, or under its own
    /// declared name when `name` is `None`. The injector instantiates a
    /// type entry per request instead of realizing it once.
    pub fn register_type(mut self, name: Option<&str>, ty: TypeDef) -> Result<Self, PackageError> {
        let resolved = resolve_name(name, ty.declared_name(), "type")?;
        log::debug!("package '{}': registered type '{}'", self.name, resolved);
        self.module
            .insert(resolved, Registration::Type(ty.into_build_fn()));
        Ok(self)
    }

    /// Appends a configuration callback. The orchestrator runs config
    /// callbacks in registration order, before any processor.
    pub fn config<F>(mut self, config_fn: F) -> Self
    where
        F: Fn(&dyn ServiceResolver) -> Result<(), PackageError> + Send + Sync + 'static,
    {
        log::debug!("package '{}': registered config callback", self.name);
        self.config_fns.push(Arc::new(config_fn));
        self
    }

    /// Registers a factory producing a handler for `event`.
    ///
    /// The handler is registered as an ordinary factory, so it is a
    /// first-class injectable service, and its name is appended to the
    /// event's handler list. An anonymous handler factory gets a
    /// deterministic synthesized name, `{package}_{event}_{index}`, unique
    /// within one package and event.
    pub fn event_handler(
        self,
        event: &str,
        handler: FactoryDef,
    ) -> Result<Self, PackageError> {
        if event.is_empty() {
            return Err(PackageError::InvalidArgument(
                "event name must be a non-empty string".to_owned(),
            ));
        }
        let handler_name = match handler.declared_name() {
            Some(name) => name.to_owned(),
            None => {
                let count = self.handlers.get(event).map_or(0, Vec::len);
                format!("{}_{}_{}", self.name, event, count)
            }
        };
        let mut package = self.factory(Some(&handler_name), handler)?;
        package
            .handlers
            .entry(event.to_owned())
            .or_default()
            .push(handler_name);
        Ok(package)
    }

    /// The package's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared dependency references, in declaration order.
    pub fn dependencies(&self) -> &[PackageRef] {
        &self.dependencies
    }

    /// The module map the external injector realizes.
    pub fn module(&self) -> &ModuleMap {
        &self.module
    }

    /// Names of the registered processors, in registration order. This is
    /// not the execution order; the orchestrator computes that from the
    /// processors' own metadata.
    pub fn processors(&self) -> &[String] {
        &self.processors
    }

    /// The configuration callbacks, in registration order.
    pub fn config_fns(&self) -> &[ConfigFn] {
        &self.config_fns
    }

    /// Handler factory names per event, each list in registration order.
    pub fn handlers(&self) -> &HashMap<String, Vec<String>> {
        &self.handlers
    }

    /// Handler factory names for one event, in registration order.
    pub fn handlers_for(&self, event: &str) -> &[String] {
        self.handlers.get(event).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl fmt::Debug for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Package")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("module", &self.module)
            .field("processors", &self.processors)
            .field("config_fns", &self.config_fns.len())
            .field("handlers", &self.handlers)
            .finish()
    }
}

/// Structural contract for package-shaped values.
///
/// Anything exposing a name, a dependency list and a module map qualifies
/// as a package for the external resolver, whether or not it was built
/// through [`Package::new`]. External code can implement this for its own
/// types; no inheritance or constructor is required.
pub trait PackageLike: Send + Sync {
    fn name(&self) -> &str;
    fn dependencies(&self) -> &[PackageRef];
    fn module(&self) -> &ModuleMap;
}

impl PackageLike for Package {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> &[PackageRef] {
        &self.dependencies
    }

    fn module(&self) -> &ModuleMap {
        &self.module
    }
}

/// Reports whether a dynamically typed value is package-shaped.
///
/// Recognizes the carriers a type-erased package can travel as: a
/// [`Package`] (bare or in an `Arc`) and boxed or shared [`PackageLike`]
/// trait objects.
pub fn is_package(candidate: &dyn Any) -> bool {
    candidate.is::<Package>()
        || candidate.is::<Arc<Package>>()
        || candidate.is::<Box<dyn PackageLike>>()
        || candidate.is::<Arc<dyn PackageLike>>()
}

/// Explicit first, then the definition's declared name. Empty strings
/// count as absent at both positions.
fn resolve_name(
    explicit: Option<&str>,
    declared: Option<&str>,
    kind: &'static str,
) -> Result<String, PackageError> {
    explicit
        .filter(|name| !name.is_empty())
        .or(declared)
        .map(str::to_owned)
        .ok_or(PackageError::MissingName(kind))
}
