// src/module.rs
//! Registration primitives: the tagged entries a package's module map is
//! made of, and the definition carriers used to register them.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::PackageError;

/// Opaque service payload handed to the external injector.
pub type Service = Arc<dyn Any + Send + Sync>;

/// The lookup surface the external injector exposes to factories, type
/// constructors and config callbacks while realizing a package.
pub trait ServiceResolver {
    /// Returns the realized service registered under `name`, if any.
    fn resolve(&self, name: &str) -> Option<Service>;
}

/// Deferred service constructor stored in factory and type entries.
pub type BuildFn =
    Arc<dyn Fn(&dyn ServiceResolver) -> Result<Service, PackageError> + Send + Sync>;

/// Configuration callback, run by the orchestrator in registration order
/// before any processor.
pub type ConfigFn = Arc<dyn Fn(&dyn ServiceResolver) -> Result<(), PackageError> + Send + Sync>;

/// The per-package module map: registered name to tagged entry.
///
/// Keys are unique within one map; re-registering a name overwrites the
/// earlier entry (last-write-wins).
pub type ModuleMap = HashMap<String, Registration>;

/// A deferred service constructor with an optional declared name.
///
/// The declared name plays the role of a callable's intrinsic name: call
/// sites either name the factory at registration time
/// (`pkg.factory(Some("tagDefinitions"), ...)`) or hand over a
/// self-describing definition built with [`FactoryDef::named`].
#[derive(Clone)]
pub struct FactoryDef {
    name: Option<String>,
    build: BuildFn,
}

impl FactoryDef {
    /// Creates an anonymous factory. Registering it requires an explicit
    /// name (event handlers are the exception, they synthesize one).
    pub fn new<F>(build: F) -> Self
    where
        F: Fn(&dyn ServiceResolver) -> Result<Service, PackageError> + Send + Sync + 'static,
    {
        Self {
            name: None,
            build: Arc::new(build),
        }
    }

    /// Creates a self-describing factory carrying its own name.
    pub fn named<F>(name: impl Into<String>, build: F) -> Self
    where
        F: Fn(&dyn ServiceResolver) -> Result<Service, PackageError> + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            build: Arc::new(build),
        }
    }

    /// The factory's own declared name. Empty names read as absent.
    pub fn declared_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    pub(crate) fn into_build_fn(self) -> BuildFn {
        self.build
    }
}

impl fmt::Debug for FactoryDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryDef")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A constructor-style registration: instantiated per request by the
/// external injector, where a factory's product is realized once.
#[derive(Clone)]
pub struct TypeDef {
    name: Option<String>,
    construct: BuildFn,
}

impl TypeDef {
    /// Creates an anonymous type constructor.
    pub fn new<F>(construct: F) -> Self
    where
        F: Fn(&dyn ServiceResolver) -> Result<Service, PackageError> + Send + Sync + 'static,
    {
        Self {
            name: None,
            construct: Arc::new(construct),
        }
    }

    /// Creates a self-describing type constructor carrying its own name.
    pub fn named<F>(name: impl Into<String>, construct: F) -> Self
    where
        F: Fn(&dyn ServiceResolver) -> Result<Service, PackageError> + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            construct: Arc::new(construct),
        }
    }

    /// The type's own declared name. Empty names read as absent.
    pub fn declared_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    pub(crate) fn into_build_fn(self) -> BuildFn {
        self.construct
    }
}

impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDef")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// What a processor registration carries: a ready object stored as-is, or
/// a factory the injector invokes to produce the processor.
#[derive(Clone)]
pub enum ProcessorDef {
    /// A ready processor object, stored unchanged as a value entry.
    Object {
        name: Option<String>,
        value: Service,
    },
    /// A factory producing the processor, stored as a factory entry.
    Factory(FactoryDef),
}

impl ProcessorDef {
    /// An anonymous ready-made processor object. Registering it requires
    /// an explicit name.
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Self::Object {
            name: None,
            value: Arc::new(value),
        }
    }

    /// A ready-made processor object carrying its own name.
    pub fn named_object<T: Any + Send + Sync>(name: impl Into<String>, value: T) -> Self {
        Self::Object {
            name: Some(name.into()),
            value: Arc::new(value),
        }
    }

    /// The definition's own declared name. Empty names read as absent.
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Self::Object { name, .. } => name.as_deref().filter(|name| !name.is_empty()),
            Self::Factory(factory) => factory.declared_name(),
        }
    }
}

impl From<FactoryDef> for ProcessorDef {
    fn from(factory: FactoryDef) -> Self {
        Self::Factory(factory)
    }
}

impl fmt::Debug for ProcessorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object { name, .. } => f
                .debug_struct("ProcessorDef::Object")
                .field("name", name)
                .finish_non_exhaustive(),
            Self::Factory(factory) => f.debug_tuple("ProcessorDef::Factory").field(factory).finish(),
        }
    }
}

/// A tagged module entry.
///
/// The tag tells the external injector how to realize the entry: invoke as
/// a factory, hand out as-is, or instantiate as a type. Dispatch is on the
/// variant, never on runtime inspection of the payload.
#[derive(Clone)]
pub enum Registration {
    Factory(BuildFn),
    Value(Service),
    Type(BuildFn),
}

impl Registration {
    pub fn kind(&self) -> RegistrationKind {
        match self {
            Registration::Factory(_) => RegistrationKind::Factory,
            Registration::Value(_) => RegistrationKind::Value,
            Registration::Type(_) => RegistrationKind::Type,
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Registration::Factory(_) => f.write_str("Factory(..)"),
            Registration::Value(_) => f.write_str("Value(..)"),
            Registration::Type(_) => f.write_str("Type(..)"),
        }
    }
}

/// Discriminant of a [`Registration`], for dispatch and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationKind {
    Factory,
    Value,
    Type,
}

impl fmt::Display for RegistrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationKind::Factory => f.write_str("factory"),
            RegistrationKind::Value => f.write_str("value"),
            RegistrationKind::Type => f.write_str("type"),
        }
    }
}
