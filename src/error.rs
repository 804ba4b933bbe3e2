// src/error.rs
use thiserror::Error;

/// The error enum for all package-assembly operations.
///
/// Every failure here is a configuration error raised while a package is
/// being put together, before any pipeline runs. They are meant to fail
/// fast and loud: a misconfigured package aborts assembly instead of
/// surfacing later as a broken pipeline.
#[derive(Error, Debug)]
pub enum PackageError {
    /// A package, processor, factory, type or event handler was registered
    /// without a resolvable name.
    #[error("missing {0} name")]
    MissingName(&'static str),

    /// An argument had an unusable value, such as an empty event name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Realizing a registered entry failed. Never produced during package
    /// assembly; reserved for the injector invoking factories, type
    /// constructors and config callbacks.
    #[error("realization failed: {0}")]
    Realization(String),
}
