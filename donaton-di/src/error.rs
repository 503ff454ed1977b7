//! Describes dependency injection errors

use std::{
    error::Error as StdError,
    fmt::{Display, Formatter},
    sync::Arc
};

/// Shared error produced by a factory or a constructor
pub type SharedError = Arc<dyn StdError + Send + Sync>;

/// Errors reported by the [`Container`](crate::Container)
#[derive(Debug, Clone)]
pub enum Error {
    /// Nothing is bound to the requested abstraction
    UnboundAbstraction(&'static str),

    /// Construction of `implementation` needs `dependency`, which can't be resolved
    UnresolvableDependency {
        /// The missing dependency
        dependency: &'static str,
        /// The type being constructed
        implementation: &'static str,
    },

    /// The chain of abstractions that re-entered itself, the first and the last entries are equal
    CyclicDependency(Vec<&'static str>),

    /// The stored service doesn't have the requested type
    ResolveFailed(&'static str),

    /// An error raised by a factory or a constructor, passed through as is
    Other(SharedError),
}

impl Error {
    /// Wraps an arbitrary error raised while constructing a service
    ///
    /// # Example
    /// ```
    /// use donaton_di::error::Error;
    ///
    /// let err = Error::other("database is unreachable");
    /// assert_eq!(err.to_string(), "database is unreachable");
    /// ```
    pub fn other<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>
    {
        Self::Other(Arc::from(err.into()))
    }

    /// Returns `true` when the error means that some abstraction has no binding,
    /// either directly or as a dependency of the type being constructed
    #[inline]
    pub fn is_missing_binding(&self) -> bool {
        matches!(self, Error::UnboundAbstraction(_) | Error::UnresolvableDependency { .. })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnboundAbstraction(type_name) => write!(f, "Services Error: no binding for {type_name}"),
            Error::UnresolvableDependency { dependency, implementation } =>
                write!(f, "Services Error: unable to resolve dependency {dependency} for {implementation}"),
            Error::CyclicDependency(chain) => write!(f, "Services Error: cyclic dependency: {}", chain.join(" -> ")),
            Error::ResolveFailed(type_name) => write!(f, "Services Error: unable to resolve the service: {type_name}"),
            Error::Other(err) => write!(f, "{err}")
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Other(err) => Some(err.as_ref()),
            _ => None
        }
    }
}
