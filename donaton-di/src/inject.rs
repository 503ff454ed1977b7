//! Utilities to inject and resolve dependencies

use crate::Container;
use crate::error::Error;

/// A trait that adds the ability to inject dependencies when constructing a type
/// bound in the DI container
///
/// If there is no need to inject other dependencies, the `struct` must implement the `Default` trait
///
/// # Example
/// ```
/// use donaton_di::Container;
///
/// #[derive(Default)]
/// struct Counter;
///
/// let container = Container::new();
/// container.bind_singleton::<Counter, Counter>();
/// ```
///
/// If it's required to construct a `struct` from other dependencies, the `Inject` can be
/// implemented manually or derived with the `macros` feature
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use donaton_di::{Container, Inject, error::Error};
///
/// #[derive(Default)]
/// struct Repository;
///
/// struct Service {
///     repository: Arc<Repository>
/// }
///
/// impl Inject for Service {
///     fn inject(container: &Container) -> Result<Self, Error> {
///         let repository = container.resolve::<Repository>()?;
///         Ok(Self { repository })
///     }
/// }
///
/// let container = Container::new();
/// container.bind_singleton::<Repository, Repository>();
/// container.bind::<Service, Service>();
///
/// let service = container.resolve::<Service>().unwrap();
/// let repository = container.resolve::<Repository>().unwrap();
/// assert!(Arc::ptr_eq(&service.repository, &repository));
/// ```
pub trait Inject: Sized + Send + Sync {
    /// Constructs `Self` resolving its dependencies from the `container`
    fn inject(container: &Container) -> Result<Self, Error>;
}

impl<T: Default + Send + Sync> Inject for T {
    #[inline]
    fn inject(_: &Container) -> Result<Self, Error> {
        Ok(Self::default())
    }
}

/// Replaces a missing binding with a fallback value, other errors are returned as is.
///
/// Used by `#[derive(Inject)]` for fields marked with `#[inject(default)]`.
#[doc(hidden)]
#[inline]
pub fn or_else<T, F>(resolved: Result<T, Error>, fallback: F) -> Result<T, Error>
where
    F: FnOnce() -> T
{
    match resolved {
        Err(err) if err.is_missing_binding() => Ok(fallback()),
        resolved => resolved
    }
}
