//! Registry entries and the closures that produce services

use super::{Container, FromContainer, GenericFactory};
use crate::{Abstraction, Inject, error::Error};
use std::{
    any::Any,
    fmt::{self, Debug},
    sync::{Arc, Mutex}
};

/// Type-erased service, holds an `Arc<A>` for the abstraction `A`
pub(crate) type ArcService = Arc<
    dyn Any
    + Send
    + Sync
>;

pub(crate) type Provider = Arc<
    dyn Fn(&Container) -> Result<ArcService, Error>
    + Send
    + Sync
>;

/// How a binding produces its service
#[derive(Clone)]
pub(crate) enum Activation {
    Instance(ArcService),
    Factory(Provider),
    Constructor(Provider),
}

impl Activation {
    #[inline]
    fn kind(&self) -> &'static str {
        match self {
            Activation::Instance(_) => "instance",
            Activation::Factory(_) => "factory",
            Activation::Constructor(_) => "constructor",
        }
    }
}

#[derive(Clone)]
pub(crate) struct Binding {
    pub(crate) name: &'static str,
    pub(crate) activation: Activation,
    pub(crate) singleton: bool,
    /// Serializes the construction of a singleton
    pub(crate) init_guard: Arc<Mutex<()>>,
}

impl Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("name", &self.name)
            .field("activation", &self.activation.kind())
            .field("singleton", &self.singleton)
            .finish()
    }
}

impl Binding {
    #[inline]
    pub(crate) fn new(name: &'static str, activation: Activation, singleton: bool) -> Self {
        Self {
            name,
            activation,
            singleton,
            init_guard: Arc::new(Mutex::new(())),
        }
    }

    /// Copies the binding with its own construction guard
    #[inline]
    pub(crate) fn detached(&self) -> Self {
        Self::new(self.name, self.activation.clone(), self.singleton)
    }
}

#[inline]
pub(crate) fn erase<A>(service: Arc<A>) -> ArcService
where
    A: ?Sized + Send + Sync + 'static
{
    Arc::new(service)
}

#[inline]
pub(crate) fn make_constructor<A, T>() -> Provider
where
    A: ?Sized + Abstraction<T>,
    T: Inject + 'static
{
    Arc::new(|c: &Container| -> Result<ArcService, Error> {
        T::inject(c)
            .map_err(missing_dependency_of::<T>)
            .map(|t| erase(A::upcast(Arc::new(t))))
    })
}

#[inline]
pub(crate) fn make_factory<A, F, Args>(factory: F) -> Provider
where
    A: ?Sized + Abstraction<F::Output>,
    F: GenericFactory<Args>,
    Args: FromContainer
{
    Arc::new(move |c: &Container| -> Result<ArcService, Error> {
        let args = Args::from_container(c)
            .map_err(missing_dependency_of::<F::Output>)?;
        factory.call(args)
            .map_err(missing_dependency_of::<F::Output>)
            .map(|t| erase(A::upcast(Arc::new(t))))
    })
}

/// Names the type under construction when one of its dependencies has no binding
#[inline]
fn missing_dependency_of<T>(err: Error) -> Error {
    match err {
        Error::UnboundAbstraction(dependency) => Error::UnresolvableDependency {
            dependency,
            implementation: std::any::type_name::<T>()
        },
        err => err
    }
}
