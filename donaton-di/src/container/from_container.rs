//! Extractors for fetching data from DI container

use super::{Error, Container};
use std::sync::Arc;

/// A trait that defines how to extract the `Self` from DI container
pub trait FromContainer: Sized + Send + Sync {
    /// Extracts `Self` from DI container
    fn from_container(container: &Container) -> Result<Self, Error>;
}

impl FromContainer for Container {
    #[inline]
    fn from_container(container: &Container) -> Result<Self, Error> {
        Ok(container.clone())
    }
}

impl FromContainer for () {
    #[inline]
    fn from_container(_: &Container) -> Result<Self, Error> {
        Ok(())
    }
}

impl<A: ?Sized + Send + Sync + 'static> FromContainer for Arc<A> {
    #[inline]
    fn from_container(container: &Container) -> Result<Self, Error> {
        container.resolve::<A>()
    }
}

/// Resolves to `None` when the abstraction has no binding
impl<A: ?Sized + Send + Sync + 'static> FromContainer for Option<Arc<A>> {
    #[inline]
    fn from_container(container: &Container) -> Result<Self, Error> {
        match container.resolve::<A>() {
            Ok(service) => Ok(Some(service)),
            Err(Error::UnboundAbstraction(_)) => Ok(None),
            Err(err) => Err(err)
        }
    }
}

macro_rules! define_generic_from_container {
    ($($T: ident),*) => {
        impl<$($T: FromContainer),+> FromContainer for ($($T,)+) {
            #[inline]
            #[allow(non_snake_case)]
            fn from_container(container: &Container) -> Result<Self, Error>{
                let tuple = (
                    $(
                    $T::from_container(container)?,
                    )*
                );
                Ok(tuple)
            }
        }
    }
}

define_generic_from_container! { T1 }
define_generic_from_container! { T1, T2 }
define_generic_from_container! { T1, T2, T3 }
define_generic_from_container! { T1, T2, T3, T4 }
define_generic_from_container! { T1, T2, T3, T4, T5 }
