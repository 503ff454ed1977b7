//! Generic factory for resolving types

use super::Error;

/// A trait that describes a generic factory function
/// that can produce objects bound in the DI container
///
/// Zero-argument closures are infallible, closures with arguments
/// receive them from the container and may fail.
pub trait GenericFactory<Args>: Send + Sync + 'static {
    /// A type of object that will be produced
    type Output: Send + Sync + 'static;

    /// Calls a generic function and returns either produced object or error
    fn call(&self, args: Args) -> Result<Self::Output, Error>;
}

impl<F, R> GenericFactory<()> for F
where
    F: Fn() -> R + Send + Sync + 'static,
    R: Send + Sync + 'static
{
    type Output = R;

    #[inline]
    fn call(&self, _: ()) -> Result<Self::Output, Error> {
        Ok(self())
    }
}

macro_rules! define_generic_factory ({ $($param:ident)* } => {
    impl<F, R, $($param,)*> GenericFactory<($($param,)*)> for F
    where
        F: Fn($($param),*) -> Result<R, Error> + Send + Sync + 'static,
        R: Send + Sync + 'static
    {
        type Output = R;

        #[inline]
        #[allow(non_snake_case)]
        fn call(&self, ($($param,)*): ($($param,)*)) -> Result<Self::Output, Error> {
            (self)($($param,)*)
        }
    }
});

define_generic_factory! { T1 }
define_generic_factory! { T1 T2 }
define_generic_factory! { T1 T2 T3 }
define_generic_factory! { T1 T2 T3 T4 }
define_generic_factory! { T1 T2 T3 T4 T5 }

#[cfg(test)]
mod tests {
    use crate::Container;
    use super::*;
    use std::sync::Arc;

    #[derive(Debug, Clone, Copy)]
    struct X(i32);

    #[derive(Debug, Clone, Copy)]
    struct Y(i32);

    #[derive(Debug, Clone, Copy)]
    struct Point(X, Y);

    #[test]
    fn it_resolves_factory_arguments() {
        let container = Container::new();
        container.bind_factory::<X, _, _>(|| X(1));
        container.bind_factory::<Y, _, _>(|| Y(2));
        container.bind_factory::<Point, _, _>(|x: Arc<X>, y: Arc<Y>| Ok(Point(*x, *y)));

        let point = container.resolve::<Point>().unwrap();

        assert_eq!(point.0.0, 1);
        assert_eq!(point.1.0, 2);
    }

    #[test]
    fn it_resolves_from_container_argument() {
        let container = Container::new();
        container.bind_factory::<X, _, _>(|| X(1));
        container.bind_factory::<Y, _, _>(|| Y(2));
        container.bind_factory::<Point, _, _>(|c: Container| {
            let x = c.resolve::<X>()?;
            let y = c.resolve::<Y>()?;
            Ok(Point(*x, *y))
        });

        let point = container.resolve::<Point>().unwrap();

        assert_eq!(point.0.0, 1);
        assert_eq!(point.1.0, 2);
    }

    #[test]
    fn it_reports_missing_factory_argument() {
        let container = Container::new();
        container.bind_factory::<X, _, _>(|| X(1));
        container.bind_factory::<Point, _, _>(|x: Arc<X>, y: Arc<Y>| Ok(Point(*x, *y)));

        let err = container.resolve::<Point>().unwrap_err();

        match err {
            Error::UnresolvableDependency { dependency, implementation } => {
                assert!(dependency.ends_with("Y"));
                assert!(implementation.ends_with("Point"));
            },
            _ => panic!("Expected UnresolvableDependency error")
        }
    }

    #[test]
    fn it_propagates_factory_error_unchanged() {
        let container = Container::new();
        container.bind_factory::<X, _, _>(|_: Container| -> Result<X, Error> {
            Err(Error::other("connection refused"))
        });

        let err = container.resolve::<X>().unwrap_err();

        assert!(matches!(err, Error::Other(_)));
        assert_eq!(err.to_string(), "connection refused");
    }
}
