//! Mapping between implementations and the abstractions they are bound to

use std::sync::Arc;

/// Describes that a shared `T` can be used where `Self` is requested.
///
/// Every `T` is an abstraction of itself, so concrete types can be bound and resolved directly.
/// Trait objects get their implementations from the [`abstraction!`](crate::abstraction!) macro.
pub trait Abstraction<T>: Send + Sync + 'static {
    /// Converts a shared implementation into a shared abstraction
    fn upcast(service: Arc<T>) -> Arc<Self>;
}

impl<T: Send + Sync + 'static> Abstraction<T> for T {
    #[inline]
    fn upcast(service: Arc<T>) -> Arc<Self> {
        service
    }
}

/// Declares which types implement a trait-object abstraction.
///
/// The trait must be in scope and have `Send + Sync` as supertraits.
///
/// # Macro Syntax
/// ```ignore
/// abstraction!(dyn Trait => Type1, Type2, …, TypeN);
/// ```
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use donaton_di::{abstraction, Abstraction};
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// struct Fixed;
///
/// impl Clock for Fixed {
///     fn now(&self) -> u64 { 42 }
/// }
///
/// abstraction!(dyn Clock => Fixed);
///
/// let clock: Arc<dyn Clock> = <dyn Clock as Abstraction<Fixed>>::upcast(Arc::new(Fixed));
/// assert_eq!(clock.now(), 42);
/// ```
#[macro_export]
macro_rules! abstraction {
    (dyn $iface:ident => $($implementation:ty),+ $(,)?) => {
        $(impl $crate::Abstraction<$implementation> for dyn $iface {
            #[inline]
            fn upcast(service: ::std::sync::Arc<$implementation>) -> ::std::sync::Arc<Self> {
                service
            }
        })+
    };
}
