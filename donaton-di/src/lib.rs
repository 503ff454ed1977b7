//! Service container for the DonatonUIS backend
//!
//! Handlers depend on abstractions (`dyn Trait`) and the [`Container`] decides
//! which implementation backs each of them, how it is constructed and how long it lives.
//!
//! ```
//! use std::sync::Arc;
//! use donaton_di::{abstraction, Container};
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! #[derive(Default)]
//! struct English;
//!
//! impl Greeter for English {
//!     fn greet(&self) -> String { "hello".into() }
//! }
//!
//! abstraction!(dyn Greeter => English);
//!
//! let container = Container::new();
//! container.bind_singleton::<dyn Greeter, English>();
//!
//! let greeter: Arc<dyn Greeter> = container.resolve().unwrap();
//! assert_eq!(greeter.greet(), "hello");
//! ```

extern crate self as donaton_di;

pub use crate::{
    abstraction::Abstraction,
    container::{Container, FromContainer, GenericFactory},
    inject::Inject,
};

#[cfg(feature = "macros")]
pub use donaton_macros::Inject;

pub mod abstraction;
pub mod container;
pub mod error;
pub mod inject;
