//! # DonatonUIS backend services
//!
//! Wires the capability contracts of the clothing donation backend
//! (user accounts, authentication, garments, images, email, notifications and validation)
//! into a [`donaton_di::Container`] owned by [`App`].
//!
//! ```no_run
//! use donaton::{App, AppConfig, services::DomainValidator};
//!
//! let app = App::new(AppConfig::from_env()?);
//! app.verify()?;
//!
//! let validator = app.resolve::<dyn DomainValidator>()?;
//! assert!(validator.validate_email("ana@correo.uis.edu.co"));
//! # Ok::<(), donaton::error::Error>(())
//! ```

pub use crate::{
    app::{App, configure_dependencies},
    config::AppConfig,
};

pub mod app;
pub mod config;
pub mod error;
pub mod services;
