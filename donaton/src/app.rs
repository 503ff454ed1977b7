//! Main application entry point

use crate::{
    config::AppConfig,
    error::Error,
    services::{
        AuthenticationService, DomainValidator, EmailService, ExternalAuthProvider,
        GarmentRepository, ImageService, NotificationService, UserRepository,
    },
};
use donaton_di::Container;
use std::sync::{Arc, OnceLock};

pub use wiring::configure_dependencies;

mod wiring;

/// Owns the configuration and the service container of the backend.
///
/// The container is configured on first use, handlers and background tasks
/// resolve their dependencies through [`App::resolve`].
///
/// # Example
/// ```no_run
/// use donaton::{App, AppConfig, services::EmailService};
///
/// let app = App::new(AppConfig::default());
/// let email = app.resolve::<dyn EmailService>().unwrap();
///
/// assert!(email.send_password_reset("ana@uis.edu.co", "Temp1234"));
/// ```
#[derive(Debug, Default)]
pub struct App {
    config: AppConfig,
    container: OnceLock<Container>,
}

impl App {
    /// Creates a new app with the given configuration
    #[inline]
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            container: OnceLock::new(),
        }
    }

    /// Returns the configuration of the app
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the service container, binding the services on first call
    pub fn container(&self) -> &Container {
        self.container.get_or_init(|| {
            let container = Container::new();
            configure_dependencies(&container, &self.config);
            container
        })
    }

    /// Resolves `A` from the service container
    #[inline]
    pub fn resolve<A>(&self) -> Result<Arc<A>, Error>
    where
        A: ?Sized + Send + Sync + 'static
    {
        self.container()
            .resolve::<A>()
            .map_err(Error::from)
    }

    /// Resolves every backend service once, so that a missing binding
    /// fails the startup instead of the first request
    pub fn verify(&self) -> Result<(), Error> {
        self.resolve::<dyn UserRepository>()?;
        self.resolve::<dyn AuthenticationService>()?;
        self.resolve::<dyn ExternalAuthProvider>()?;
        self.resolve::<dyn NotificationService>()?;
        self.resolve::<dyn GarmentRepository>()?;
        self.resolve::<dyn ImageService>()?;
        self.resolve::<dyn EmailService>()?;
        self.resolve::<dyn DomainValidator>()?;

        tracing::info!("{} services verified", self.container().bound_names().len());
        Ok(())
    }
}
