//! Bindings of the backend services

use crate::{
    config::AppConfig,
    services::{
        AuthenticationService, DomainValidator, EmailService, ExternalAuthProvider,
        GarmentRepository, ImageService, NotificationService, UserRepository,
        InMemoryGarmentRepository, InMemoryNotificationService, InMemoryUserRepository,
        InProcessAuthDirectory, LocalImageService, OutboxEmailService, TokenAuthenticationService,
        UisEmailValidator,
    },
};
use donaton_di::Container;

/// Binds every capability contract of the backend to its implementation.
///
/// All services are singletons. Services that need settings are bound to factories
/// that capture the relevant parts of `config`.
pub fn configure_dependencies(container: &Container, config: &AppConfig) {
    let hash_cost = config.password_hash_cost();
    container.bind_singleton_factory::<dyn UserRepository, _, _>(
        move || InMemoryUserRepository::new(hash_cost)
    );
    container.bind_singleton::<dyn AuthenticationService, TokenAuthenticationService>();
    container.bind_singleton::<dyn ExternalAuthProvider, InProcessAuthDirectory>();
    container.bind_singleton::<dyn NotificationService, InMemoryNotificationService>();
    container.bind_singleton::<dyn GarmentRepository, InMemoryGarmentRepository>();

    let (media_root, media_url) = (config.media_root().to_path_buf(), config.media_url().to_owned());
    container.bind_singleton_factory::<dyn ImageService, _, _>(
        move || LocalImageService::new(media_root.clone(), media_url.clone())
    );

    let sender = config.email_sender().to_owned();
    container.bind_singleton_factory::<dyn EmailService, _, _>(
        move || OutboxEmailService::new(sender.clone())
    );

    let domains = config.allowed_domains().to_vec();
    container.bind_singleton_factory::<dyn DomainValidator, _, _>(
        move || UisEmailValidator::new(&domains)
    );

    tracing::debug!("backend services configured");
}
