//! Capability contracts of the backend and their in-process implementations
//!
//! Every contract is an object-safe trait resolved from the container as `Arc<dyn Trait>`.

pub use self::{
    auth::{AuthenticationService, TokenAuthenticationService},
    email::{EmailService, OutboxEmailService},
    external::{ExternalAuthProvider, InProcessAuthDirectory},
    garments::{GarmentRepository, InMemoryGarmentRepository},
    images::{ImageService, LocalImageService},
    notifications::{InMemoryNotificationService, NotificationService},
    users::{InMemoryUserRepository, UserRepository},
    validation::{DomainValidator, UisEmailValidator},
};

pub mod auth;
pub mod email;
pub mod external;
pub mod garments;
pub mod images;
pub mod notifications;
pub mod users;
pub mod validation;
