//! Institutional account rules

use donaton_di::abstraction;
use regex::Regex;
use std::sync::LazyLock;

/// Email domains accepted when no others are configured
pub const DEFAULT_ALLOWED_DOMAINS: [&str; 2] = ["@correo.uis.edu.co", "@uis.edu.co"];

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

static USERNAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid username pattern")
});

/// Validates user input against the rules of the institution
pub trait DomainValidator: Send + Sync {
    /// Checks that the email belongs to an allowed domain
    fn validate_email_domain(&self, email: &str) -> bool;

    /// Checks the email format and domain
    fn validate_email(&self, email: &str) -> bool;

    /// Checks that a new password has at least 8 characters and is not only whitespace
    fn validate_password_strength(&self, password: &str) -> bool;

    /// Checks that a password has at least 6 characters and is not only whitespace
    fn validate_password(&self, password: &str) -> bool;

    /// Checks that the username has 2 to 50 letters, digits, `_` or `-`
    fn validate_username(&self, username: &str) -> bool;
}

/// [`DomainValidator`] for UIS accounts
#[derive(Debug, Clone)]
pub struct UisEmailValidator {
    allowed_domains: Vec<String>,
}

impl Default for UisEmailValidator {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_DOMAINS)
    }
}

impl UisEmailValidator {
    /// Creates a validator that accepts the given email domains, e.g. `@uis.edu.co`
    pub fn new<I, S>(allowed_domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>
    {
        let allowed_domains = allowed_domains
            .into_iter()
            .map(|domain| domain.as_ref().trim().to_lowercase())
            .collect();
        Self { allowed_domains }
    }

    /// Returns the accepted email domains
    #[inline]
    pub fn allowed_domains(&self) -> &[String] {
        &self.allowed_domains
    }
}

#[inline]
fn has_min_chars(password: &str, min: usize) -> bool {
    password.chars().count() >= min && !password.chars().all(char::is_whitespace)
}

impl DomainValidator for UisEmailValidator {
    fn validate_email_domain(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.allowed_domains
            .iter()
            .any(|domain| email.ends_with(domain.as_str()))
    }

    fn validate_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        EMAIL_PATTERN.is_match(&email) && self.validate_email_domain(&email)
    }

    fn validate_password_strength(&self, password: &str) -> bool {
        has_min_chars(password, 8)
    }

    fn validate_password(&self, password: &str) -> bool {
        has_min_chars(password, 6)
    }

    fn validate_username(&self, username: &str) -> bool {
        (2..=50).contains(&username.chars().count()) && USERNAME_PATTERN.is_match(username)
    }
}

abstraction!(dyn DomainValidator => UisEmailValidator);
