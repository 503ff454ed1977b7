//! Application configuration

use crate::{error::Error, services::validation::DEFAULT_ALLOWED_DOMAINS};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf}
};

/// Path to a JSON configuration file
pub const CONFIG_VAR: &str = "DONATON_CONFIG";
/// Overrides [`AppConfig::media_root`]
pub const MEDIA_ROOT_VAR: &str = "DONATON_MEDIA_ROOT";
/// Overrides [`AppConfig::media_url`]
pub const MEDIA_URL_VAR: &str = "DONATON_MEDIA_URL";
/// Overrides [`AppConfig::email_sender`]
pub const EMAIL_SENDER_VAR: &str = "DONATON_EMAIL_SENDER";
/// Overrides [`AppConfig::allowed_domains`], comma separated
pub const ALLOWED_DOMAINS_VAR: &str = "DONATON_ALLOWED_DOMAINS";
/// Overrides [`AppConfig::password_hash_cost`]
pub const PASSWORD_HASH_COST_VAR: &str = "DONATON_PASSWORD_HASH_COST";

/// Settings the services are constructed with
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Folder uploaded images are stored in
    ///
    /// Default: `media`
    media_root: PathBuf,

    /// Prefix of public image URLs
    ///
    /// Default: `/media/`
    media_url: String,

    /// Sender address of outgoing email
    ///
    /// Default: `noreply@donatonuis.com`
    email_sender: String,

    /// Email domains accepted for registration
    ///
    /// Default: `@correo.uis.edu.co`, `@uis.edu.co`
    allowed_domains: Vec<String>,

    /// bcrypt cost of password hashes, from 4 to 31
    ///
    /// Default: `12`
    password_hash_cost: u32,
}

impl Default for AppConfig {
    #[inline]
    fn default() -> Self {
        Self {
            media_root: PathBuf::from("media"),
            media_url: "/media/".into(),
            email_sender: "noreply@donatonuis.com".into(),
            allowed_domains: DEFAULT_ALLOWED_DOMAINS.map(String::from).into(),
            password_hash_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AppConfig {
    /// Parses the configuration from JSON, missing fields keep their defaults
    ///
    /// # Example
    /// ```
    /// use donaton::AppConfig;
    ///
    /// let config = AppConfig::from_json(r#"{ "media_url": "https://cdn.donatonuis.com/" }"#).unwrap();
    ///
    /// assert_eq!(config.media_url(), "https://cdn.donatonuis.com/");
    /// assert_eq!(config.email_sender(), "noreply@donatonuis.com");
    /// ```
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()
    }

    /// Reads the configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("unable to read {}: {err}", path.display())))?;
        Self::from_json(&json)
    }

    /// Loads the configuration from the process environment
    ///
    /// Reads the file named by `DONATON_CONFIG` if set, then applies the
    /// `DONATON_MEDIA_ROOT`, `DONATON_MEDIA_URL`, `DONATON_EMAIL_SENDER`,
    /// `DONATON_ALLOWED_DOMAINS` and `DONATON_PASSWORD_HASH_COST` overrides.
    #[inline]
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`AppConfig::from_env`], with variables taken from `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>
    {
        let mut config = match lookup(CONFIG_VAR) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(media_root) = lookup(MEDIA_ROOT_VAR) {
            config.media_root = media_root.into();
        }
        if let Some(media_url) = lookup(MEDIA_URL_VAR) {
            config.media_url = media_url;
        }
        if let Some(sender) = lookup(EMAIL_SENDER_VAR) {
            config.email_sender = sender;
        }
        if let Some(domains) = lookup(ALLOWED_DOMAINS_VAR) {
            config.allowed_domains = domains
                .split(',')
                .map(str::trim)
                .filter(|domain| !domain.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(cost) = lookup(PASSWORD_HASH_COST_VAR) {
            config.password_hash_cost = cost
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{PASSWORD_HASH_COST_VAR} must be a number, got {cost:?}")))?;
        }

        config.validate()
    }

    /// Sets the folder uploaded images are stored in
    pub fn with_media_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.media_root = root.into();
        self
    }

    /// Sets the prefix of public image URLs
    pub fn with_media_url(mut self, url: impl Into<String>) -> Self {
        self.media_url = url.into();
        self
    }

    /// Sets the sender address of outgoing email
    pub fn with_email_sender(mut self, sender: impl Into<String>) -> Self {
        self.email_sender = sender.into();
        self
    }

    /// Replaces the email domains accepted for registration
    pub fn with_allowed_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        self.allowed_domains = domains.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the bcrypt cost of password hashes
    ///
    /// Low costs are only meant for tests.
    pub fn with_password_hash_cost(mut self, cost: u32) -> Self {
        self.password_hash_cost = cost;
        self
    }

    /// Returns the folder uploaded images are stored in
    #[inline]
    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// Returns the prefix of public image URLs
    #[inline]
    pub fn media_url(&self) -> &str {
        &self.media_url
    }

    /// Returns the sender address of outgoing email
    #[inline]
    pub fn email_sender(&self) -> &str {
        &self.email_sender
    }

    /// Returns the email domains accepted for registration
    #[inline]
    pub fn allowed_domains(&self) -> &[String] {
        &self.allowed_domains
    }

    /// Returns the bcrypt cost of password hashes
    #[inline]
    pub fn password_hash_cost(&self) -> u32 {
        self.password_hash_cost
    }

    fn validate(self) -> Result<Self, Error> {
        if !(4..=31).contains(&self.password_hash_cost) {
            return Err(Error::Config(format!(
                "password hash cost must be between 4 and 31, got {}",
                self.password_hash_cost
            )));
        }
        if self.allowed_domains.is_empty() {
            return Err(Error::Config("at least one email domain must be allowed".into()));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn it_creates_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.media_root(), Path::new("media"));
        assert_eq!(config.media_url(), "/media/");
        assert_eq!(config.email_sender(), "noreply@donatonuis.com");
        assert_eq!(config.allowed_domains(), ["@correo.uis.edu.co", "@uis.edu.co"]);
        assert_eq!(config.password_hash_cost(), bcrypt::DEFAULT_COST);
    }

    #[test]
    fn it_builds_config() {
        let config = AppConfig::default()
            .with_media_root("/srv/media")
            .with_media_url("https://cdn.donatonuis.com/")
            .with_email_sender("soporte@donatonuis.com")
            .with_allowed_domains(["@example.org"])
            .with_password_hash_cost(4);

        assert_eq!(config.media_root(), Path::new("/srv/media"));
        assert_eq!(config.media_url(), "https://cdn.donatonuis.com/");
        assert_eq!(config.email_sender(), "soporte@donatonuis.com");
        assert_eq!(config.allowed_domains(), ["@example.org"]);
        assert_eq!(config.password_hash_cost(), 4);
    }

    #[test]
    fn it_parses_partial_json() {
        let config = AppConfig::from_json(r#"{ "media_root": "/data", "password_hash_cost": 6 }"#).unwrap();

        assert_eq!(config.media_root(), Path::new("/data"));
        assert_eq!(config.password_hash_cost(), 6);
        assert_eq!(config.media_url(), "/media/");
    }

    #[test]
    fn it_rejects_invalid_json() {
        assert!(matches!(AppConfig::from_json("{ media_root"), Err(Error::Config(_))));
        assert!(matches!(AppConfig::from_json(r#"{ "password_hash_cost": 3 }"#), Err(Error::Config(_))));
        assert!(matches!(AppConfig::from_json(r#"{ "allowed_domains": [] }"#), Err(Error::Config(_))));
    }

    #[test]
    fn it_applies_environment_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (MEDIA_URL_VAR, "/static/"),
            (EMAIL_SENDER_VAR, "soporte@donatonuis.com"),
            (ALLOWED_DOMAINS_VAR, " @uis.edu.co, ,@example.org "),
            (PASSWORD_HASH_COST_VAR, "5"),
        ])).unwrap();

        assert_eq!(config.media_url(), "/static/");
        assert_eq!(config.email_sender(), "soporte@donatonuis.com");
        assert_eq!(config.allowed_domains(), ["@uis.edu.co", "@example.org"]);
        assert_eq!(config.password_hash_cost(), 5);
        assert_eq!(config.media_root(), Path::new("media"));
    }

    #[test]
    fn it_reads_config_file_before_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("donaton.json");
        fs::write(&path, r#"{ "media_root": "/data", "media_url": "/files/" }"#).unwrap();

        let config = AppConfig::from_lookup(lookup(&[
            (CONFIG_VAR, path.to_str().unwrap()),
            (MEDIA_URL_VAR, "/static/"),
        ])).unwrap();

        assert_eq!(config.media_root(), Path::new("/data"));
        assert_eq!(config.media_url(), "/static/");
    }

    #[test]
    fn it_reports_missing_config_file() {
        let err = AppConfig::from_lookup(lookup(&[(CONFIG_VAR, "/definitely/missing.json")])).unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("/definitely/missing.json"));
    }

    #[test]
    fn it_rejects_invalid_cost() {
        let err = AppConfig::from_lookup(lookup(&[(PASSWORD_HASH_COST_VAR, "high")])).unwrap_err();

        assert!(err.to_string().contains(PASSWORD_HASH_COST_VAR));
    }
}
