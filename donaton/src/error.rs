//! Error Handling tools

use std::{
    error::Error as StdError,
    fmt,
    io::Error as IoError
};

use donaton_di::error::Error as ServicesError;

/// Generic application error
#[derive(Debug)]
pub enum Error {
    /// A dependency could not be resolved from the container
    Services(ServicesError),

    /// Configuration could not be loaded
    Config(String),

    /// File system error
    Io(IoError),

    /// Input rejected by a domain rule
    Validation(String),

    /// The entity already exists
    Conflict(String),

    /// The entity does not exist
    NotFound(String),

    /// A password could not be hashed
    PasswordHash(bcrypt::BcryptError),
}

impl Error {
    /// Creates a validation error
    #[inline]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a conflict error
    #[inline]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates a not found error
    #[inline]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Services(err) => err.fmt(f),
            Error::Config(msg) => write!(f, "Configuration Error: {msg}"),
            Error::Io(err) => err.fmt(f),
            Error::Validation(msg) => write!(f, "Validation Error: {msg}"),
            Error::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Error::NotFound(msg) => write!(f, "Not Found: {msg}"),
            Error::PasswordHash(err) => write!(f, "Password Error: {err}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Services(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::PasswordHash(err) => Some(err),
            _ => None
        }
    }
}

impl From<ServicesError> for Error {
    #[inline]
    fn from(err: ServicesError) -> Self {
        Self::Services(err)
    }
}

impl From<IoError> for Error {
    #[inline]
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    #[inline]
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for Error {
    #[inline]
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::PasswordHash(err)
    }
}
