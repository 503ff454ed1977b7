//! Authentication with passwords and tokens

use super::users::{User, UserId, UserRepository};
use donaton_di::{abstraction, Inject};
use std::{
    collections::HashMap,
    sync::{Arc, RwLock}
};
use uuid::Uuid;

/// Signs users in and issues access tokens
pub trait AuthenticationService: Send + Sync {
    /// Returns the active user with the given email if the `password` matches
    fn authenticate(&self, email: &str, password: &str) -> Option<User>;

    /// Returns the active user with the given username if the `password` matches
    fn authenticate_user(&self, username: &str, password: &str) -> Option<User>;

    /// Checks the `password` against the stored hash of the `user`
    fn verify_password(&self, user: &User, password: &str) -> bool;

    /// Returns the token of the `user`, creating one on first call
    fn get_or_create_token(&self, user: &User) -> String;

    /// Returns the active user that owns the `token`
    fn validate_token(&self, token: &str) -> Option<User>;
}

#[derive(Debug, Default)]
struct Tokens {
    by_user: HashMap<UserId, String>,
    by_token: HashMap<String, UserId>,
}

/// [`AuthenticationService`] backed by the [`UserRepository`] and in-memory tokens
#[derive(Inject)]
pub struct TokenAuthenticationService {
    users: Arc<dyn UserRepository>,
    #[inject(skip)]
    tokens: RwLock<Tokens>,
}

impl std::fmt::Debug for TokenAuthenticationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthenticationService")
            .finish_non_exhaustive()
    }
}

impl TokenAuthenticationService {
    /// Creates a service that signs in the users of the given repository
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            users,
            tokens: RwLock::default(),
        }
    }

    #[inline]
    fn check(&self, user: Option<User>, password: &str) -> Option<User> {
        user.filter(|user| user.is_active && self.verify_password(user, password))
    }
}

impl AuthenticationService for TokenAuthenticationService {
    fn authenticate(&self, email: &str, password: &str) -> Option<User> {
        self.check(self.users.find_by_email(email), password)
    }

    fn authenticate_user(&self, username: &str, password: &str) -> Option<User> {
        self.check(self.users.find_by_username(username), password)
    }

    fn verify_password(&self, user: &User, password: &str) -> bool {
        bcrypt::verify(password, &user.password_hash).unwrap_or(false)
    }

    fn get_or_create_token(&self, user: &User) -> String {
        let mut tokens = self.tokens
            .write()
            .expect("token store lock poisoned");
        if let Some(token) = tokens.by_user.get(&user.id) {
            return token.clone();
        }

        let token = Uuid::new_v4().simple().to_string();
        tokens.by_user.insert(user.id, token.clone());
        tokens.by_token.insert(token.clone(), user.id);

        tracing::debug!("token issued for user {}", user.id);
        token
    }

    fn validate_token(&self, token: &str) -> Option<User> {
        let id = *self.tokens
            .read()
            .expect("token store lock poisoned")
            .by_token
            .get(token)?;
        self.users
            .find_by_id(id)
            .filter(|user| user.is_active)
    }
}

abstraction!(dyn AuthenticationService => TokenAuthenticationService);
