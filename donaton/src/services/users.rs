//! User accounts

use crate::error::Error;
use donaton_di::abstraction;
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard}
};

/// Identifier of a user account
pub type UserId = u64;

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Account identifier
    pub id: UserId,
    /// Unique login name
    pub username: String,
    /// Institutional email, always trimmed and lower-cased
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Inactive users can't sign in
    pub is_active: bool,
}

/// Registration data of a new user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    /// Unique login name
    pub username: String,
    /// Institutional email
    pub email: String,
    /// Given name
    #[serde(default)]
    pub first_name: String,
    /// Family name
    #[serde(default)]
    pub last_name: String,
    /// Plain text password, hashed before it's stored
    pub password: String,
}

/// Partial update of a user profile, `None` fields are left as is
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserChanges {
    /// New given name
    pub first_name: Option<String>,
    /// New family name
    pub last_name: Option<String>,
    /// New email
    pub email: Option<String>,
    /// Activates or deactivates the account
    pub is_active: Option<bool>,
}

/// Storage of user accounts
pub trait UserRepository: Send + Sync {
    /// Creates a new user with a hashed password
    ///
    /// # Errors
    /// [`Error::Conflict`] if the email or the username is already taken
    fn create_user(&self, user: NewUser) -> Result<User, Error>;

    /// Returns the user with the given `id`
    fn find_by_id(&self, id: UserId) -> Option<User>;

    /// Returns the user with the given email, the comparison ignores case and surrounding whitespace
    fn find_by_email(&self, email: &str) -> Option<User>;

    /// Returns the user with the given username
    fn find_by_username(&self, username: &str) -> Option<User>;

    /// Applies `changes` to the user and returns the updated user
    fn update_user(&self, id: UserId, changes: UserChanges) -> Result<User, Error>;

    /// Replaces the password of the user
    fn update_password(&self, id: UserId, new_password: &str) -> Result<(), Error>;

    /// Replaces the username of the user
    fn update_username(&self, id: UserId, new_username: &str) -> Result<(), Error>;

    /// Checks whether the `username` is taken by any user other than `exclude`
    fn username_exists(&self, username: &str, exclude: Option<UserId>) -> bool;

    /// Deletes the user, returns `false` if there was no such user
    fn delete_user(&self, id: UserId) -> bool;

    /// Checks whether the email is taken, the comparison ignores case and surrounding whitespace
    fn email_exists(&self, email: &str) -> bool;
}

/// Trims and lower-cases an email
#[inline]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Default)]
struct Users {
    by_id: BTreeMap<UserId, User>,
    last_id: UserId,
}

/// [`UserRepository`] that keeps accounts in memory
#[derive(Debug)]
pub struct InMemoryUserRepository {
    users: RwLock<Users>,
    hash_cost: u32,
}

impl Default for InMemoryUserRepository {
    #[inline]
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl InMemoryUserRepository {
    /// Creates an empty repository that hashes passwords with the given bcrypt cost
    pub fn new(hash_cost: u32) -> Self {
        Self {
            users: RwLock::new(Users::default()),
            hash_cost,
        }
    }

    #[inline]
    fn hash(&self, password: &str) -> Result<String, Error> {
        bcrypt::hash(password, self.hash_cost).map_err(Error::from)
    }

    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, Users> {
        self.users.read().expect("user repository lock poisoned")
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, Users> {
        self.users.write().expect("user repository lock poisoned")
    }
}

impl Users {
    fn find_by_email(&self, email: &str) -> Option<&User> {
        self.by_id.values().find(|user| user.email == email)
    }

    fn username_taken(&self, username: &str, exclude: Option<UserId>) -> bool {
        self.by_id
            .values()
            .any(|user| user.username == username && Some(user.id) != exclude)
    }

    fn get_mut(&mut self, id: UserId) -> Result<&mut User, Error> {
        self.by_id
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(format!("user {id}")))
    }
}

impl UserRepository for InMemoryUserRepository {
    fn create_user(&self, user: NewUser) -> Result<User, Error> {
        let email = normalize_email(&user.email);
        let password_hash = self.hash(&user.password)?;

        let mut users = self.write();
        if users.find_by_email(&email).is_some() {
            return Err(Error::conflict(format!("email {email} is already registered")));
        }
        if users.username_taken(&user.username, None) {
            return Err(Error::conflict(format!("username {} is already taken", user.username)));
        }

        users.last_id += 1;
        let created = User {
            id: users.last_id,
            username: user.username,
            email,
            first_name: user.first_name,
            last_name: user.last_name,
            password_hash,
            is_active: true,
        };
        users.by_id.insert(created.id, created.clone());

        tracing::debug!("user {} created", created.id);
        Ok(created)
    }

    fn find_by_id(&self, id: UserId) -> Option<User> {
        self.read().by_id.get(&id).cloned()
    }

    fn find_by_email(&self, email: &str) -> Option<User> {
        self.read()
            .find_by_email(&normalize_email(email))
            .cloned()
    }

    fn find_by_username(&self, username: &str) -> Option<User> {
        self.read()
            .by_id
            .values()
            .find(|user| user.username == username)
            .cloned()
    }

    fn update_user(&self, id: UserId, changes: UserChanges) -> Result<User, Error> {
        let mut users = self.write();
        let email = changes.email.as_deref().map(normalize_email);
        if let Some(email) = &email {
            if users.find_by_email(email).is_some_and(|other| other.id != id) {
                return Err(Error::conflict(format!("email {email} is already registered")));
            }
        }

        let user = users.get_mut(id)?;
        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(is_active) = changes.is_active {
            user.is_active = is_active;
        }
        Ok(user.clone())
    }

    fn update_password(&self, id: UserId, new_password: &str) -> Result<(), Error> {
        let password_hash = self.hash(new_password)?;
        self.write().get_mut(id)?.password_hash = password_hash;
        Ok(())
    }

    fn update_username(&self, id: UserId, new_username: &str) -> Result<(), Error> {
        let mut users = self.write();
        if users.username_taken(new_username, Some(id)) {
            return Err(Error::conflict(format!("username {new_username} is already taken")));
        }
        users.get_mut(id)?.username = new_username.into();
        Ok(())
    }

    fn username_exists(&self, username: &str, exclude: Option<UserId>) -> bool {
        self.read().username_taken(username, exclude)
    }

    fn delete_user(&self, id: UserId) -> bool {
        self.write().by_id.remove(&id).is_some()
    }

    fn email_exists(&self, email: &str) -> bool {
        self.read()
            .find_by_email(&normalize_email(email))
            .is_some()
    }
}

abstraction!(dyn UserRepository => InMemoryUserRepository);
