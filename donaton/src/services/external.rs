//! External identity provider

use super::users::normalize_email;
use donaton_di::abstraction;
use std::{
    collections::HashMap,
    sync::{RwLock, RwLockWriteGuard}
};

/// Password of accounts whose credentials are managed by Microsoft sign-in
pub const MICROSOFT_AUTH: &str = "MICROSOFT_AUTH";

/// Mirrors user accounts into an external identity provider
pub trait ExternalAuthProvider: Send + Sync {
    /// Creates the account, returns `true` on success
    fn create_user(&self, email: &str, password: &str) -> bool;

    /// Changes the password of the account, returns `false` if there is no such account
    fn update_password(&self, email: &str, new_password: &str) -> bool;

    /// Deletes the account, returns `false` if there is no such account
    fn delete_user(&self, email: &str) -> bool;
}

/// [`ExternalAuthProvider`] that keeps the directory in process.
///
/// Only the number of password changes is tracked per account, passwords are never stored.
#[derive(Debug, Default)]
pub struct InProcessAuthDirectory {
    accounts: RwLock<HashMap<String, u32>>,
}

impl InProcessAuthDirectory {
    /// Checks whether the directory has an account for the email
    pub fn contains(&self, email: &str) -> bool {
        self.accounts
            .read()
            .expect("auth directory lock poisoned")
            .contains_key(&normalize_email(email))
    }

    /// Returns how many times the password of the account was changed
    pub fn password_revision(&self, email: &str) -> Option<u32> {
        self.accounts
            .read()
            .expect("auth directory lock poisoned")
            .get(&normalize_email(email))
            .copied()
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, u32>> {
        self.accounts.write().expect("auth directory lock poisoned")
    }
}

impl ExternalAuthProvider for InProcessAuthDirectory {
    fn create_user(&self, email: &str, password: &str) -> bool {
        if password == MICROSOFT_AUTH {
            tracing::debug!("{email} is managed by Microsoft sign-in, skipping");
            return true;
        }
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return false;
        }
        let mut accounts = self.write();
        if accounts.contains_key(&email) {
            return false;
        }
        accounts.insert(email, 0);
        true
    }

    fn update_password(&self, email: &str, new_password: &str) -> bool {
        if new_password.is_empty() {
            return false;
        }
        match self.write().get_mut(&normalize_email(email)) {
            Some(revision) => {
                *revision += 1;
                true
            },
            None => false
        }
    }

    fn delete_user(&self, email: &str) -> bool {
        self.write()
            .remove(&normalize_email(email))
            .is_some()
    }
}

abstraction!(dyn ExternalAuthProvider => InProcessAuthDirectory);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_creates_and_deletes_accounts() {
        let directory = InProcessAuthDirectory::default();

        assert!(directory.create_user("Ana@uis.edu.co", "secreto123"));
        assert!(directory.contains("ana@uis.edu.co"));
        assert!(!directory.create_user("ana@uis.edu.co", "secreto123"));

        assert!(directory.delete_user("ANA@uis.edu.co"));
        assert!(!directory.delete_user("ana@uis.edu.co"));
    }

    #[test]
    fn it_treats_microsoft_accounts_as_created() {
        let directory = InProcessAuthDirectory::default();

        assert!(directory.create_user("ana@uis.edu.co", MICROSOFT_AUTH));
        assert!(directory.create_user("ana@uis.edu.co", MICROSOFT_AUTH));
        assert!(!directory.contains("ana@uis.edu.co"));
    }

    #[test]
    fn it_updates_password_of_existing_account() {
        let directory = InProcessAuthDirectory::default();
        directory.create_user("ana@uis.edu.co", "secreto123");

        assert!(directory.update_password("ana@uis.edu.co", "nuevaClave1"));
        assert!(directory.update_password("ana@uis.edu.co", "otraClave2"));
        assert!(!directory.update_password("ana@uis.edu.co", ""));
        assert!(!directory.update_password("luis@uis.edu.co", "nuevaClave1"));
        assert_eq!(directory.password_revision("ana@uis.edu.co"), Some(2));
    }

    #[test]
    fn it_rejects_empty_credentials() {
        let directory = InProcessAuthDirectory::default();

        assert!(!directory.create_user("  ", "secreto123"));
        assert!(!directory.create_user("ana@uis.edu.co", ""));
    }
}
