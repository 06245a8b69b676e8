//! Authentication collaborator.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, SkylarkError};

/// A registered user, without any storage details attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// User id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
}

/// Authentication collaborator contract.
pub trait AuthService: Send + Sync {
    /// Authenticate with email and password.
    fn login(&self, email: &str, password: &str) -> Result<UserInfo>;

    /// Register a new account and log it in.
    fn register(&self, name: &str, email: &str, password: &str) -> Result<UserInfo>;
}

/// SHA-256 hex digest of a password.
fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

struct StoredUser {
    info: UserInfo,
    password_hash: String,
}

/// In-memory user store.
pub struct InMemoryAuthService {
    users: Mutex<HashMap<String, StoredUser>>,
    next_id: Mutex<u64>,
}

impl InMemoryAuthService {
    /// Create an empty user store.
    pub fn new() -> Self {
        InMemoryAuthService {
            users: Mutex::new(HashMap::new()),
            next_id: Mutex::new(1),
        }
    }

    /// Create a store pre-seeded with one account, for demos and tests.
    pub fn with_user(name: &str, email: &str, password: &str) -> Self {
        let service = Self::new();
        service
            .register(name, email, password)
            .expect("seeding a fresh store cannot collide");
        service
    }
}

impl Default for InMemoryAuthService {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthService for InMemoryAuthService {
    fn login(&self, email: &str, password: &str) -> Result<UserInfo> {
        let users = self.users.lock().expect("auth store poisoned");
        match users.get(&email.to_lowercase()) {
            Some(user) if user.password_hash == hash_password(password) => Ok(user.info.clone()),
            _ => Err(SkylarkError::collaborator("invalid email or password")),
        }
    }

    fn register(&self, name: &str, email: &str, password: &str) -> Result<UserInfo> {
        let key = email.to_lowercase();
        let mut users = self.users.lock().expect("auth store poisoned");
        if users.contains_key(&key) {
            return Err(SkylarkError::collaborator("email already registered"));
        }

        let mut next_id = self.next_id.lock().expect("auth store poisoned");
        let info = UserInfo {
            id: *next_id,
            name: name.to_string(),
            email: email.to_string(),
        };
        *next_id += 1;

        users.insert(
            key,
            StoredUser {
                info: info.clone(),
                password_hash: hash_password(password),
            },
        );
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_then_login() {
        let service = InMemoryAuthService::new();
        let registered = service
            .register("Ada", "ada@example.com", "hunter2")
            .unwrap();

        let logged_in = service.login("ada@example.com", "hunter2").unwrap();
        assert_eq!(registered, logged_in);
    }

    #[test]
    fn test_login_is_case_insensitive_on_email() {
        let service = InMemoryAuthService::with_user("Ada", "Ada@Example.com", "hunter2");
        assert!(service.login("ada@example.com", "hunter2").is_ok());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let service = InMemoryAuthService::with_user("Ada", "ada@example.com", "hunter2");
        let err = service.login("ada@example.com", "wrong").unwrap_err();
        assert!(matches!(err, SkylarkError::Collaborator(_)));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let service = InMemoryAuthService::with_user("Ada", "ada@example.com", "hunter2");
        let err = service
            .register("Also Ada", "ada@example.com", "other")
            .unwrap_err();
        assert!(matches!(err, SkylarkError::Collaborator(_)));
    }
}
