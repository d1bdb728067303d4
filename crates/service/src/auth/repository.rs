use async_trait::async_trait;
use uuid::Uuid;

use models::user::User;

use super::errors::AuthError;

/// Repository abstraction for user persistence.
///
/// Lookup keys mirror the access patterns of the auth flows: email at
/// registration/login, id for session-scoped calls, verification token for
/// the email confirmation link. The `set_*` mutators return the updated
/// record, or `None` when the user disappeared underneath the caller.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Case-insensitive: implementations key by lower-cased email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;
    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, AuthError>;

    /// Insert a new user; `Conflict` when the email is already taken.
    async fn insert(&self, user: User) -> Result<User, AuthError>;

    async fn set_session_token(&self, id: Uuid, token: Option<String>) -> Result<Option<User>, AuthError>;
    /// Flip `verify` to true and null the verification token (one-way).
    async fn set_verified(&self, id: Uuid) -> Result<Option<User>, AuthError>;
    async fn set_verification_token(&self, id: Uuid, token: String) -> Result<Option<User>, AuthError>;
    async fn set_avatar(&self, id: Uuid, avatar_url: String) -> Result<Option<User>, AuthError>;
}

/// Simple in-memory repository for tests and doc examples.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryUserRepository {
        users: Mutex<HashMap<String, User>>, // key: lower-cased email
    }

    impl MemoryUserRepository {
        fn update_by_id<F>(&self, id: Uuid, f: F) -> Option<User>
        where
            F: FnOnce(&mut User),
        {
            let mut users = self.users.lock().unwrap();
            let user = users.values_mut().find(|u| u.id == id)?;
            f(user);
            Some(user.clone())
        }
    }

    #[async_trait]
    impl UserRepository for MemoryUserRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(&email.to_lowercase()).cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.values().find(|u| u.id == id).cloned())
        }

        async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users
                .values()
                .find(|u| u.verification_token.as_deref() == Some(token))
                .cloned())
        }

        async fn insert(&self, user: User) -> Result<User, AuthError> {
            let mut users = self.users.lock().unwrap();
            let key = user.email.to_lowercase();
            if users.contains_key(&key) {
                return Err(AuthError::Conflict);
            }
            users.insert(key, user.clone());
            Ok(user)
        }

        async fn set_session_token(&self, id: Uuid, token: Option<String>) -> Result<Option<User>, AuthError> {
            Ok(self.update_by_id(id, |u| u.token = token))
        }

        async fn set_verified(&self, id: Uuid) -> Result<Option<User>, AuthError> {
            Ok(self.update_by_id(id, |u| {
                u.verify = true;
                u.verification_token = None;
            }))
        }

        async fn set_verification_token(&self, id: Uuid, token: String) -> Result<Option<User>, AuthError> {
            Ok(self.update_by_id(id, |u| u.verification_token = Some(token)))
        }

        async fn set_avatar(&self, id: Uuid, avatar_url: String) -> Result<Option<User>, AuthError> {
            Ok(self.update_by_id(id, |u| u.avatar_url = avatar_url))
        }
    }
}
