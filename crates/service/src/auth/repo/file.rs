use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use uuid::Uuid;

use models::user::User;

use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;

use super::super::errors::AuthError;
use super::super::repository::UserRepository;

/// File-backed user repository: one JSON object keyed by lower-cased email.
#[derive(Clone)]
pub struct FileUserRepository {
    store: Arc<JsonMapStore<String, User>>,
}

impl FileUserRepository {
    /// Open (or create) the users document at the given path.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::<String, User>::new(path).await?;
        Ok(Arc::new(Self { store }))
    }
}

fn repo_err(e: ServiceError) -> AuthError {
    AuthError::Repository(e.to_string())
}

#[async_trait]
impl UserRepository for FileUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        Ok(self.store.get(&email.to_lowercase()).await)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        Ok(self.store.find(|u| u.id == id).await)
    }

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .store
            .find(|u| u.verification_token.as_deref() == Some(token))
            .await)
    }

    async fn insert(&self, user: User) -> Result<User, AuthError> {
        let inserted = self
            .store
            .insert_new(user.email.to_lowercase(), user.clone())
            .await
            .map_err(repo_err)?;
        if !inserted {
            return Err(AuthError::Conflict);
        }
        Ok(user)
    }

    async fn set_session_token(&self, id: Uuid, token: Option<String>) -> Result<Option<User>, AuthError> {
        self.store
            .update_where(|u| u.id == id, |u| u.token = token)
            .await
            .map_err(repo_err)
    }

    async fn set_verified(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        self.store
            .update_where(
                |u| u.id == id,
                |u| {
                    u.verify = true;
                    u.verification_token = None;
                },
            )
            .await
            .map_err(repo_err)
    }

    async fn set_verification_token(&self, id: Uuid, token: String) -> Result<Option<User>, AuthError> {
        self.store
            .update_where(|u| u.id == id, |u| u.verification_token = Some(token))
            .await
            .map_err(repo_err)
    }

    async fn set_avatar(&self, id: Uuid, avatar_url: String) -> Result<Option<User>, AuthError> {
        self.store
            .update_where(|u| u.id == id, |u| u.avatar_url = avatar_url)
            .await
            .map_err(repo_err)
    }
}
