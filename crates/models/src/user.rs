use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Subscription plan attached to a user account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Subscription {
    #[default]
    Starter,
    Pro,
    Business,
}

/// Persisted user record, keyed by lower-cased email.
///
/// `password_hash` holds an argon2 PHC string, never the plain password.
/// `token` is the single active session token; `None` means logged out.
/// `verification_token` is single-use: verifying the email nulls it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub subscription: Subscription,
    pub avatar_url: String,
    pub verification_token: Option<String>,
    pub verify: bool,
    pub token: Option<String>,
}

impl User {
    /// Fresh, unverified, logged-out user. `email` must already be
    /// lower-cased by the caller.
    pub fn new(
        email: String,
        password_hash: String,
        subscription: Subscription,
        avatar_url: String,
        verification_token: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            subscription,
            avatar_url,
            verification_token: Some(verification_token),
            verify: false,
            token: None,
        }
    }

    pub fn public(&self) -> PublicUser {
        PublicUser {
            email: self.email.clone(),
            subscription: self.subscription,
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// Fields of a user safe to return to its owner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PublicUser {
    pub email: String,
    pub subscription: Subscription,
    #[serde(rename = "avatarURL")]
    pub avatar_url: String,
}
