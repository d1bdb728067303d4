use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A single entry of the persisted contact list.
///
/// The whole collection lives in one JSON array on disk; `id` is assigned at
/// creation and never changes afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Contact {
    pub fn new(name: &str, email: &str, phone: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }
    }
}

/// Partial update for a contact: only supplied fields are merged into the
/// stored record.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ContactPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }

    /// Merge the supplied fields into `contact`, leaving the rest untouched.
    pub fn apply(&self, contact: &mut Contact) {
        if let Some(name) = &self.name {
            contact.name = name.clone();
        }
        if let Some(email) = &self.email {
            contact.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            contact.phone = phone.clone();
        }
    }
}
