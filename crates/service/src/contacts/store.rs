use std::path::PathBuf;

use tokio::fs;
use tracing::warn;

use models::contact::{Contact, ContactPatch};

use crate::errors::ServiceError;

/// File-backed contact list.
///
/// The store holds only the document path; state lives on disk and is
/// re-read on every call, so two stores pointed at the same file see each
/// other's writes (and can race — accepted, last writer wins).
#[derive(Clone)]
pub struct ContactStore {
    path: PathBuf,
}

impl ContactStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// All contacts in stored order. A missing or corrupt document degrades
    /// to an empty list rather than an error; callers relying on this get a
    /// warn-level log as the only trace.
    pub async fn list(&self) -> Vec<Contact> {
        match fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(contacts) => contacts,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "contacts document corrupt; treating as empty");
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "contacts document unreadable; treating as empty");
                Vec::new()
            }
        }
    }

    pub async fn get_by_id(&self, id: &str) -> Option<Contact> {
        self.list().await.into_iter().find(|c| c.id == id)
    }

    /// Append a new contact with a generated id and rewrite the document.
    pub async fn add(&self, name: &str, email: &str, phone: &str) -> Result<Contact, ServiceError> {
        let mut contacts = self.list().await;
        let contact = Contact::new(name, email, phone);
        contacts.push(contact.clone());
        self.save(&contacts).await?;
        Ok(contact)
    }

    /// Remove by id, returning the removed record. A miss leaves the
    /// document untouched.
    pub async fn remove(&self, id: &str) -> Result<Option<Contact>, ServiceError> {
        let mut contacts = self.list().await;
        let Some(index) = contacts.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        let removed = contacts.remove(index);
        self.save(&contacts).await?;
        Ok(Some(removed))
    }

    /// Merge the supplied fields into the stored record and rewrite the
    /// document. Unsupplied fields keep their values.
    pub async fn update(&self, id: &str, patch: &ContactPatch) -> Result<Option<Contact>, ServiceError> {
        let mut contacts = self.list().await;
        let Some(contact) = contacts.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        patch.apply(contact);
        let updated = contact.clone();
        self.save(&contacts).await?;
        Ok(Some(updated))
    }

    async fn save(&self, contacts: &[Contact]) -> Result<(), ServiceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.ok();
        }
        // Pretty output keeps the document human-diffable.
        let data = serde_json::to_vec_pretty(contacts).map_err(ServiceError::storage)?;
        fs::write(&self.path, data).await.map_err(ServiceError::storage)?;
        Ok(())
    }
}
