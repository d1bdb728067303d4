use std::sync::Arc;

use service::auth::repo::file::FileUserRepository;
use service::auth::AuthService;
use service::avatar::AvatarStore;
use service::contacts::ContactStore;

/// The concrete auth service used by the HTTP layer: users persisted in the
/// JSON file repository.
pub type Auth = AuthService<FileUserRepository>;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<Auth>,
    pub contacts: ContactStore,
    pub avatars: AvatarStore,
}
