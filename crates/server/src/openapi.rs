use utoipa::OpenApi;
use utoipa::ToSchema;

use models::contact::{Contact, ContactPatch};
use models::user::{PublicUser, Subscription};

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub subscription: Option<Subscription>,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct ResendRequest {
    pub email: String,
}

#[derive(ToSchema)]
pub struct NewContactRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::current,
        crate::routes::auth::upload_avatar,
        crate::routes::auth::verify_email,
        crate::routes::auth::resend_verification,
        crate::routes::contacts::list,
        crate::routes::contacts::get_one,
        crate::routes::contacts::create,
        crate::routes::contacts::update,
        crate::routes::contacts::remove,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            ResendRequest,
            NewContactRequest,
            Contact,
            ContactPatch,
            PublicUser,
            Subscription,
        )
    ),
    tags(
        (name = "health"),
        (name = "users"),
        (name = "contacts")
    )
)]
pub struct ApiDoc;
