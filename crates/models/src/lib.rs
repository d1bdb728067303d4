pub mod contact;
pub mod errors;
pub mod user;
pub mod validate;
