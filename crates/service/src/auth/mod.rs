//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login/logout, email verification and avatar bookkeeping
//! live here, independent of the web framework.

pub mod domain;
pub mod errors;
pub mod gravatar;
pub mod repo;
pub mod repository;
pub mod service;
pub mod token;

pub use service::AuthService;
