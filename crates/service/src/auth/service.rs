use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use models::user::{PublicUser, User};
use models::validate;

use crate::mail::{Email, Mailer};

use super::domain::{AuthSession, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::gravatar;
use super::repository::UserRepository;
use super::token;

/// Auth service configuration.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub public_url: String,
}

impl AuthConfig {
    pub fn new(jwt_secret: &str, token_ttl_secs: u64, public_url: &str) -> Self {
        Self {
            jwt_secret: jwt_secret.to_string(),
            token_ttl: chrono::Duration::seconds(token_ttl_secs as i64),
            public_url: public_url.to_string(),
        }
    }
}

/// Auth business service independent of the web framework.
pub struct AuthService<R: UserRepository> {
    repo: Arc<R>,
    mailer: Arc<dyn Mailer>,
    cfg: AuthConfig,
}

impl<R: UserRepository + 'static> AuthService<R> {
    pub fn new(repo: Arc<R>, mailer: Arc<dyn Mailer>, cfg: AuthConfig) -> Self {
        Self { repo, mailer, cfg }
    }

    /// Register a new user: hash the password, derive a gravatar URL, issue
    /// a verification token and dispatch the verification mail.
    ///
    /// The mail goes out fire-and-forget; a failed send is logged but does
    /// not fail the registration.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{AuthService, service::AuthConfig};
    /// use service::auth::domain::RegisterInput;
    /// use service::auth::repository::mock::MemoryUserRepository;
    /// use service::mail::NoopMailer;
    /// let repo = Arc::new(MemoryUserRepository::default());
    /// let svc = AuthService::new(repo, Arc::new(NoopMailer), AuthConfig::new("secret", 3600, "http://localhost:3000"));
    /// let input = RegisterInput { email: "Jane@X.com".into(), password: "Secret123".into(), subscription: Default::default() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "jane@x.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<PublicUser, AuthError> {
        validate::validate_email(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        validate::validate_password(&input.password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let email = input.email.trim().to_lowercase();
        if let Some(existing) = self.repo.find_by_email(&email).await? {
            debug!("email taken: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .to_string();

        let verification_token = Uuid::new_v4().to_string();
        let user = User::new(
            email.clone(),
            password_hash,
            input.subscription,
            gravatar::url_for(&email),
            verification_token.clone(),
        );
        let user = self.repo.insert(user).await?;

        // Fire-and-forget: registration already succeeded, a lost mail can
        // be recovered through the resend endpoint.
        let mailer = Arc::clone(&self.mailer);
        let mail = Email::verification(&self.cfg.public_url, &email, &verification_token);
        tokio::spawn(async move {
            if let Err(e) = mailer.send(mail).await {
                warn!(error = %e, "verification mail dispatch failed");
            }
        });

        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(user.public())
    }

    /// Authenticate and issue a session token, persisting it on the record
    /// (single active session per user).
    ///
    /// Unknown email and wrong password both map to the same
    /// `InvalidCredentials` error so the response cannot be used to probe
    /// which addresses are registered.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let email = input.email.trim().to_lowercase();
        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let parsed =
            PasswordHash::new(&user.password_hash).map_err(|e| AuthError::Hash(e.to_string()))?;
        if Argon2::default()
            .verify_password(input.password.as_bytes(), &parsed)
            .is_err()
        {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.verify {
            return Err(AuthError::EmailNotVerified);
        }

        let jwt = token::sign(user.id, &user.email, &self.cfg.jwt_secret, self.cfg.token_ttl)?;
        let user = self
            .repo
            .set_session_token(user.id, Some(jwt.clone()))
            .await?
            .ok_or(AuthError::Unauthorized)?;

        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user: user.public(), token: jwt })
    }

    /// Clear the stored session token. Idempotent: logging out twice is not
    /// an error.
    #[instrument(skip(self))]
    pub async fn logout(&self, user_id: Uuid) -> Result<(), AuthError> {
        self.repo.set_session_token(user_id, None).await?;
        Ok(())
    }

    /// Public profile of the authenticated caller.
    pub async fn current(&self, user_id: Uuid) -> Result<PublicUser, AuthError> {
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        Ok(user.public())
    }

    /// Confirm an email address with its single-use verification token.
    /// The token is nulled on success, so a second call with the same value
    /// reports `NotFound`.
    #[instrument(skip(self, verification_token))]
    pub async fn verify_email(&self, verification_token: &str) -> Result<(), AuthError> {
        let user = self
            .repo
            .find_by_verification_token(verification_token)
            .await?
            .ok_or(AuthError::NotFound)?;
        self.repo
            .set_verified(user.id)
            .await?
            .ok_or(AuthError::NotFound)?;
        info!(user_id = %user.id, "email_verified");
        Ok(())
    }

    /// Regenerate the verification token and resend the mail. Unlike
    /// registration, the send is awaited here: the whole point of the call
    /// is the mail, so a failed send is a failed request.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn resend_verification(&self, email: &str) -> Result<(), AuthError> {
        let email = email.trim().to_lowercase();
        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::NotFound)?;
        if user.verify {
            return Err(AuthError::AlreadyVerified);
        }

        let verification_token = Uuid::new_v4().to_string();
        self.repo
            .set_verification_token(user.id, verification_token.clone())
            .await?
            .ok_or(AuthError::NotFound)?;

        let mail = Email::verification(&self.cfg.public_url, &email, &verification_token);
        self.mailer
            .send(mail)
            .await
            .map_err(|e| AuthError::Mail(e.to_string()))?;
        info!(user_id = %user.id, "verification_mail_resent");
        Ok(())
    }

    /// Record an uploaded avatar reference on the user.
    pub async fn set_avatar(&self, user_id: Uuid, avatar_url: String) -> Result<String, AuthError> {
        let user = self
            .repo
            .set_avatar(user_id, avatar_url)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        Ok(user.avatar_url)
    }

    /// Look up the user a presented session token belongs to. Fails when
    /// the JWT is invalid or expired, when the user is gone, or when the
    /// stored token differs (i.e. the session was invalidated by logout or
    /// a newer login).
    pub async fn authenticate(&self, presented: &str) -> Result<User, AuthError> {
        let claims = token::verify(presented, &self.cfg.jwt_secret)?;
        let user = self
            .repo
            .find_by_id(claims.uid)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        if user.token.as_deref() != Some(presented) {
            return Err(AuthError::Unauthorized);
        }
        Ok(user)
    }
}
