//! Outbound mail: a small trait so the auth service can be tested without a
//! mail server, an SMTP implementation via `lettre`, and a no-op fallback
//! used when mail is disabled.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

/// A single outbound message with HTML and plain-text alternatives.
#[derive(Debug, Clone)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl Email {
    /// Verification mail pointing at the public verify endpoint.
    pub fn verification(public_url: &str, to: &str, token: &str) -> Self {
        let link = format!("{public_url}/api/users/verify/{token}");
        Self {
            to: to.to_string(),
            subject: "Verification email".to_string(),
            html: format!(r#"To confirm your email click on the <a href="{link}">link</a>"#),
            text: format!("To confirm your email open the link {link}"),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> Result<()>;
}

/// SMTP mailer over an async `lettre` transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(host: &str, port: u16, username: &str, password: &str, from: &str) -> Result<Self> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port);
        if !username.is_empty() {
            builder = builder.credentials(Credentials::new(username.into(), password.into()));
        }
        let from = from
            .parse::<Mailbox>()
            .map_err(|e| anyhow!("invalid from address {from:?}: {e}"))?;
        Ok(Self { transport: builder.build(), from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: Email) -> Result<()> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| anyhow!("invalid recipient {:?}: {e}", email.to))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .multipart(MultiPart::alternative_plain_html(email.text, email.html))
            .map_err(|e| anyhow!("failed to build message: {e}"))?;
        self.transport
            .send(message)
            .await
            .map_err(|e| anyhow!("smtp send failed: {e}"))?;
        Ok(())
    }
}

/// Mailer that logs and drops every message. Used in tests and in
/// deployments without SMTP configuration.
#[derive(Default)]
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, email: Email) -> Result<()> {
        info!(to = %email.to, subject = %email.subject, "mail disabled; dropping message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_email_embeds_link_in_both_parts() {
        let email = Email::verification("http://localhost:3000", "jane@x.com", "tok-123");
        assert_eq!(email.to, "jane@x.com");
        assert!(email.html.contains("http://localhost:3000/api/users/verify/tok-123"));
        assert!(email.text.contains("http://localhost:3000/api/users/verify/tok-123"));
    }

    #[tokio::test]
    async fn noop_mailer_always_succeeds() {
        let mailer = NoopMailer;
        let email = Email::verification("http://localhost:3000", "jane@x.com", "tok");
        assert!(mailer.send(email).await.is_ok());
    }
}
