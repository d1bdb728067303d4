//! Request-field validation shared by the contact and user endpoints.
//!
//! Handlers run these before dispatching to the service layer; the returned
//! message is surfaced verbatim as a 400 response.

use crate::errors::ModelError;

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ModelError::Validation("\"email\" is required".into()));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ModelError::Validation("\"email\" must be a valid email".into()));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ModelError::Validation("\"email\" must be a valid email".into()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("\"name\" is required".into()));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), ModelError> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(ModelError::Validation("\"phone\" is required".into()));
    }
    if !phone.chars().all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')')) {
        return Err(ModelError::Validation("\"phone\" must be a valid phone number".into()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ModelError> {
    if password.len() < 8 {
        return Err(ModelError::Validation(
            "\"password\" length must be at least 8 characters long".into(),
        ));
    }
    Ok(())
}
