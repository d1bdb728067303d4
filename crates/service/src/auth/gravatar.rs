//! Deterministic default avatar URLs (gravatar scheme).

/// Gravatar URL for an email: md5 of the trimmed, lower-cased address,
/// 200px, PG-rated, "mystery man" fallback for addresses without an account.
pub fn url_for(email: &str) -> String {
    let digest = md5::compute(email.trim().to_lowercase().as_bytes());
    format!("https://www.gravatar.com/avatar/{digest:x}?s=200&r=pg&d=mm")
}
