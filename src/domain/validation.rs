/// Minimum accepted password length for login and signup.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Normalize an email for storage and lookup: trim, lowercase, and check the
/// basic shape (non-empty local part, non-empty domain containing a dot).
/// Returns `None` when the address is malformed.
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return None;
    }
    let mut parts = normalized.split('@');
    let (local, domain) = (parts.next()?, parts.next()?);
    if parts.next().is_some() || local.is_empty() || domain.is_empty() {
        return None;
    }
    if !domain.contains('.') {
        return None;
    }
    Some(normalized)
}

pub fn is_valid_email(email: &str) -> bool {
    normalize_email(email).is_some()
}

pub fn is_valid_password(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LEN
}
