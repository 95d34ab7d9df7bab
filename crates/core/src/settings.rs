//! StoreConfig key space.
//!
//! StoreConfig is a flat string -> string table edited from the admin
//! settings page. A handful of keys are read by the service itself; the rest
//! are opaque to it (business hours, social links, ...).

use crate::error::CoreError;

/// Destination number for the customer's WhatsApp redirect.
pub const WHATSAPP_NUMBER: &str = "WHATSAPP_NUMBER";
/// Webhook endpoint for new/completed order events.
pub const WEBHOOK_URL: &str = "WEBHOOK_URL";
/// Recipient of the staff order e-mail.
pub const NOTIFY_EMAIL: &str = "NOTIFY_EMAIL";
/// Argon2id PHC hash of the admin password.
pub const ADMIN_PASSWORD_HASH: &str = "ADMIN_PASSWORD_HASH";

/// Keys that are never returned by reads and never written by the generic
/// settings endpoint.
pub const SECRET_KEYS: &[&str] = &[ADMIN_PASSWORD_HASH];

/// Maximum key length.
pub const MAX_KEY_LENGTH: usize = 64;

/// Maximum value length.
pub const MAX_VALUE_LENGTH: usize = 4_000;

pub fn is_secret(key: &str) -> bool {
    SECRET_KEYS.contains(&key)
}

/// Keys are upper snake case: `^[A-Z][A-Z0-9_]*$`, at most 64 characters.
pub fn validate_key(key: &str) -> Result<(), CoreError> {
    let mut chars = key.chars();
    let well_formed = key.len() <= MAX_KEY_LENGTH
        && chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
    if well_formed {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid setting key '{key}'. Keys are UPPER_SNAKE_CASE, at most {MAX_KEY_LENGTH} characters"
        )))
    }
}

/// Validate a key/value pair for the generic settings write.
pub fn validate_write(key: &str, value: &str) -> Result<(), CoreError> {
    validate_key(key)?;
    if is_secret(key) {
        return Err(CoreError::Forbidden(format!(
            "Setting '{key}' cannot be written directly"
        )));
    }
    if value.len() > MAX_VALUE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Setting value exceeds maximum length of {MAX_VALUE_LENGTH} characters (got {})",
            value.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn well_known_keys_are_valid() {
        for key in [WHATSAPP_NUMBER, WEBHOOK_URL, NOTIFY_EMAIL, ADMIN_PASSWORD_HASH] {
            assert!(validate_key(key).is_ok(), "{key} should be valid");
        }
    }

    #[test]
    fn malformed_keys_are_rejected() {
        for key in ["", "whatsapp", "1ABC", "A-B", &"A".repeat(65)] {
            assert_matches!(validate_key(key), Err(CoreError::Validation(_)), "{key:?}");
        }
    }

    #[test]
    fn password_hash_cannot_be_written_generically() {
        assert_matches!(
            validate_write(ADMIN_PASSWORD_HASH, "$argon2id$..."),
            Err(CoreError::Forbidden(_))
        );
        assert!(validate_write(WHATSAPP_NUMBER, "6281200000000").is_ok());
    }
}
