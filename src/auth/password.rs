use bcrypt::{hash, verify, DEFAULT_COST};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("password cannot be empty")]
    Empty,
    #[error("stored password hash has an unsupported format")]
    UnsupportedFormat,
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Hash `password` for storage as a bcrypt string (`$2b$<cost>$...`).
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash_password_with_cost(password, DEFAULT_COST)
}

/// Same as [`hash_password`] with an explicit work factor.
///
/// Seeded test accounts use bcrypt's minimum cost (4) to keep fixtures fast.
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::Empty);
    }
    hash(password, cost).map_err(|e| PasswordError::Hashing(e.to_string()))
}

/// Check `password` against a stored bcrypt hash (`$2a$`, `$2b$`, `$2x$`, `$2y$`).
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    verify(password, stored).map_err(|e| {
        tracing::warn!("Stored password hash could not be checked: {}", e);
        PasswordError::UnsupportedFormat
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify() {
        let stored = hash_password_with_cost("s3cret", 4).unwrap();
        assert!(stored.starts_with("$2b$04$"));
        assert_eq!(verify_password("s3cret", &stored), Ok(true));
        assert_eq!(verify_password("S3cret", &stored), Ok(false));
    }

    #[test]
    fn salts_differ() {
        let a = hash_password_with_cost("same", 4).unwrap();
        let b = hash_password_with_cost("same", 4).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn hashes_from_other_bcrypt_tools_verify() {
        let from_libcrypt = "$2b$04$Oe.uOe.uOe.uOe.uOe.uOeXcv1R4.rx9AEr6PauvgoNKvuYKMe2xu";
        assert_eq!(verify_password("s3cret", from_libcrypt), Ok(true));
        assert_eq!(verify_password("secret", from_libcrypt), Ok(false));

        let php_style = "$2y$05$abcdefghijklmnopqrstuuLK7U1u6pVRmL7L1BBM2aS35PSZnDXlK";
        assert_eq!(verify_password("s3cret", php_style), Ok(true));
    }

    #[test]
    fn rejects_unusable_input() {
        assert_eq!(verify_password("pw", "sha256$salt$digest"), Err(PasswordError::UnsupportedFormat));
        assert_eq!(verify_password("pw", "plaintext"), Err(PasswordError::UnsupportedFormat));
        assert_eq!(hash_password(""), Err(PasswordError::Empty));
    }
}
