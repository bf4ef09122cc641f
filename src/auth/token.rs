use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use super::{Claims, Subject};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("missing session token")]
    Missing,
    #[error("malformed session token: {0}")]
    Malformed(String),
    #[error("session token signature mismatch")]
    BadSignature,
    #[error("session token expired")]
    Expired,
    #[error("JWT secret not configured")]
    SecretMissing,
    #[error("JWT generation error: {0}")]
    Encoding(String),
}

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// HS256 signer/verifier bound to one secret and one token lifetime.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, ttl_hours: u64) -> Result<Self, TokenError> {
        if secret.trim().is_empty() {
            return Err(TokenError::SecretMissing);
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs: (ttl_hours as i64).saturating_mul(3600),
        })
    }

    pub fn from_config(config: &crate::config::AppConfig) -> Result<Self, TokenError> {
        Self::new(&config.security.jwt_secret, config.security.jwt_expiry_hours)
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Sign a token for `subject`, valid from `now` for the configured lifetime.
    pub fn issue(&self, subject: &Subject, now: i64) -> Result<IssuedToken, TokenError> {
        self.issue_with_ttl(subject, now, self.ttl_secs)
    }

    pub fn issue_with_ttl(
        &self,
        subject: &Subject,
        now: i64,
        ttl_secs: i64,
    ) -> Result<IssuedToken, TokenError> {
        let claims = Claims {
            id: subject.id,
            email: subject.email.clone(),
            role: subject.role,
            condominium_id: subject.condominium_id,
            authorized: subject.authorized,
            exp: now.saturating_add(ttl_secs),
            iat: now,
        };
        let token = self.sign(&claims)?;
        Ok(IssuedToken { token, claims })
    }

    /// Sign exactly the given claims.
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify signature and shape, then expiry against `now` with no leeway.
    pub fn verify(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the caller's clock.
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            }
        })?;

        if data.claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }

    pub fn verify_now(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, Utc::now().timestamp())
    }
}
