//! JWT session verification.
//!
//! Tokens are minted by the external auth provider; this service only
//! verifies them. The caller's admin role is not trusted from claims — it is
//! confirmed against the `user_profiles` table by the auth middleware.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the auth provider's user ID.
    pub sub: Uuid,
    pub email: String,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
}

/// HS256 token verification (and minting, for tests and local tooling).
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Create a session token for a user. Expires in 24 hours.
    pub fn create_token(&self, user_id: Uuid, email: String) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email,
            iss: self.issuer.clone(),
            exp: (now + Duration::hours(24)).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .context("Failed to encode JWT")
    }

    /// Verify a token's signature, expiry, and issuer.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);
        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .context("Invalid or expired token")?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_own_tokens() {
        let svc = JwtService::new("test_secret", "test_issuer".to_string());
        let user_id = Uuid::new_v4();
        let token = svc
            .create_token(user_id, "admin@example.com".to_string())
            .unwrap();

        let claims = svc.verify_token(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "admin@example.com");
    }

    #[test]
    fn rejects_wrong_issuer() {
        let mint = JwtService::new("test_secret", "other_issuer".to_string());
        let verify = JwtService::new("test_secret", "test_issuer".to_string());
        let token = mint
            .create_token(Uuid::new_v4(), "a@example.com".to_string())
            .unwrap();

        assert!(verify.verify_token(&token).is_err());
    }

    #[test]
    fn rejects_garbage() {
        let svc = JwtService::new("test_secret", "test_issuer".to_string());
        assert!(svc.verify_token("not-a-token").is_err());
    }
}
