use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use ventry_common::models::auth::Claims;

/// Access tokens live 15 minutes; refresh tokens live 7 days.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 900;
pub const REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 3600;

/// Token verification outcome the handlers branch on: an expired access
/// token and a forged/garbled one get different status codes.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

/// Hash a password using argon2id with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash. A malformed stored hash counts
/// as a failed verification, never an error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

fn create_token(user_id: Uuid, username: &str, ttl_secs: i64, secret: &str) -> Result<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        iat: now,
        exp: now + ttl_secs,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to sign token")
}

/// Create an access token (JWT) with 15-minute TTL
pub fn create_access_token(user_id: Uuid, username: &str, access_secret: &str) -> Result<String> {
    create_token(user_id, username, ACCESS_TOKEN_TTL_SECS, access_secret)
}

/// Create a refresh token (JWT) with 7-day TTL, signed with the distinct
/// refresh secret
pub fn create_refresh_token(user_id: Uuid, username: &str, refresh_secret: &str) -> Result<String> {
    create_token(user_id, username, REFRESH_TOKEN_TTL_SECS, refresh_secret)
}

/// Validate an access token, distinguishing expiry from everything else
pub fn validate_access_token(token: &str, access_secret: &str) -> Result<Claims, TokenError> {
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(access_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })?;
    Ok(token_data.claims)
}

/// Validate a refresh token. Expired and malformed collapse to Invalid:
/// either way the client must log in again.
pub fn validate_refresh_token(token: &str, refresh_secret: &str) -> Result<Claims, TokenError> {
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(refresh_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| TokenError::Invalid)?;
    Ok(token_data.claims)
}

/// SHA-256 digest of a raw refresh token, the key of the server-side
/// revocation record
pub fn hash_refresh_token(raw_token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    #[test]
    fn test_password_hash_and_verify_correct() {
        let password = "my-secure-password";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash));
    }

    #[test]
    fn test_password_verify_wrong() {
        let hash = hash_password("correct-password").unwrap();
        assert!(!verify_password("wrong-password", &hash));
        assert!(!verify_password("", &hash));
        // The hash itself is not the password
        let hash_copy = hash.clone();
        assert!(!verify_password(&hash_copy, &hash));
    }

    #[test]
    fn test_password_malformed_hash_is_verification_failure() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn test_password_different_salts() {
        let password = "same-password";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();
        assert_ne!(hash1, hash2);
        // Both still verify
        assert!(verify_password(password, &hash1));
        assert!(verify_password(password, &hash2));
    }

    #[test]
    fn test_access_token_create_and_validate() {
        let secret = "test-access-secret";
        let user_id = Uuid::new_v4();
        let token = create_access_token(user_id, "ana", secret).unwrap();
        let claims = validate_access_token(&token, secret).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "ana");
        assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_TTL_SECS);
    }

    #[test]
    fn test_refresh_token_create_and_validate() {
        let secret = "test-refresh-secret";
        let user_id = Uuid::new_v4();
        let token = create_refresh_token(user_id, "ana", secret).unwrap();
        let claims = validate_refresh_token(&token, secret).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.exp - claims.iat, REFRESH_TOKEN_TTL_SECS);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = create_access_token(Uuid::new_v4(), "ana", "secret-1").unwrap();
        assert_eq!(
            validate_access_token(&token, "secret-2"),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_secrets_not_interchangeable() {
        let user_id = Uuid::new_v4();
        let access = create_access_token(user_id, "ana", "access-secret").unwrap();
        let refresh = create_refresh_token(user_id, "ana", "refresh-secret").unwrap();
        assert_eq!(
            validate_access_token(&refresh, "access-secret"),
            Err(TokenError::Invalid)
        );
        assert_eq!(
            validate_refresh_token(&access, "refresh-secret"),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        assert_eq!(
            validate_access_token("not.a.jwt", "secret"),
            Err(TokenError::Invalid)
        );
        assert_eq!(
            validate_refresh_token("", "secret"),
            Err(TokenError::Invalid)
        );
    }

    fn expired_token(secret: &str) -> String {
        // Past the default 60s validation leeway
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            username: "ana".to_string(),
            iat: now - 1000,
            exp: now - 120,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_expired_access_token_distinguished_from_invalid() {
        let token = expired_token("access-secret");
        assert_eq!(
            validate_access_token(&token, "access-secret"),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_expired_refresh_token_is_simply_invalid() {
        let token = expired_token("refresh-secret");
        assert_eq!(
            validate_refresh_token(&token, "refresh-secret"),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_refresh_token_hash_determinism() {
        let raw = "fixed-token-value";
        assert_eq!(hash_refresh_token(raw), hash_refresh_token(raw));
        assert_ne!(hash_refresh_token(raw), hash_refresh_token("other-value"));
    }
}
