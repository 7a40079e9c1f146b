//! Password hashing and JWT token handling.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::CONFIG;
use crate::error::{AppError, Result};
use crate::models::user;

/// JWT token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user id)
    pub iss: String, // Issuer
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
    pub jti: String, // JWT ID for uniqueness
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Create a signed access token for a user
pub fn create_access_token(user: &user::Model) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.to_string(),
        iss: "schola".to_string(),
        exp: now.timestamp() + CONFIG.auth.token_expire_secs,
        iat: now.timestamp(),
        jti: uuid::Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(CONFIG.auth.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
}

/// Decode and validate an access token
pub fn decode_token(token: &str) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(CONFIG.auth.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;

    fn sample_user() -> user::Model {
        let now = Utc::now();
        user::Model {
            id: 42,
            school_id: Some(1),
            username: "head".to_string(),
            email: "head@example.com".to_string(),
            full_name: "Head Master".to_string(),
            hashed_password: String::new(),
            role: Role::Schooladmin,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("s3cret").unwrap();
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn token_round_trip() {
        let token = create_access_token(&sample_user()).unwrap();
        let claims = decode_token(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.iss, "schola");
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(decode_token("not-a-token").is_err());
    }
}
