use std::env;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret for access tokens.
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub token_expire_secs: i64,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: env::var("SCHOLA_JWT_SECRET")
                .unwrap_or_else(|_| "schola-dev-secret-change-me".to_string()),
            token_expire_secs: env::var("SCHOLA_TOKEN_EXPIRE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
        }
    }
}
