//! Authentication ports.
//!
//! Sign-in happens at an external identity provider; this side only
//! validates the bearer tokens it issues.

/// Claims carried by an identity token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    /// Provider-assigned user id.
    pub subject: String,
    pub email: Option<String>,
    pub exp: i64,
}

/// Token service trait for JWT operations.
pub trait TokenService: Send + Sync {
    /// Issue a token. Used by tooling and tests; production tokens come from the provider.
    fn generate_token(&self, subject: &str, email: Option<&str>) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,
}
