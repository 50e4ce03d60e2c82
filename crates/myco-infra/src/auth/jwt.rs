//! JWT bearer token validation.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use myco_core::ports::{AuthError, TokenClaims, TokenService};

const DEFAULT_SECRET: &str = "change-me-in-production";

/// JWT token service configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: 24,
            issuer: "mushroomservice-auth".to_string(),
        }
    }
}

/// Refusal to start with an unusable signing setup.
#[derive(Debug, thiserror::Error)]
pub enum JwtConfigError {
    #[error("JWT_SECRET must be set when RUST_ENV is production")]
    DefaultSecretInProduction,
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, JwtConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from a variable lookup. The built-in secret is public, so it is
    /// rejected outright in production.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, JwtConfigError> {
        let defaults = Self::default();
        let secret = var("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.secret);

        if secret == DEFAULT_SECRET {
            let is_production = var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!("SECURITY: Refusing to start with the default JWT secret in production");
                return Err(JwtConfigError::DefaultSecretInProduction);
            }
            tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
        }

        Ok(Self {
            secret,
            expiration_hours: var("JWT_EXPIRATION_HOURS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.expiration_hours),
            issuer: var("JWT_ISSUER").unwrap_or(defaults.issuer),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    exp: i64,
    iat: i64,
    iss: String,
}

/// HS256 token service.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }

    pub fn from_env() -> Result<Self, JwtConfigError> {
        JwtConfig::from_env().map(Self::new)
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, subject: &str, email: Option<&str>) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + TimeDelta::hours(self.config.expiration_hours);

        let claims = Claims {
            sub: subject.to_string(),
            email: email.map(str::to_string),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(TokenClaims {
            subject: token_data.claims.sub,
            email: token_data.claims.email,
            exp: token_data.claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key".to_string(),
            expiration_hours: 1,
            issuer: "test-issuer".to_string(),
        }
    }

    #[test]
    fn test_round_trip_keeps_email() {
        let service = JwtTokenService::new(test_config());

        let token = service
            .generate_token("uid-1", Some("admin@mushroomservice.com"))
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.subject, "uid-1");
        assert_eq!(claims.email.as_deref(), Some("admin@mushroomservice.com"));
    }

    #[test]
    fn test_token_without_email() {
        let service = JwtTokenService::new(test_config());

        let token = service.generate_token("anon-uid", None).unwrap();

        assert_eq!(service.validate_token(&token).unwrap().email, None);
    }

    #[test]
    fn test_validate_invalid_token() {
        let service = JwtTokenService::new(test_config());

        let result = service.validate_token("invalid-token");

        assert!(matches!(result.unwrap_err(), AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_expired_token() {
        let service = JwtTokenService::new(JwtConfig {
            expiration_hours: -2,
            ..test_config()
        });

        let token = service.generate_token("uid", None).unwrap();

        assert!(matches!(
            service.validate_token(&token).unwrap_err(),
            AuthError::TokenExpired
        ));
    }

    #[test]
    fn test_validate_wrong_issuer_token() {
        let issuer1 = JwtTokenService::new(JwtConfig {
            issuer: "issuer1".to_string(),
            ..test_config()
        });
        let issuer2 = JwtTokenService::new(JwtConfig {
            issuer: "issuer2".to_string(),
            ..test_config()
        });

        let token = issuer1.generate_token("uid", None).unwrap();

        assert!(issuer2.validate_token(&token).is_err());
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: std::collections::HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_secret_rejected_in_production() {
        let result = JwtConfig::from_vars(vars(&[("RUST_ENV", "production")]));

        assert!(matches!(
            result,
            Err(JwtConfigError::DefaultSecretInProduction)
        ));
    }

    #[test]
    fn test_explicit_default_secret_rejected_in_production() {
        let result = JwtConfig::from_vars(vars(&[
            ("RUST_ENV", "prod"),
            ("JWT_SECRET", DEFAULT_SECRET),
        ]));

        assert!(result.is_err());
    }

    #[test]
    fn test_default_secret_allowed_in_development() {
        let config = JwtConfig::from_vars(vars(&[])).unwrap();

        assert_eq!(config.secret, DEFAULT_SECRET);
        assert_eq!(config.expiration_hours, 24);
    }

    #[test]
    fn test_production_with_secret() {
        let config = JwtConfig::from_vars(vars(&[
            ("RUST_ENV", "production"),
            ("JWT_SECRET", "a-real-secret"),
            ("JWT_ISSUER", "site-auth"),
        ]))
        .unwrap();

        assert_eq!(config.secret, "a-real-secret");
        assert_eq!(config.issuer, "site-auth");
    }
}
