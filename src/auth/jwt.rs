//! JWT token service
//!
//! Issues and validates the session/refresh token pair.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret (should be at least 32 bytes)
    pub secret: String,
    /// Session token lifetime in minutes
    pub session_minutes: i64,
    /// Refresh token lifetime in days
    pub refresh_days: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match load_jwt_secret() {
            Ok(secret) => secret,
            Err(e) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT configuration error: {}, using temporary key", e);
                    generate_printable_secret()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("FATAL: SECRET_KEY configuration failed: {}", e);
                }
            }
        };

        Self {
            secret,
            session_minutes: std::env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(15),
            refresh_days: std::env::var("REFRESH_TTL_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7),
        }
    }
}

/// Claims carried in the token
///
/// Refresh tokens carry only `sub` and timing claims; the identity fields
/// stay empty so a refresh token never doubles as a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (subject)
    pub sub: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// "session" or "refresh"
    pub token_type: String,
    /// Expiry timestamp (seconds)
    pub exp: i64,
    /// Issued-at timestamp (seconds)
    pub iat: i64,
}

impl Claims {
    pub fn is_refresh(&self) -> bool {
        self.token_type == "refresh"
    }
}

/// A freshly issued session/refresh pair
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

/// JWT errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),

    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Generate a printable signing secret for development use
pub fn generate_printable_secret() -> String {
    let allowed_chars =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";

    let rng = SystemRandom::new();
    let mut key = String::new();

    for _ in 0..64 {
        let mut byte = [0u8; 1];
        if rng.fill(&mut byte).is_err() {
            return "RestoServerDevelopmentFallbackKey2026!".to_string();
        }
        let idx = (byte[0] as usize) % allowed_chars.len();
        key.push(allowed_chars.as_bytes()[idx] as char);
    }

    key
}

/// Load the signing secret from the environment
fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("SECRET_KEY") {
        Ok(secret) => {
            if secret.len() < 32 {
                return Err(JwtError::ConfigError(
                    "SECRET_KEY must be at least 32 characters long".to_string(),
                ));
            }
            Ok(secret)
        }
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!("SECRET_KEY not set, generating temporary key for development");
                Ok(generate_printable_secret())
            }
            #[cfg(not(debug_assertions))]
            {
                Err(JwtError::ConfigError(
                    "SECRET_KEY environment variable must be set in production".to_string(),
                ))
            }
        }
    }
}

/// JWT token service
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue the session/refresh pair for a user
    pub fn generate_all_tokens(
        &self,
        user_id: &str,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<TokenPair, JwtError> {
        let now = Utc::now();

        let session_claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            token_type: "session".to_string(),
            exp: (now + Duration::minutes(self.config.session_minutes)).timestamp(),
            iat: now.timestamp(),
        };

        let refresh_claims = Claims {
            sub: user_id.to_string(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            token_type: "refresh".to_string(),
            exp: (now + Duration::days(self.config.refresh_days)).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::default(), &session_claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))?;
        let refresh_token = encode(&Header::default(), &refresh_claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))?;

        Ok(TokenPair {
            token,
            refresh_token,
        })
    }

    /// Validate signature and expiry, then decode the claims.
    ///
    /// Leeway is zero: a token is expired the second `exp` passes.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Validate a refresh token specifically
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if !claims.is_refresh() {
            return Err(JwtError::InvalidToken(
                "Expected a refresh token".to_string(),
            ));
        }
        Ok(claims)
    }

    /// Extract the token from an Authorization header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// Current user context, parsed from validated claims
///
/// Created by the authentication middleware and injected into request
/// extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            first_name: claims.first_name,
            last_name: claims.last_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service(session_minutes: i64) -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "test-secret-key-that-is-long-enough!".to_string(),
            session_minutes,
            refresh_days: 7,
        })
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let svc = test_service(15);
        let pair = svc
            .generate_all_tokens("u1", "ada@example.com", "Ada", "Lovelace")
            .unwrap();

        let claims = svc.validate_token(&pair.token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.token_type, "session");
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_refresh_token_has_empty_identity() {
        let svc = test_service(15);
        let pair = svc
            .generate_all_tokens("u1", "ada@example.com", "Ada", "Lovelace")
            .unwrap();

        let claims = svc.validate_refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert!(claims.email.is_empty());
        assert!(claims.first_name.is_empty());
        assert!(claims.is_refresh());
    }

    #[test]
    fn test_session_token_rejected_as_refresh() {
        let svc = test_service(15);
        let pair = svc
            .generate_all_tokens("u1", "ada@example.com", "Ada", "Lovelace")
            .unwrap();

        let err = svc.validate_refresh_token(&pair.token).unwrap_err();
        assert!(matches!(err, JwtError::InvalidToken(_)));
    }

    #[test]
    fn test_expired_token() {
        // negative lifetime makes the token expired at issue time
        let svc = test_service(-1);
        let pair = svc
            .generate_all_tokens("u1", "ada@example.com", "Ada", "Lovelace")
            .unwrap();

        let err = svc.validate_token(&pair.token).unwrap_err();
        assert!(matches!(err, JwtError::ExpiredToken));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let svc = test_service(15);
        let pair = svc
            .generate_all_tokens("u1", "ada@example.com", "Ada", "Lovelace")
            .unwrap();

        let other = JwtService::with_config(JwtConfig {
            secret: "a-completely-different-secret-key-here".to_string(),
            session_minutes: 15,
            refresh_days: 7,
        });
        let err = other.validate_token(&pair.token).unwrap_err();
        assert!(matches!(err, JwtError::InvalidSignature));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}
