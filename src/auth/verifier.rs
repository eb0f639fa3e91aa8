// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token verification.
//!
//! ## Verification Modes
//!
//! - **Production mode** (`JWT_SECRET` set): HS256 signature check, `exp`
//!   validated when present
//! - **Development mode** (no secret): structure validation only

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};

use super::claims::{TokenClaims, TokenData};
use super::AuthError;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Turns a raw bearer token into [`TokenData`].
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<TokenData, AuthError>;
}

/// JWT verifier backed by `jsonwebtoken`.
#[derive(Clone)]
pub struct JwtVerifier {
    key: Option<DecodingKey>,
}

impl JwtVerifier {
    /// Verifier that checks HS256 signatures against `secret`.
    pub fn with_secret(secret: &str) -> Self {
        Self {
            key: Some(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    /// Verifier that only decodes tokens.
    ///
    /// WARNING: This should only be used in development environments.
    pub fn development() -> Self {
        Self { key: None }
    }

    pub fn from_secret(secret: Option<&str>) -> Self {
        match secret {
            Some(secret) => Self::with_secret(secret),
            None => Self::development(),
        }
    }

    pub fn is_development(&self) -> bool {
        self.key.is_none()
    }

    fn verify_production(token: &str, key: &DecodingKey) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<TokenClaims>(token, key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::AuthFailed(describe(e.kind()).to_string()))
    }

    fn verify_development(token: &str) -> Result<TokenClaims, AuthError> {
        let claims = jsonwebtoken::dangerous::insecure_decode::<TokenClaims>(token)
            .map_err(|e| AuthError::AuthFailed(describe(e.kind()).to_string()))?
            .claims;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();

        if let Some(exp) = claims.exp {
            if exp < now - CLOCK_SKEW_LEEWAY as i64 {
                return Err(AuthError::AuthFailed(describe(&ErrorKind::ExpiredSignature).to_string()));
            }
        }

        Ok(claims)
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<TokenData, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::AuthFailed("Token is empty".to_string()));
        }

        let claims = match &self.key {
            Some(key) => Self::verify_production(token, key)?,
            None => Self::verify_development(token)?,
        };

        Ok(TokenData::from_claims(claims))
    }
}

fn describe(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::ExpiredSignature => "Token has expired",
        ErrorKind::InvalidSignature => "Token signature is invalid",
        ErrorKind::ImmatureSignature => "Token is not yet valid",
        ErrorKind::InvalidAlgorithm => "Token algorithm is not allowed",
        _ => "Token is malformed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn signed(claims: serde_json::Value, secret: &str) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    /// Unsigned token for development mode tests.
    fn unsigned(claims: &str) -> String {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

        let header_b64 = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let claims_b64 = URL_SAFE_NO_PAD.encode(claims.as_bytes());
        format!("{header_b64}.{claims_b64}.fake_signature")
    }

    #[test]
    fn verifies_signed_token() {
        let verifier = JwtVerifier::with_secret(SECRET);
        let token = signed(json!({"user_id": 1, "is_network": true}), SECRET);

        let data = verifier.verify(&token).unwrap();
        assert_eq!(data.user_id, "1");
        assert!(data.is_network);
    }

    #[test]
    fn rejects_wrong_secret() {
        let verifier = JwtVerifier::with_secret(SECRET);
        let token = signed(json!({"user_id": 1}), "other-secret");

        assert_eq!(
            verifier.verify(&token),
            Err(AuthError::AuthFailed("Token signature is invalid".into()))
        );
    }

    #[test]
    fn rejects_expired_token() {
        let verifier = JwtVerifier::with_secret(SECRET);
        let token = signed(json!({"user_id": 1, "exp": 1_000_000}), SECRET);

        assert_eq!(
            verifier.verify(&token),
            Err(AuthError::AuthFailed("Token has expired".into()))
        );
    }

    #[test]
    fn rejects_garbage() {
        let verifier = JwtVerifier::with_secret(SECRET);
        assert!(matches!(verifier.verify("not-a-token"), Err(AuthError::AuthFailed(_))));
        assert!(matches!(verifier.verify("   "), Err(AuthError::AuthFailed(_))));
    }

    #[test]
    fn development_mode_skips_signature() {
        let verifier = JwtVerifier::development();
        assert!(verifier.is_development());

        let data = verifier
            .verify(&unsigned(r#"{"user_id":"5","is_network":false}"#))
            .unwrap();
        assert_eq!(data.user_id, "5");
        assert!(!data.is_network);
    }

    #[test]
    fn development_mode_still_checks_expiry() {
        let verifier = JwtVerifier::development();
        let result = verifier.verify(&unsigned(r#"{"user_id":"5","exp":1000}"#));
        assert_eq!(result, Err(AuthError::AuthFailed("Token has expired".into())));
    }
}
