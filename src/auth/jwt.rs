use axum::extract::FromRef;
use jsonwebtoken::{decode, DecodingKey, Validation};
use tracing::debug;

use crate::auth::claims::Claims;
use crate::config::JwtConfig;
use crate::state::AppState;

/// Verification half of the identity provider's signing key.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding: DecodingKey,
    issuer: String,
    audience: String,
}

impl FromRef<AppState> for JwtVerifier {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
        } = state.config.jwt.clone();
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
        }
    }
}

impl JwtVerifier {
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(identity = %data.claims.unique_name, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::{Duration, OffsetDateTime};

    fn make_verifier() -> JwtVerifier {
        JwtVerifier::from_ref(&AppState::fake())
    }

    fn sign(secret: &str, iss: &str, aud: &str, email: &str, ttl: Duration) -> String {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            unique_name: email.into(),
            name: "Test User".into(),
            iat: now.unix_timestamp() as usize,
            exp: (now + ttl).unix_timestamp() as usize,
            iss: iss.into(),
            aud: aud.into(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("sign test token")
    }

    #[tokio::test]
    async fn verifies_token_from_configured_issuer() {
        let verifier = make_verifier();
        let token = sign(
            "test",
            "test-issuer",
            "test-aud",
            "alice@example.com",
            Duration::minutes(5),
        );
        let claims = verifier.verify(&token).expect("verify");
        assert_eq!(claims.unique_name, "alice@example.com");
        assert_eq!(claims.name, "Test User");
    }

    #[tokio::test]
    async fn rejects_wrong_secret() {
        let verifier = make_verifier();
        let token = sign(
            "other-secret",
            "test-issuer",
            "test-aud",
            "alice@example.com",
            Duration::minutes(5),
        );
        assert!(verifier.verify(&token).is_err());
    }

    #[tokio::test]
    async fn rejects_wrong_audience() {
        let verifier = make_verifier();
        let token = sign(
            "test",
            "test-issuer",
            "someone-else",
            "alice@example.com",
            Duration::minutes(5),
        );
        assert!(verifier.verify(&token).is_err());
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let verifier = make_verifier();
        let token = sign(
            "test",
            "test-issuer",
            "test-aud",
            "alice@example.com",
            Duration::minutes(-10),
        );
        assert!(verifier.verify(&token).is_err());
    }
}
