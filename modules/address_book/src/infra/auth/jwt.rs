use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::contract::model::OwnerId;
use crate::domain::ports::{AuthError, Authenticator};

/// Scope stamped on access tokens by the issuer; refresh tokens are refused.
const ACCESS_SCOPE: &str = "access_token";

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    scope: Option<String>,
}

/// HS256 bearer token verifier sharing a secret with the token issuer.
pub struct JwtAuthenticator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    pub fn new(cfg: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        match &cfg.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        if let Some(iss) = &cfg.issuer {
            validation.set_issuer(&[iss]);
        }

        Self {
            key: DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            validation,
        }
    }
}

impl Authenticator for JwtAuthenticator {
    fn authenticate(&self, token: &str) -> Result<OwnerId, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        if data
            .claims
            .scope
            .as_deref()
            .is_some_and(|scope| scope != ACCESS_SCOPE)
        {
            return Err(AuthError::InvalidToken("not an access token".to_owned()));
        }

        Uuid::parse_str(&data.claims.sub)
            .map(OwnerId)
            .map_err(|_| AuthError::InvalidSubject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn exp_in(secs: i64) -> i64 {
        chrono::Utc::now().timestamp() + secs
    }

    fn token(secret: &str, claims: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn authenticator() -> JwtAuthenticator {
        JwtAuthenticator::new(&AuthConfig::default())
    }

    #[test]
    fn valid_token_yields_owner() {
        let owner = Uuid::new_v4();
        let t = token(
            "secret_jwt",
            json!({"sub": owner.to_string(), "exp": exp_in(900), "scope": "access_token"}),
        );
        assert_eq!(authenticator().authenticate(&t), Ok(OwnerId(owner)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let t = token(
            "other",
            json!({"sub": Uuid::new_v4().to_string(), "exp": exp_in(900)}),
        );
        assert!(matches!(
            authenticator().authenticate(&t),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let t = token(
            "secret_jwt",
            json!({"sub": Uuid::new_v4().to_string(), "exp": exp_in(-3600)}),
        );
        assert_eq!(
            authenticator().authenticate(&t),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn refresh_token_scope_is_rejected() {
        let t = token(
            "secret_jwt",
            json!({"sub": Uuid::new_v4().to_string(), "exp": exp_in(900), "scope": "refresh_token"}),
        );
        assert!(matches!(
            authenticator().authenticate(&t),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let t = token(
            "secret_jwt",
            json!({"sub": "alice@example.com", "exp": exp_in(900)}),
        );
        assert_eq!(
            authenticator().authenticate(&t),
            Err(AuthError::InvalidSubject)
        );
    }

    #[test]
    fn configured_issuer_must_match() {
        let auth = JwtAuthenticator::new(&AuthConfig {
            issuer: Some("address-book-auth".to_owned()),
            ..AuthConfig::default()
        });
        let sub = Uuid::new_v4().to_string();

        let good = token(
            "secret_jwt",
            json!({"sub": sub, "exp": exp_in(900), "iss": "address-book-auth"}),
        );
        assert!(auth.authenticate(&good).is_ok());

        let bad = token(
            "secret_jwt",
            json!({"sub": sub, "exp": exp_in(900), "iss": "someone-else"}),
        );
        assert!(auth.authenticate(&bad).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(authenticator().authenticate("not.a.jwt").is_err());
    }
}
