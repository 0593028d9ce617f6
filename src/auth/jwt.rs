use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::{
    auth::{claims::Claims, repo_types::UserId},
    config::JwtConfig,
    error::{AppError, AppResult},
};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Holds the HMAC key pair and the session lifetime.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        // Saturates on overflow; `sign` then reports the out-of-range expiry.
        let ttl = cfg
            .ttl_minutes
            .checked_mul(60)
            .map_or(Duration::MAX, Duration::seconds);
        Self::new(cfg.secret.as_bytes(), ttl)
    }
}

impl JwtKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn sign(&self, user_id: UserId, username: &str, now: OffsetDateTime) -> AppResult<String> {
        let exp = now
            .checked_add(self.ttl)
            .ok_or_else(|| AppError::Internal("jwt expiry out of range".into()))?;
        let claims = Claims {
            user_id: user_id.0,
            username: username.to_string(),
            iat: now.unix_timestamp(),
            exp: exp.unix_timestamp(),
            jti: Uuid::new_v4(),
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("jwt encode: {e}")))?;
        debug!(user_id = %user_id, jti = %claims.jti, "jwt signed");
        Ok(token)
    }

    /// Checks the signature with HS256 only, then compares `exp` against `now`.
    /// Expiry is checked here rather than by `jsonwebtoken` so the clock is
    /// injectable and there is no leeway.
    pub fn verify(&self, token: &str, now: OffsetDateTime) -> AppResult<Claims> {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(kind = ?e.kind(), "jwt rejected");
            AppError::TokenInvalid
        })?;

        if now.unix_timestamp() >= data.claims.exp {
            debug!(jti = %data.claims.jti, "jwt expired");
            return Err(AppError::TokenExpired);
        }

        debug!(user_id = data.claims.user_id, jti = %data.claims.jti, "jwt verified");
        Ok(data.claims)
    }
}
