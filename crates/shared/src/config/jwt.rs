use crate::{abstract_trait::jwt::JwtServiceTrait, errors::ServiceError, model::user::Role};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn lifetime(&self) -> Duration {
        match self {
            TokenType::Access => Duration::minutes(10),
            TokenType::Refresh => Duration::hours(24),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub role: Role,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

pub struct JwtConfig {
    encoding: EncodingKey,
    decoding: DecodingKey,
    sequence: AtomicU64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig").field("secret", &"***").finish()
    }
}

impl JwtConfig {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(jwt_secret.as_bytes()),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn generate_token_at(
        &self,
        user_id: i64,
        role: Role,
        token_type: TokenType,
        issued_at: DateTime<Utc>,
    ) -> Result<String, ServiceError> {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let claims = Claims {
            sub: user_id,
            role,
            token_type,
            iat: issued_at.timestamp(),
            exp: (issued_at + token_type.lifetime()).timestamp(),
            jti: format!("{:x}-{seq:x}", issued_at.timestamp_micros()),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }
}

impl JwtServiceTrait for JwtConfig {
    fn generate_token(
        &self,
        user_id: i64,
        role: Role,
        token_type: TokenType,
    ) -> Result<String, ServiceError> {
        self.generate_token_at(user_id, role, token_type, Utc::now())
    }

    fn verify_token(&self, token: &str, expected: TokenType) -> Result<Claims, ServiceError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
                _ => ServiceError::Jwt(e),
            }
        })?;

        if data.claims.token_type != expected {
            return Err(ServiceError::InvalidTokenType);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_round_trip() {
        let jwt = JwtConfig::new("secret");
        let token = jwt
            .generate_token(42, Role::Tutor, TokenType::Access)
            .unwrap();
        let claims = jwt.verify_token(&token, TokenType::Access).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Tutor);
        assert_eq!(claims.exp - claims.iat, 600);
    }

    #[test]
    fn refresh_token_lives_a_day() {
        let jwt = JwtConfig::new("secret");
        let token = jwt
            .generate_token(1, Role::User, TokenType::Refresh)
            .unwrap();
        let claims = jwt.verify_token(&token, TokenType::Refresh).unwrap();
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn rejects_wrong_token_type() {
        let jwt = JwtConfig::new("secret");
        let token = jwt
            .generate_token(1, Role::User, TokenType::Refresh)
            .unwrap();
        assert!(matches!(
            jwt.verify_token(&token, TokenType::Access),
            Err(ServiceError::InvalidTokenType)
        ));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let jwt = JwtConfig::new("secret");
        let token = jwt
            .generate_token_at(
                1,
                Role::User,
                TokenType::Access,
                Utc::now() - Duration::minutes(11),
            )
            .unwrap();
        assert!(matches!(
            jwt.verify_token(&token, TokenType::Access),
            Err(ServiceError::TokenExpired)
        ));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let token = JwtConfig::new("one")
            .generate_token(1, Role::User, TokenType::Access)
            .unwrap();
        assert!(matches!(
            JwtConfig::new("two").verify_token(&token, TokenType::Access),
            Err(ServiceError::Jwt(_))
        ));
    }

    #[test]
    fn tokens_issued_together_differ() {
        let jwt = JwtConfig::new("secret");
        let now = Utc::now();
        let a = jwt
            .generate_token_at(1, Role::User, TokenType::Refresh, now)
            .unwrap();
        let b = jwt
            .generate_token_at(1, Role::User, TokenType::Refresh, now)
            .unwrap();
        assert_ne!(a, b);
    }
}
