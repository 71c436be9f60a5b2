use crate::error::{AuthError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use saas_models::TenantId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,                 // User ID
    pub customer_id: Option<String>, // Owning customer (tenant); absent for platform users
    pub role: Option<String>,        // Customer-scoped role (admin, recruiter, ...)
    pub email: String,               // User email
    pub exp: i64,                    // Expiration time
    pub iat: i64,                    // Issued at
    pub jti: String,                 // JWT ID (unique identifier)
    pub token_type: TokenType,       // access or refresh
}

impl Claims {
    /// Customer the principal acts for. A malformed claim counts as absent.
    pub fn tenant_id(&self) -> Option<TenantId> {
        self.customer_id.as_deref().and_then(|id| id.parse().ok())
    }

    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AuthError::InvalidToken("Invalid user ID in token".to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_token_exp_hours: i64,
}

impl JwtService {
    pub fn new(secret: &str) -> Result<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::ConfigurationError(format!(
                "JWT secret must be at least {} characters",
                MIN_SECRET_LEN
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm: Algorithm::HS256,
            access_token_exp_hours: 1,
        })
    }

    pub fn with_access_token_hours(mut self, hours: i64) -> Self {
        self.access_token_exp_hours = hours;
        self
    }

    /// Generate an access token
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        email: &str,
        customer_id: Option<TenantId>,
        role: Option<String>,
    ) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.access_token_exp_hours);

        let claims = Claims {
            sub: user_id.to_string(),
            customer_id: customer_id.map(|id| id.to_string()),
            role,
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: TokenType::Access,
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(self.algorithm);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;

        Ok(token_data.claims)
    }

    /// Validate access token specifically
    pub fn validate_access_token(&self, token: &str) -> Result<Claims> {
        let claims = self.validate_token(token)?;

        if claims.token_type != TokenType::Access {
            return Err(AuthError::InvalidToken(
                "Token is not an access token".to_string(),
            ));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-min-32-characters-long";

    #[test]
    fn test_generate_and_validate_access_token() {
        let jwt = JwtService::new(SECRET).unwrap();
        let user_id = Uuid::new_v4();
        let customer_id = TenantId::generate();
        let email = "test@example.com";

        let token = jwt
            .generate_access_token(user_id, email, Some(customer_id), Some("admin".to_string()))
            .expect("Failed to generate token");

        let claims = jwt
            .validate_access_token(&token)
            .expect("Failed to validate token");

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.tenant_id(), Some(customer_id));
        assert_eq!(claims.email, email);
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn test_token_without_customer() {
        let jwt = JwtService::new(SECRET).unwrap();

        let token = jwt
            .generate_access_token(Uuid::new_v4(), "ops@example.com", None, None)
            .unwrap();
        let claims = jwt.validate_access_token(&token).unwrap();

        assert_eq!(claims.tenant_id(), None);
    }

    #[test]
    fn test_malformed_customer_claim_is_absent() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            customer_id: Some("42".to_string()),
            role: None,
            email: "x@example.com".to_string(),
            exp: 0,
            iat: 0,
            jti: Uuid::new_v4().to_string(),
            token_type: TokenType::Access,
        };
        assert_eq!(claims.tenant_id(), None);
    }

    #[test]
    fn test_rejects_token_signed_with_other_secret() {
        let issuer = JwtService::new("another-secret-key-that-is-32-chars-plus").unwrap();
        let verifier = JwtService::new(SECRET).unwrap();

        let token = issuer
            .generate_access_token(Uuid::new_v4(), "x@example.com", None, None)
            .unwrap();
        assert!(verifier.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_expired_token() {
        let jwt = JwtService::new(SECRET).unwrap().with_access_token_hours(-2);
        let token = jwt
            .generate_access_token(Uuid::new_v4(), "x@example.com", None, None)
            .unwrap();

        assert!(matches!(
            jwt.validate_access_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_short_secret_is_rejected() {
        assert!(matches!(
            JwtService::new("short"),
            Err(AuthError::ConfigurationError(_))
        ));
    }
}
