//! JWT token handling

use crate::config::JwtConfig;
use crate::domain::{Role, StringUuid};
use crate::error::{AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const AUDIENCE: &str = "delivery";
const ACCESS_TOKEN_TYPE: &str = "access";

/// Access token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub iss: String,
    pub aud: String,
    /// Token type discriminator
    #[serde(default)]
    pub token_type: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// JWT token manager
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtManager {
    /// Build a manager from configuration. An RSA private key switches signing to
    /// RS256; otherwise the shared secret is used with HS256.
    pub fn new(config: JwtConfig) -> Result<Self> {
        let algorithm = if config.private_key_pem.is_some() {
            Algorithm::RS256
        } else {
            Algorithm::HS256
        };
        let encoding_key = match config.private_key_pem.as_ref() {
            Some(private_key) => EncodingKey::from_rsa_pem(private_key.as_bytes())?,
            None => EncodingKey::from_secret(config.secret.as_bytes()),
        };
        let decoding_key = match (
            config.public_key_pem.as_ref(),
            config.private_key_pem.as_ref(),
        ) {
            (Some(public_key), _) => DecodingKey::from_rsa_pem(public_key.as_bytes())?,
            (None, Some(_)) => {
                return Err(AppError::Internal(anyhow::anyhow!(
                    "JWT_PUBLIC_KEY is required when JWT_PRIVATE_KEY is set"
                )))
            }
            (None, None) => DecodingKey::from_secret(config.secret.as_bytes()),
        };
        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            algorithm,
        })
    }

    /// Validation with a 5 second leeway instead of the default 60.
    fn strict_validation(&self) -> Validation {
        let mut v = Validation::new(self.algorithm);
        v.leeway = 5;
        v.set_audience(&[AUDIENCE]);
        v.set_issuer(&[&self.config.issuer]);
        v
    }

    /// Create an access token for an authenticated user
    pub fn create_access_token(
        &self,
        user_id: StringUuid,
        username: &str,
        role: Role,
    ) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.access_token_ttl_secs);

        let claims = AccessClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role,
            iss: self.config.issuer.clone(),
            aud: AUDIENCE.to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        let header = Header::new(self.algorithm);
        encode(&header, &claims, &self.encoding_key).map_err(|e| AppError::Internal(e.into()))
    }

    /// Verify signature, expiry, issuer and audience, then decode the claims
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &self.strict_validation())?;
        let claims = token_data.claims;

        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(AppError::Unauthorized("Unexpected token type".to_string()));
        }
        if claims.role == Role::Anonymous {
            return Err(AppError::Unauthorized(
                "Token carries no usable role".to_string(),
            ));
        }
        Ok(claims)
    }

    /// Token lifetime in seconds
    pub fn access_token_ttl(&self) -> i64 {
        self.config.access_token_ttl_secs
    }

    pub fn uses_rsa(&self) -> bool {
        self.algorithm == Algorithm::RS256
    }
}
