//! HS256 access tokens carrying the user id and role.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use talent_match_core::domain::{Role, UserId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The user's id as a hyphenated UUID.
    pub sub: String,
    /// Role name at issue time. Authorization uses the stored role.
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

pub fn generate_access_token(
    user_id: UserId,
    role: Role,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.as_str().to_string(),
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Checks signature and expiry.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 30,
        }
    }

    #[test]
    fn issued_token_validates() {
        let config = config("test-secret-that-is-long-enough");
        let user_id = UserId::new();

        let token = generate_access_token(user_id, Role::Company, &config)
            .expect("token generation should succeed");
        let claims = validate_token(&token, &config).expect("token should validate");

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, "company");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = config("test-secret-that-is-long-enough");
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: UserId::new().to_string(),
            role: "student".to_string(),
            exp: now - 600,
            iat: now - 1200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let token = generate_access_token(UserId::new(), Role::Admin, &config("alpha"))
            .expect("token generation should succeed");

        assert!(validate_token(&token, &config("bravo")).is_err());
    }
}
