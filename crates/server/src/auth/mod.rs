//! Bearer-token identity: token issuing, password hashing and the request
//! extractor that turns a token into a [`talent_match_core::domain::Caller`].

pub mod extractor;
pub mod jwt;
pub mod password;

pub use extractor::AuthUser;
pub use jwt::{Claims, JwtConfig, generate_access_token, validate_token};
pub use password::{MIN_PASSWORD_LEN, hash_password, validate_password_strength, verify_password};
