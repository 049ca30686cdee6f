/// Session token issuance and validation
///
/// Tokens are signed with HS256 and embed the caller's identity and role.
/// The expiry window is fixed per deployment (configured in minutes); there
/// is no refresh flow: an expired token means logging in again.
///
/// # Claims
///
/// - `sub`: user ID (subject)
/// - `name`: username at issuance time
/// - `role`: account role, trusted downstream without re-verification
/// - `iss`/`iat`/`exp`/`nbf`: standard claims, issuer is always "crewbase"
///
/// # Example
///
/// ```
/// use crewbase_shared::auth::jwt::{create_token, validate_token, Claims};
/// use crewbase_shared::models::user::Role;
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let claims = Claims::new(user_id, "jdoe", Role::Employee, Duration::minutes(60));
/// let token = create_token(&claims, "secret-key-that-is-32-bytes-long!")?;
///
/// let validated = validate_token(&token, "secret-key-that-is-32-bytes-long!")?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::Role;

/// Token issuer claim value
const ISSUER: &str = "crewbase";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Username at issuance time
    pub name: String,

    /// Account role; the authorization policy trusts this claim completely
    pub role: Role,

    /// Issuer - always "crewbase"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims for a user with the given time-to-live
    pub fn new(user_id: Uuid, username: &str, role: Role, ttl: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + ttl;

        Self {
            sub: user_id,
            name: username.to_string(),
            role,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a token string
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies the signature, expiry, not-before, and issuer.
///
/// # Errors
///
/// Returns `JwtError::Expired` for an expired token, otherwise
/// `JwtError::ValidationError` with the underlying cause.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}
