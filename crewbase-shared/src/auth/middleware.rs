/// Authentication context for authorized calls
///
/// After the transport layer validates a session token, it attaches an
/// [`AuthContext`], the `(user_id, role)` claim pair, to the request.
/// Every service operation takes this context as an explicit parameter;
/// nothing in the core reads identity from ambient state, and the pair is
/// trusted without re-verification (it was established at token
/// validation).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::Claims;
use crate::models::user::Role;

/// Error type for credential extraction
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No credentials were supplied
    #[error("Missing credentials")]
    MissingCredentials,

    /// Credentials were supplied in an unexpected shape
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),
}

/// Validated claim pair attached to every authorized request
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Role claim from the session token
    pub role: Role,
}

impl AuthContext {
    /// Creates an auth context from validated token claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }

    /// Whether the caller is an administrator
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value
///
/// # Errors
///
/// `AuthError::InvalidFormat` if the header does not carry a bearer token.
pub fn bearer_token(header_value: &str) -> Result<&str, AuthError> {
    header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_auth_context_from_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "jdoe", Role::Administrator, Duration::minutes(5));

        let ctx = AuthContext::from_claims(&claims);
        assert_eq!(ctx.user_id, user_id);
        assert!(ctx.is_admin());
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(bearer_token("Basic dXNlcg==").is_err());
        assert!(bearer_token("bearer abc").is_err());
    }
}
