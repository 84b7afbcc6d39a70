use serde::{Deserialize, Serialize};

/// Prefix joined to a signed token to form the session store key
pub const BEARER_PREFIX: &str = "Bearer ";

/// JWT claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub customer_id: i32,
    pub username: String,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

/// Builds the `Authorization` header value a client sends back for `token`
pub fn bearer_key(token: &str) -> String {
    format!("{}{}", BEARER_PREFIX, token)
}
