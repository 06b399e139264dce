use serde::{Deserialize, Serialize};
use crate::models::account::Role;

pub const IDENTITY_TOOLKIT_AUDIENCE: &str =
    "https://identitytoolkit.googleapis.com/google.identity.identitytoolkit.v1.IdentityToolkit";

/// Lifetime of a custom token. The identity platform rejects anything longer than an hour.
pub const CUSTOM_TOKEN_TTL_SECS: i64 = 3600;

#[derive(Deserialize, Debug, Clone)]
pub struct ServiceAccountKey {
    pub private_key: String,
    pub client_email: String,
    #[serde(default)]
    pub token_uri: String,
    #[serde(default)]
    pub project_id: String,
}

/// Identity asserted by a minted session token.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionClaims {
    pub user_id: u64,
    pub role: Role,
    pub phone: String,
}

impl SessionClaims {
    pub fn uid(&self) -> String {
        format!("{}_{}", self.role, self.user_id)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DeveloperClaims {
    #[serde(rename = "userId")]
    pub user_id: u64,
    pub role: Role,
    pub phone: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CustomTokenClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub uid: String,
    pub claims: DeveloperClaims,
}
