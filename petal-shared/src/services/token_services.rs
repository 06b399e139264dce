use std::fs;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use crate::models::auth::{
    CustomTokenClaims, DeveloperClaims, ServiceAccountKey, SessionClaims, CUSTOM_TOKEN_TTL_SECS,
    IDENTITY_TOOLKIT_AUDIENCE,
};
use crate::models::errors::TokenError;

/// Signs custom sign-in tokens with the service account's RSA key.
pub struct TokenMinter {
    client_email: String,
    key: EncodingKey,
}

impl TokenMinter {
    pub fn from_service_account(sa: &ServiceAccountKey) -> Result<Self, TokenError> {
        // Keys pasted into env vars or secrets often carry literal "\n" sequences.
        let pem = sa.private_key.replace("\\n", "\n");
        let key = EncodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| TokenError::InvalidKey(e.to_string()))?;

        Ok(Self {
            client_email: sa.client_email.clone(),
            key,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, TokenError> {
        let sa: ServiceAccountKey = serde_json::from_str(json)
            .map_err(|e| TokenError::ServiceAccount(format!("Invalid service account JSON: {}", e)))?;
        Self::from_service_account(&sa)
    }

    pub fn from_file(path: &str) -> Result<Self, TokenError> {
        let data = fs::read_to_string(path)
            .map_err(|e| TokenError::ServiceAccount(format!("Unable to read {}: {}", path, e)))?;
        Self::from_json(&data)
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    pub fn mint(&self, session: &SessionClaims) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = CustomTokenClaims {
            iss: self.client_email.clone(),
            sub: self.client_email.clone(),
            aud: IDENTITY_TOOLKIT_AUDIENCE.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(CUSTOM_TOKEN_TTL_SECS)).timestamp(),
            uid: session.uid(),
            claims: DeveloperClaims {
                user_id: session.user_id,
                role: session.role,
                phone: session.phone.clone(),
            },
        };

        Ok(encode(&Header::new(Algorithm::RS256), &claims, &self.key)?)
    }
}
