use std::fs;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use aws_sdk_secretsmanager::error::{ProvideErrorMetadata, SdkError};
use serde_json::Value;
use crate::models::auth::ServiceAccountKey;
use crate::models::errors::ConfigError;
use crate::utilities::config::{get_env_var, get_optional_env_var, get_provider_secrets_id};
use crate::utilities::fields::secrets;

/// Credentials for the external providers.
#[derive(Clone)]
pub struct ProviderSecrets {
    pub otp_api_key: String,
    pub tap_secret_key: String,
    pub expo_access_token: Option<String>,
    pub admin_api_key: Option<String>,
    pub service_account: ServiceAccountKey,
}

impl std::fmt::Debug for ProviderSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSecrets")
            .field("service_account", &self.service_account.client_email)
            .finish_non_exhaustive()
    }
}

fn required_str(map: &Value, key: &str) -> Result<String, ConfigError> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::Secrets(format!("Secret is missing {}", key)))
}

fn optional_str(map: &Value, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

/// The service account may be stored as a nested object or as a JSON string.
fn service_account_from_value(value: &Value) -> Result<ServiceAccountKey, ConfigError> {
    let parsed = match value {
        Value::String(raw) => serde_json::from_str(raw),
        other => serde_json::from_value(other.clone()),
    };
    parsed.map_err(|e| ConfigError::Secrets(format!("Invalid {}: {}", secrets::SERVICE_ACCOUNT, e)))
}

impl ProviderSecrets {
    pub fn from_secret_string(raw: &str) -> Result<Self, ConfigError> {
        let map: Value = serde_json::from_str(raw)
            .map_err(|e| ConfigError::Secrets(format!("Secret is not JSON: {}", e)))?;

        let service_account = map
            .get(secrets::SERVICE_ACCOUNT)
            .ok_or_else(|| ConfigError::Secrets(format!("Secret is missing {}", secrets::SERVICE_ACCOUNT)))
            .and_then(service_account_from_value)?;

        Ok(Self {
            otp_api_key: required_str(&map, secrets::OTP_API_KEY)?,
            tap_secret_key: required_str(&map, secrets::TAP_SECRET_KEY)?,
            expo_access_token: optional_str(&map, secrets::EXPO_ACCESS_TOKEN),
            admin_api_key: optional_str(&map, secrets::ADMIN_API_KEY),
            service_account,
        })
    }

    /// Local runs read the same values from plain environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = get_env_var("SERVICE_ACCOUNT_PATH")?;
        let data = fs::read_to_string(&path)
            .map_err(|e| ConfigError::Secrets(format!("Unable to read {}: {}", path, e)))?;
        let service_account = serde_json::from_str(&data)
            .map_err(|e| ConfigError::Secrets(format!("Invalid service account JSON in {}: {}", path, e)))?;

        Ok(Self {
            otp_api_key: get_env_var("OTP_API_KEY")?,
            tap_secret_key: get_env_var("TAP_SECRET_KEY")?,
            expo_access_token: get_optional_env_var("EXPO_ACCESS_TOKEN"),
            admin_api_key: get_optional_env_var("ADMIN_API_KEY"),
            service_account,
        })
    }

    pub async fn from_secrets_manager(client: &SecretsManagerClient, secret_id: &str) -> Result<Self, ConfigError> {
        let secret = client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|err| {
                if let SdkError::ServiceError(inner) = &err {
                    log::error!(
                        "Service error when fetching secret {}: code={:?} message={:?}",
                        secret_id,
                        inner.err().code(),
                        inner.err().message()
                    );
                }
                ConfigError::Secrets(format!("Failed to fetch {}: {}", secret_id, err))
            })?;

        let raw = secret
            .secret_string()
            .ok_or_else(|| ConfigError::Secrets(format!("Secret {} has no string value", secret_id)))?;
        Self::from_secret_string(raw)
    }

    /// Uses Secrets Manager when `PROVIDER_SECRETS_ID` is set, the environment otherwise.
    pub async fn load() -> Result<Self, ConfigError> {
        match get_provider_secrets_id() {
            Some(secret_id) => {
                let client = SecretsManagerClient::new(&aws_config::load_from_env().await);
                log::info!("Loading provider secrets from {}", secret_id);
                Self::from_secrets_manager(&client, &secret_id).await
            }
            None => {
                log::info!("PROVIDER_SECRETS_ID not set, loading provider secrets from environment");
                Self::from_env()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::utilities::test::TEST_SERVICE_ACCOUNT as SERVICE_ACCOUNT;

    #[test]
    fn parses_nested_service_account() {
        let sa: Value = serde_json::from_str(SERVICE_ACCOUNT).unwrap();
        let raw = json!({
            "otp_api_key": "otp",
            "tap_secret_key": "sk_test",
            "service_account": sa,
        })
        .to_string();

        let secrets = ProviderSecrets::from_secret_string(&raw).unwrap();
        assert_eq!(secrets.otp_api_key, "otp");
        assert_eq!(secrets.service_account.project_id, "petal-test");
        assert!(secrets.expo_access_token.is_none());
    }

    #[test]
    fn parses_service_account_stored_as_string() {
        let raw = json!({
            "otp_api_key": "otp",
            "tap_secret_key": "sk_test",
            "admin_api_key": "admin",
            "service_account": SERVICE_ACCOUNT,
        })
        .to_string();

        let secrets = ProviderSecrets::from_secret_string(&raw).unwrap();
        assert_eq!(secrets.admin_api_key.as_deref(), Some("admin"));
        assert_eq!(secrets.service_account.client_email, "token-minter@petal-test.iam.gserviceaccount.com");
    }

    #[test]
    fn missing_key_is_named() {
        let raw = json!({"tap_secret_key": "sk", "service_account": SERVICE_ACCOUNT}).to_string();
        match ProviderSecrets::from_secret_string(&raw) {
            Err(ConfigError::Secrets(msg)) => assert!(msg.contains("otp_api_key")),
            other => panic!("Unexpected {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn debug_output_hides_keys() {
        let raw = json!({"otp_api_key": "very-secret", "tap_secret_key": "sk", "service_account": SERVICE_ACCOUNT}).to_string();
        let secrets = ProviderSecrets::from_secret_string(&raw).unwrap();
        assert!(!format!("{:?}", secrets).contains("very-secret"));
    }
}
