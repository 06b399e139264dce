use dotenv::dotenv;
use std::env;
use std::time::Duration;
use crate::models::errors::ConfigError;

pub const DEFAULT_OTP_API_BASE_URL: &str = "https://api.authentica.sa/api/v2";
pub const DEFAULT_OTP_METHOD: &str = "sms";
pub const DEFAULT_TAP_API_BASE_URL: &str = "https://api.tap.company/v2";
pub const DEFAULT_EXPO_PUSH_URL: &str = "https://exp.host/--/api/v2/push/send";
pub const DEFAULT_CURRENCY: &str = "SAR";
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;

/// Initialize dotenv (only needs to be called once at startup)
pub fn init() {
    if dotenv().is_ok() {
        log::info!("Loaded .env file");
    } else {
        log::debug!("No .env file loaded");
    }
}

/// Fetch a required environment variable
pub fn get_env_var(key: &str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnv(key.to_string()))
}

pub fn get_env_var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub fn get_optional_env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub fn get_environment() -> String {
    get_env_var_or("ENVIRONMENT", "dev")
}

//Tables and queues
pub fn get_accounts_table() -> Result<String, ConfigError> {
    get_env_var("ACCOUNTS_TABLE_NAME")
}

pub fn get_dynamodb_endpoint() -> Option<String> {
    get_optional_env_var("DYNAMODB_ENDPOINT_URL")
}

pub fn get_notification_queue() -> Result<String, ConfigError> {
    get_env_var("NOTIFICATION_QUEUE_URL")
}

//OTP provider
pub fn get_otp_base_url() -> String {
    get_env_var_or("OTP_API_BASE_URL", DEFAULT_OTP_API_BASE_URL)
}

pub fn get_otp_method() -> String {
    get_env_var_or("OTP_METHOD", DEFAULT_OTP_METHOD)
}

pub fn get_otp_template_id() -> Result<String, ConfigError> {
    get_env_var("OTP_TEMPLATE_ID")
}

//Payment provider
pub fn get_tap_base_url() -> String {
    get_env_var_or("TAP_API_BASE_URL", DEFAULT_TAP_API_BASE_URL)
}

pub fn get_tap_redirect_url() -> Result<String, ConfigError> {
    get_env_var("TAP_REDIRECT_URL")
}

pub fn get_tap_webhook_url() -> Result<String, ConfigError> {
    get_env_var("TAP_WEBHOOK_URL")
}

pub fn get_default_currency() -> String {
    get_env_var_or("DEFAULT_CURRENCY", DEFAULT_CURRENCY)
}

//Push provider
pub fn get_expo_push_url() -> String {
    get_env_var_or("EXPO_PUSH_URL", DEFAULT_EXPO_PUSH_URL)
}

//Secrets
pub fn get_provider_secrets_id() -> Option<String> {
    get_optional_env_var("PROVIDER_SECRETS_ID")
}

pub fn get_provider_timeout() -> Result<Duration, ConfigError> {
    match get_optional_env_var("PROVIDER_TIMEOUT_SECS") {
        None => Ok(Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS)),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::Invalid { key: "PROVIDER_TIMEOUT_SECS".to_string(), reason: e.to_string() }),
    }
}
