use serde::{Deserialize, Serialize};
use crate::models::account::{Account, Role};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct OtpRequest {
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct OtpCheckRequest {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub otp: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct OtpRequestResponse {
    pub success: bool,
    pub phone: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct OtpCheckResponse {
    pub token: String,
    pub role: Role,
    pub user: Account,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_request_tolerates_missing_fields() {
        let request: OtpCheckRequest = serde_json::from_str(r#"{"phone":"0501234567"}"#).unwrap();
        assert_eq!(request.phone.as_deref(), Some("0501234567"));
        assert!(request.otp.is_none());
        assert!(request.name.is_none());
    }
}
