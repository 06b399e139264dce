use std::fmt;
use std::fmt::Debug;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use reqwest::Error as ReqwestError;

/// Error codes understood by the callable clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    InvalidArgument,
    PermissionDenied,
    Unauthenticated,
    NotFound,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidArgument => "invalid-argument",
            ErrorCode::PermissionDenied => "permission-denied",
            ErrorCode::Unauthenticated => "unauthenticated",
            ErrorCode::NotFound => "not-found",
            ErrorCode::Internal => "internal",
        }
    }

    /// Canonical upper-case status carried next to the code in error bodies.
    pub fn status(&self) -> &'static str {
        match self {
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::Unauthenticated => "UNAUTHENTICATED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorCode::PermissionDenied => StatusCode::FORBIDDEN,
            ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The only error shape a callable endpoint returns to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallableError {
    pub code: ErrorCode,
    pub message: String,
}

impl CallableError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthenticated, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}

impl fmt::Display for CallableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CallableError {}

pub const INTERNAL_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OtpError {
    Rejected(String),
    Transport(String),
    InvalidResponse(String),
}

impl fmt::Display for OtpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtpError::Rejected(msg) => write!(f, "{}", msg),
            OtpError::Transport(msg) => write!(f, "OTP provider unreachable: {}", msg),
            OtpError::InvalidResponse(msg) => write!(f, "Invalid OTP provider response: {}", msg),
        }
    }
}

impl From<ReqwestError> for OtpError {
    fn from(err: ReqwestError) -> Self {
        OtpError::Transport(err.to_string())
    }
}

impl std::error::Error for OtpError {}

#[derive(Debug, Error)]
pub enum AccountStoreError {
    #[error("Phone {0} is already claimed by another account")]
    PhoneAlreadyClaimed(String),

    #[error("Legacy id {0} is already taken")]
    LegacyIdTaken(u64),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Malformed record: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum IdError {
    #[error("Document id is empty")]
    Empty,

    #[error("Document id {0} is not base-36")]
    NotBase36(String),
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Cannot load service account: {0}")]
    ServiceAccount(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        TokenError::Signing(err.to_string())
    }
}

/// Failures of the OTP and account resolution flow.
pub enum AuthError {
    MissingPhone,
    MissingOtp,
    OtpDelivery(OtpError),
    OtpVerification(OtpError),
    Store(AccountStoreError),
    Id(IdError),
    Token(TokenError),
    Unresolved(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingPhone => write!(f, "Phone number is required"),
            AuthError::MissingOtp => write!(f, "Phone number and OTP are required"),
            AuthError::OtpDelivery(e) => write!(f, "Failed to send OTP: {}", e),
            AuthError::OtpVerification(e) => write!(f, "{}", e),
            AuthError::Store(e) => write!(f, "Account store failed: {}", e),
            AuthError::Id(e) => write!(f, "Id derivation failed: {}", e),
            AuthError::Token(e) => write!(f, "Token minting failed: {}", e),
            AuthError::Unresolved(e) => write!(f, "Account could not be resolved: {}", e),
        }
    }
}

impl Debug for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingPhone => write!(f, "MissingPhone"),
            AuthError::MissingOtp => write!(f, "MissingOtp"),
            AuthError::OtpDelivery(e) => write!(f, "OtpDelivery: {:?}", e),
            AuthError::OtpVerification(e) => write!(f, "OtpVerification: {:?}", e),
            AuthError::Store(e) => write!(f, "Store: {:?}", e),
            AuthError::Id(e) => write!(f, "Id: {:?}", e),
            AuthError::Token(e) => write!(f, "Token: {:?}", e),
            AuthError::Unresolved(e) => write!(f, "Unresolved: {:?}", e),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::OtpDelivery(e) | AuthError::OtpVerification(e) => Some(e),
            AuthError::Store(e) => Some(e),
            AuthError::Id(e) => Some(e),
            AuthError::Token(e) => Some(e),
            AuthError::MissingPhone | AuthError::MissingOtp | AuthError::Unresolved(_) => None,
        }
    }
}

impl From<AccountStoreError> for AuthError {
    fn from(err: AccountStoreError) -> Self {
        AuthError::Store(err)
    }
}

impl From<IdError> for AuthError {
    fn from(err: IdError) -> Self {
        AuthError::Id(err)
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::Token(err)
    }
}

impl From<AuthError> for CallableError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingPhone | AuthError::MissingOtp => CallableError::invalid_argument(err.to_string()),
            AuthError::OtpVerification(OtpError::Rejected(msg)) => CallableError::permission_denied(msg),
            AuthError::OtpDelivery(OtpError::Rejected(msg)) => CallableError::internal(msg),
            AuthError::OtpDelivery(_) | AuthError::OtpVerification(_) => CallableError::internal(err.to_string()),
            AuthError::Store(_) | AuthError::Id(_) | AuthError::Token(_) | AuthError::Unresolved(_) => {
                CallableError::internal(INTERNAL_MESSAGE)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PaymentError {
    MissingChargeId,
    InvalidAmount,
    InvalidRequest(String),
    ProviderRejected(String),
    Transport(String),
    InvalidResponse(String),
}

impl fmt::Display for PaymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentError::MissingChargeId => write!(f, "chargeId is required"),
            PaymentError::InvalidAmount => write!(f, "Charge amount must be greater than zero"),
            PaymentError::InvalidRequest(msg) => write!(f, "Invalid charge request: {}", msg),
            PaymentError::ProviderRejected(msg) => write!(f, "{}", msg),
            PaymentError::Transport(msg) => write!(f, "Payment provider unreachable: {}", msg),
            PaymentError::InvalidResponse(msg) => write!(f, "Invalid payment provider response: {}", msg),
        }
    }
}

impl From<ReqwestError> for PaymentError {
    fn from(err: ReqwestError) -> Self {
        PaymentError::Transport(err.to_string())
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for CallableError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::MissingChargeId | PaymentError::InvalidAmount | PaymentError::InvalidRequest(_) => {
                CallableError::invalid_argument(err.to_string())
            }
            PaymentError::ProviderRejected(msg) => CallableError::internal(msg),
            PaymentError::Transport(_) | PaymentError::InvalidResponse(_) => CallableError::internal(err.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ReqwestError),

    #[error("Push provider rejected the request: {0}")]
    PushRejected(String),

    #[error("Invalid push provider response: {0}")]
    InvalidResponse(String),

    #[error("Queue error: {0}")]
    Queue(String),

    #[error("Invalid notification job: {0}")]
    InvalidJob(String),
}

impl From<NotificationError> for CallableError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::InvalidJob(msg) => CallableError::invalid_argument(msg),
            other => CallableError::internal(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(String),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },

    #[error("Secrets error: {0}")]
    Secrets(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("HTTP client error: {0}")]
    Http(#[from] ReqwestError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_verification_is_permission_denied_with_provider_message() {
        let err: CallableError = AuthError::OtpVerification(OtpError::Rejected("Invalid OTP".to_string())).into();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert_eq!(err.message, "Invalid OTP");
    }

    #[test]
    fn missing_fields_are_invalid_argument() {
        let err: CallableError = AuthError::MissingOtp.into();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
        assert_eq!(err.code.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_failures_hide_details() {
        let err: CallableError = AuthError::Store(AccountStoreError::Storage("throttled".to_string())).into();
        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.message, INTERNAL_MESSAGE);
    }

    #[test]
    fn delivery_failure_keeps_provider_message() {
        let err: CallableError = AuthError::OtpDelivery(OtpError::Rejected("Template not found".to_string())).into();
        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.message, "Template not found");
    }

    #[test]
    fn error_code_serializes_kebab_case() {
        assert_eq!(serde_json::to_string(&ErrorCode::PermissionDenied).unwrap(), "\"permission-denied\"");
        assert_eq!(ErrorCode::PermissionDenied.status(), "PERMISSION_DENIED");
    }
}
