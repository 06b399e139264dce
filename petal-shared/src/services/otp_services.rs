use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use crate::models::errors::OtpError;
use crate::utilities::fields::headers;
use crate::utilities::phone_numbers::{phone_fingerprint, provider_phone};

/// Sends and checks one-time codes through the SMS provider.
#[async_trait]
pub trait OtpProvider: Send + Sync {
    async fn send_otp(&self, phone: &str) -> Result<(), OtpError>;

    async fn verify_otp(&self, phone: &str, otp: &str) -> Result<(), OtpError>;
}

#[derive(Debug, Serialize, PartialEq)]
pub struct SendOtpBody {
    pub phone: String,
    pub method: String,
    pub template_id: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct VerifyOtpBody {
    pub phone: String,
    pub otp: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ProviderReply {
    #[serde(default)]
    pub status: Option<bool>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ProviderErrorDetail>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ProviderErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

pub struct HttpOtpProvider {
    client: Client,
    base_url: String,
    api_key: String,
    method: String,
    template_id: String,
}

impl HttpOtpProvider {
    pub fn new(
        base_url: &str,
        api_key: &str,
        method: &str,
        template_id: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            method: method.to_string(),
            template_id: template_id.to_string(),
        })
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), OtpError> {
        let url = format!("{}/{}", self.base_url, path);
        let res = self.client
            .post(&url)
            .header(headers::OTP_API_KEY, &self.api_key)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;

        let status = res.status();
        let bytes = res.bytes().await?;
        interpret_reply(status, &bytes)
    }
}

#[async_trait]
impl OtpProvider for HttpOtpProvider {
    async fn send_otp(&self, phone: &str) -> Result<(), OtpError> {
        log::info!("[OTP] Sending code to {}", phone_fingerprint(phone));
        let body = SendOtpBody {
            phone: provider_phone(phone),
            method: self.method.clone(),
            template_id: self.template_id.clone(),
        };
        self.post("send-otp", &body).await
    }

    async fn verify_otp(&self, phone: &str, otp: &str) -> Result<(), OtpError> {
        log::info!("[OTP] Verifying code for {}", phone_fingerprint(phone));
        let body = VerifyOtpBody {
            phone: provider_phone(phone),
            otp: otp.trim().to_string(),
        };
        self.post("verify-otp", &body).await
    }
}

/// Maps a provider reply to accept/reject. A 2xx without an explicit `false` flag is accepted.
pub fn interpret_reply(status: StatusCode, body: &[u8]) -> Result<(), OtpError> {
    let reply: Option<ProviderReply> = serde_json::from_slice(body).ok();

    let flagged_false = reply
        .as_ref()
        .map(|r| r.status == Some(false) || r.success == Some(false))
        .unwrap_or(false);

    if status.is_success() && !flagged_false {
        return Ok(());
    }

    let message = reply
        .and_then(|r| {
            r.message
                .filter(|m| !m.trim().is_empty())
                .or_else(|| r.errors.into_iter().find_map(|e| e.message))
        })
        .unwrap_or_else(|| {
            status.canonical_reason().unwrap_or("OTP provider error").to_string()
        });

    log::warn!("[OTP] Provider rejected request with {}: {}", status, message);
    Err(OtpError::Rejected(message))
}
