use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use crate::models::errors::PaymentError;
use crate::models::payments::{
    ChargeCreated, ChargeCustomer, ChargeOrder, ChargeVerification, CreateChargeRequest, TapCharge,
    TapChargeBody, TapCustomer, TapPhone, TapReference, TapSource, TapUrl, VerifyChargeRequest,
};
use crate::utilities::phone_numbers::{normalize_phone, SAUDI_COUNTRY_CODE};

/// Lets the customer pick any enabled payment method on the hosted page.
pub const SOURCE_ALL: &str = "src_all";

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_charge(&self, order: &ChargeOrder) -> Result<TapCharge, PaymentError>;

    async fn get_charge(&self, charge_id: &str) -> Result<TapCharge, PaymentError>;
}

/// Fallbacks applied to charge requests that leave fields out.
#[derive(Debug, Clone, Default)]
pub struct ChargeDefaults {
    pub currency: String,
    pub redirect_url: Option<String>,
    pub webhook_url: Option<String>,
}

pub struct TapClient {
    client: Client,
    base_url: String,
    secret_key: String,
}

impl TapClient {
    pub fn new(base_url: &str, secret_key: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
        })
    }
}

#[async_trait]
impl PaymentGateway for TapClient {
    async fn create_charge(&self, order: &ChargeOrder) -> Result<TapCharge, PaymentError> {
        let body = tap_charge_body(order);
        let res = self.client
            .post(format!("{}/charges", self.base_url))
            .bearer_auth(&self.secret_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        let bytes = res.bytes().await?;
        interpret_charge_reply(status, &bytes)
    }

    async fn get_charge(&self, charge_id: &str) -> Result<TapCharge, PaymentError> {
        let res = self.client
            .get(format!("{}/charges/{}", self.base_url, charge_id))
            .bearer_auth(&self.secret_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = res.status();
        let bytes = res.bytes().await?;
        interpret_charge_reply(status, &bytes)
    }
}

#[derive(Deserialize, Debug, Default)]
struct TapErrorReply {
    #[serde(default)]
    errors: Vec<TapErrorDetail>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TapErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

pub fn interpret_charge_reply(status: StatusCode, body: &[u8]) -> Result<TapCharge, PaymentError> {
    if status.is_success() {
        return serde_json::from_slice::<TapCharge>(body)
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()));
    }

    let reply: TapErrorReply = serde_json::from_slice(body).unwrap_or_default();
    let message = reply
        .errors
        .into_iter()
        .find_map(|e| e.description.or(e.code))
        .or(reply.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Payment provider error").to_string());

    log::warn!("[Payments] Provider rejected request with {}: {}", status, message);
    Err(PaymentError::ProviderRejected(message))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Validates a charge request and fills in the configured defaults.
pub fn build_charge_order(request: CreateChargeRequest, defaults: &ChargeDefaults) -> Result<ChargeOrder, PaymentError> {
    let amount = request.amount.ok_or(PaymentError::InvalidAmount)?;
    if amount <= Decimal::ZERO {
        return Err(PaymentError::InvalidAmount);
    }

    let customer = request
        .customer
        .filter(|c| !c.first_name.trim().is_empty())
        .ok_or_else(|| PaymentError::InvalidRequest("customer.first_name is required".to_string()))?;

    let redirect_url = non_blank(request.redirect_url)
        .or_else(|| defaults.redirect_url.clone())
        .ok_or_else(|| PaymentError::InvalidRequest("redirect_url is required".to_string()))?;
    let webhook_url = non_blank(request.webhook_url)
        .or_else(|| defaults.webhook_url.clone())
        .ok_or_else(|| PaymentError::InvalidRequest("webhook_url is required".to_string()))?;

    let currency = non_blank(request.currency)
        .unwrap_or_else(|| defaults.currency.clone())
        .to_uppercase();

    Ok(ChargeOrder {
        amount,
        currency,
        customer: ChargeCustomer {
            first_name: customer.first_name.trim().to_string(),
            last_name: non_blank(customer.last_name),
            email: non_blank(customer.email),
            phone: non_blank(customer.phone),
        },
        order_id: non_blank(request.order_id),
        description: non_blank(request.description),
        redirect_url,
        webhook_url,
    })
}

/// Saudi numbers are split into country code and subscriber number; others are sent whole.
pub fn tap_phone(phone: &str) -> TapPhone {
    let normalized = normalize_phone(phone);
    match normalized.strip_prefix(SAUDI_COUNTRY_CODE) {
        Some(number) if !number.is_empty() => TapPhone {
            country_code: SAUDI_COUNTRY_CODE.to_string(),
            number: number.to_string(),
        },
        _ => TapPhone { country_code: String::new(), number: normalized },
    }
}

pub fn tap_charge_body(order: &ChargeOrder) -> TapChargeBody {
    TapChargeBody {
        amount: order.amount,
        currency: order.currency.clone(),
        three_d_secure: true,
        save_card: false,
        description: order.description.clone(),
        reference: TapReference { order: order.order_id.clone() },
        customer: TapCustomer {
            first_name: order.customer.first_name.clone(),
            last_name: order.customer.last_name.clone(),
            email: order.customer.email.clone(),
            phone: order.customer.phone.as_deref().map(tap_phone),
        },
        source: TapSource { id: SOURCE_ALL.to_string() },
        post: TapUrl { url: order.webhook_url.clone() },
        redirect: TapUrl { url: order.redirect_url.clone() },
    }
}

pub async fn create_charge(
    gateway: &dyn PaymentGateway,
    request: CreateChargeRequest,
    defaults: &ChargeDefaults,
) -> Result<ChargeCreated, PaymentError> {
    let order = build_charge_order(request, defaults)?;
    let charge = gateway.create_charge(&order).await?;
    log::info!("[Payments] Created charge {} ({} {}) status {}", charge.id, order.amount, order.currency, charge.status);
    Ok(charge.into())
}

pub async fn verify_payment(
    gateway: &dyn PaymentGateway,
    request: VerifyChargeRequest,
) -> Result<ChargeVerification, PaymentError> {
    let charge_id = non_blank(request.charge_id).ok_or(PaymentError::MissingChargeId)?;
    if !charge_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(PaymentError::InvalidRequest(format!("Malformed chargeId: {}", charge_id)));
    }

    let charge = gateway.get_charge(&charge_id).await?;
    log::info!("[Payments] Charge {} status {}", charge.id, charge.status);
    Ok(charge.into())
}
