use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CAPTURED: &str = "CAPTURED";

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct ChargeCustomer {
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Callable input for `createTapCharge`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateChargeRequest {
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub customer: Option<ChargeCustomer>,
    #[serde(default, alias = "order_id")]
    pub order_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "redirect_url")]
    pub redirect_url: Option<String>,
    #[serde(default, alias = "webhook_url")]
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VerifyChargeRequest {
    #[serde(default, alias = "charge_id")]
    pub charge_id: Option<String>,
}

/// A validated charge, ready to be sent to the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeOrder {
    pub amount: Decimal,
    pub currency: String,
    pub customer: ChargeCustomer,
    pub order_id: Option<String>,
    pub description: Option<String>,
    pub redirect_url: String,
    pub webhook_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TapPhone {
    pub country_code: String,
    pub number: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TapCustomer {
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<TapPhone>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TapUrl {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TapSource {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TapReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TapChargeBody {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    #[serde(rename = "threeDSecure")]
    pub three_d_secure: bool,
    pub save_card: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub reference: TapReference,
    pub customer: TapCustomer,
    pub source: TapSource,
    pub post: TapUrl,
    pub redirect: TapUrl,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TapTransaction {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TapCharge {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub transaction: Option<TapTransaction>,
    #[serde(default)]
    pub reference: Option<Value>,
}

impl TapCharge {
    pub fn is_paid(&self) -> bool {
        self.status.eq_ignore_ascii_case(CAPTURED)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChargeCreated {
    pub charge_id: String,
    pub status: String,
    pub payment_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChargeVerification {
    pub charge_id: String,
    pub status: String,
    pub paid: bool,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
}

impl From<TapCharge> for ChargeVerification {
    fn from(charge: TapCharge) -> Self {
        let paid = charge.is_paid();
        Self {
            charge_id: charge.id,
            status: charge.status,
            paid,
            amount: charge.amount,
            currency: charge.currency,
        }
    }
}

impl From<TapCharge> for ChargeCreated {
    fn from(charge: TapCharge) -> Self {
        Self {
            charge_id: charge.id,
            status: charge.status,
            payment_url: charge.transaction.and_then(|t| t.url),
        }
    }
}
