use aws_sdk_cloudwatch::types::StandardUnit;
use lambda_http::{Body, Response};
use serde_json::Value;
use petal_shared::models::errors::CallableError;
use petal_shared::models::payments::{ChargeVerification, VerifyChargeRequest};
use petal_shared::services::cloudwatch_services::{emit_optional, CHARGE_VERIFIED};
use petal_shared::services::payment_services::verify_payment;
use petal_shared::utilities::logging::log_error_chain;
use petal_shared::utilities::requests::parse_callable;
use petal_shared::utilities::responses::callable_response;
use crate::context::AppContext;

pub async fn handler(ctx: &AppContext, body: Value) -> Result<Response<Body>, lambda_http::Error> {
    let outcome = match parse_callable::<VerifyChargeRequest>(body) {
        Ok(request) => verify(ctx, request).await,
        Err(err) => Err(err),
    };
    callable_response(outcome)
}

async fn verify(ctx: &AppContext, request: VerifyChargeRequest) -> Result<ChargeVerification, CallableError> {
    let verification = verify_payment(ctx.payments.as_ref(), request)
        .await
        .map_err(|err| {
            log_error_chain("verifyTapPayment", &err);
            CallableError::from(err)
        })?;

    if verification.paid {
        emit_optional(ctx.metrics(), CHARGE_VERIFIED, 1.0, StandardUnit::Count).await;
    }
    Ok(verification)
}
