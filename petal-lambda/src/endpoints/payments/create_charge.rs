use aws_sdk_cloudwatch::types::StandardUnit;
use lambda_http::{Body, Response};
use serde_json::Value;
use petal_shared::models::errors::CallableError;
use petal_shared::models::payments::{ChargeCreated, CreateChargeRequest};
use petal_shared::services::cloudwatch_services::{emit_optional, CHARGE_CREATED};
use petal_shared::services::payment_services::create_charge;
use petal_shared::utilities::logging::log_error_chain;
use petal_shared::utilities::requests::parse_callable;
use petal_shared::utilities::responses::callable_response;
use crate::context::AppContext;

pub async fn handler(ctx: &AppContext, body: Value) -> Result<Response<Body>, lambda_http::Error> {
    let outcome = match parse_callable::<CreateChargeRequest>(body) {
        Ok(request) => charge(ctx, request).await,
        Err(err) => Err(err),
    };
    callable_response(outcome)
}

async fn charge(ctx: &AppContext, request: CreateChargeRequest) -> Result<ChargeCreated, CallableError> {
    let created = create_charge(ctx.payments.as_ref(), request, &ctx.charge_defaults)
        .await
        .map_err(|err| {
            log_error_chain("createTapCharge", &err);
            CallableError::from(err)
        })?;

    emit_optional(ctx.metrics(), CHARGE_CREATED, 1.0, StandardUnit::Count).await;
    Ok(created)
}
