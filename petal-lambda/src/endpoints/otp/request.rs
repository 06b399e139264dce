use aws_sdk_cloudwatch::types::StandardUnit;
use lambda_http::{Body, Response};
use serde_json::Value;
use petal_shared::models::errors::{AuthError, CallableError};
use petal_shared::models::phone::{OtpRequest, OtpRequestResponse};
use petal_shared::services::account_services::request_otp;
use petal_shared::services::cloudwatch_services::{emit_optional, OTP_REQUESTED};
use petal_shared::utilities::logging::{log_error_chain, log_warn};
use petal_shared::utilities::requests::parse_callable;
use petal_shared::utilities::responses::callable_response;
use crate::context::AppContext;

pub async fn handler(ctx: &AppContext, body: Value) -> Result<Response<Body>, lambda_http::Error> {
    let outcome = match parse_callable::<OtpRequest>(body) {
        Ok(request) => send_code(ctx, request).await,
        Err(err) => Err(err),
    };
    callable_response(outcome)
}

async fn send_code(ctx: &AppContext, request: OtpRequest) -> Result<OtpRequestResponse, CallableError> {
    match request_otp(ctx.otp.as_ref(), request).await {
        Ok(response) => {
            emit_optional(ctx.metrics(), OTP_REQUESTED, 1.0, StandardUnit::Count).await;
            Ok(response)
        }
        Err(err) => {
            match &err {
                AuthError::MissingPhone => log_warn("requestOtp", &err.to_string()),
                _ => log_error_chain("requestOtp", &err),
            }
            Err(err.into())
        }
    }
}
