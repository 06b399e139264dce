use std::time::Instant;
use aws_sdk_cloudwatch::types::StandardUnit;
use lambda_http::{Body, Response};
use serde_json::Value;
use petal_shared::models::errors::{AuthError, CallableError, OtpError};
use petal_shared::models::phone::{OtpCheckRequest, OtpCheckResponse};
use petal_shared::services::account_services::check_otp;
use petal_shared::services::cloudwatch_services::{
    emit_optional, ACCOUNT_CREATED, CHECK_OTP_LATENCY, OTP_REJECTED, OTP_VERIFIED,
};
use petal_shared::utilities::logging::{log_error_chain, log_info, log_warn};
use petal_shared::utilities::requests::parse_callable;
use petal_shared::utilities::responses::callable_response;
use crate::context::AppContext;

pub async fn handler(ctx: &AppContext, body: Value) -> Result<Response<Body>, lambda_http::Error> {
    let started = Instant::now();
    let outcome = match parse_callable::<OtpCheckRequest>(body) {
        Ok(request) => sign_in(ctx, request).await,
        Err(err) => Err(err),
    };

    let elapsed = started.elapsed().as_millis() as f64;
    emit_optional(ctx.metrics(), CHECK_OTP_LATENCY, elapsed, StandardUnit::Milliseconds).await;
    callable_response(outcome)
}

async fn sign_in(ctx: &AppContext, request: OtpCheckRequest) -> Result<OtpCheckResponse, CallableError> {
    match check_otp(ctx.otp.as_ref(), ctx.accounts.as_ref(), &ctx.minter, request).await {
        Ok((response, created)) => {
            emit_optional(ctx.metrics(), OTP_VERIFIED, 1.0, StandardUnit::Count).await;
            if created {
                emit_optional(ctx.metrics(), ACCOUNT_CREATED, 1.0, StandardUnit::Count).await;
                log_info("checkOtp", &format!("Created customer {}", response.user.legacy_id()));
            }
            Ok(response)
        }
        Err(err) => {
            match &err {
                AuthError::OtpVerification(OtpError::Rejected(_)) => {
                    emit_optional(ctx.metrics(), OTP_REJECTED, 1.0, StandardUnit::Count).await;
                    log_warn("checkOtp", &err.to_string());
                }
                AuthError::MissingPhone | AuthError::MissingOtp => log_warn("checkOtp", &err.to_string()),
                _ => log_error_chain("checkOtp", &err),
            }
            Err(err.into())
        }
    }
}
