use aws_sdk_cloudwatch::types::StandardUnit;
use lambda_http::{Body, Request, Response};
use serde_json::Value;
use petal_shared::models::errors::CallableError;
use petal_shared::models::notifications::{NotificationJob, NotificationQueued};
use petal_shared::services::cloudwatch_services::{emit_optional, NOTIFICATION_QUEUED};
use petal_shared::services::queue_services::validate_job;
use petal_shared::utilities::fields::headers;
use petal_shared::utilities::logging::{log_error_chain, log_warn};
use petal_shared::utilities::requests::{extract_header, parse_callable};
use petal_shared::utilities::responses::callable_response;
use crate::context::AppContext;

pub async fn handler(ctx: &AppContext, event: &Request, body: Value) -> Result<Response<Body>, lambda_http::Error> {
    let outcome = match authorize(ctx, extract_header(event, headers::ADMIN_API_KEY)) {
        Ok(()) => match parse_callable::<NotificationJob>(body) {
            Ok(job) => queue(ctx, job).await,
            Err(err) => Err(err),
        },
        Err(err) => Err(err),
    };
    callable_response(outcome)
}

/// Only the back office, holding the admin key, may broadcast.
fn authorize(ctx: &AppContext, presented: Option<&str>) -> Result<(), CallableError> {
    match (ctx.admin_api_key.as_deref(), presented) {
        (Some(expected), Some(presented)) if expected == presented => Ok(()),
        _ => {
            log_warn("sendNotification", "Rejected call without a valid admin key");
            Err(CallableError::unauthenticated("A valid admin key is required"))
        }
    }
}

async fn queue(ctx: &AppContext, job: NotificationJob) -> Result<NotificationQueued, CallableError> {
    validate_job(&job)?;
    ctx.notifications.publish(&job).await.map_err(|err| {
        log_error_chain("sendNotification", &err);
        CallableError::from(err)
    })?;

    emit_optional(ctx.metrics(), NOTIFICATION_QUEUED, job.tokens.len() as f64, StandardUnit::Count).await;
    Ok(NotificationQueued { queued: true, recipients: job.tokens.len() })
}
