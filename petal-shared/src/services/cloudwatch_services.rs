use aws_sdk_cloudwatch::Client as CloudWatchClient;
use aws_sdk_cloudwatch::types::{Dimension, MetricDatum, StandardUnit};
use aws_config::BehaviorVersion;
use crate::utilities::config::get_environment;

pub const OTP_REQUESTED: &str = "OtpRequested";
pub const OTP_VERIFIED: &str = "OtpVerified";
pub const OTP_REJECTED: &str = "OtpRejected";
pub const ACCOUNT_CREATED: &str = "AccountCreated";
pub const CHECK_OTP_LATENCY: &str = "CheckOtpLatency";
pub const CHARGE_CREATED: &str = "ChargeCreated";
pub const CHARGE_VERIFIED: &str = "ChargeVerified";
pub const NOTIFICATION_QUEUED: &str = "NotificationQueued";
pub const PUSH_SENT: &str = "PushSent";
pub const PUSH_FAILED: &str = "PushFailed";

pub async fn create_cloudwatch_client() -> CloudWatchClient {
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    CloudWatchClient::new(&config)
}

pub fn metrics_namespace(environment: &str) -> String {
    format!("{}/PetalLambda/Metrics", environment)
}

/// Emits a CloudWatch metric with a given name, value, and unit.
pub async fn emit_metric(cloud_watch_client: &CloudWatchClient, metric_name: &str, value: f64, unit: StandardUnit) {
    emit_metric_with_dimensions(cloud_watch_client, metric_name, value, unit, &[]).await;
}

/// Failures are logged and swallowed; a metric never fails a request.
pub async fn emit_metric_with_dimensions(
    cloud_watch_client: &CloudWatchClient,
    metric_name: &str,
    value: f64,
    unit: StandardUnit,
    dimensions: &[(&str, &str)],
) {
    let namespace = metrics_namespace(&get_environment());
    log::info!("Emitting metric {} : {} {}", metric_name, value, unit);

    let dims: Vec<Dimension> = dimensions
        .iter()
        .map(|(name, value)| Dimension::builder().name(*name).value(*value).build())
        .collect();

    let datum = MetricDatum::builder()
        .metric_name(metric_name)
        .value(value)
        .unit(unit)
        .set_dimensions(if dims.is_empty() { None } else { Some(dims) })
        .build();

    if let Err(err) = cloud_watch_client
        .put_metric_data()
        .namespace(namespace)
        .metric_data(datum)
        .send()
        .await
    {
        log::error!("Failed to emit CloudWatch metric '{}': {:?}", metric_name, err);
    }
}

/// Emits only when a client is configured.
pub async fn emit_optional(
    cloud_watch_client: Option<&CloudWatchClient>,
    metric_name: &str,
    value: f64,
    unit: StandardUnit,
) {
    if let Some(client) = cloud_watch_client {
        emit_metric(client, metric_name, value, unit).await;
    }
}
