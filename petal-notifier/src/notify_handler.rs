use async_trait::async_trait;
use aws_sdk_cloudwatch::types::StandardUnit;
use aws_sdk_cloudwatch::Client as CloudWatchClient;
use futures::stream::{FuturesUnordered, StreamExt};
use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use petal_shared::models::errors::NotificationError;
use petal_shared::models::notifications::{NotificationJob, PushMessage, PushReport};
use petal_shared::services::cloudwatch_services::{emit_optional, PUSH_FAILED, PUSH_SENT};
use petal_shared::services::notification_services::ExpoPushClient;
use petal_shared::services::queue_services::validate_job;

#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, messages: Vec<PushMessage>) -> Result<PushReport, NotificationError>;
}

#[async_trait]
impl PushSender for ExpoPushClient {
    async fn send(&self, messages: Vec<PushMessage>) -> Result<PushReport, NotificationError> {
        ExpoPushClient::send(self, messages).await
    }
}

#[derive(Deserialize, Debug)]
pub struct SqsEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<SqsRecord>,
}

#[derive(Deserialize, Debug)]
pub struct SqsRecord {
    #[serde(rename = "messageId")]
    pub message_id: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct BatchItemFailure {
    #[serde(rename = "itemIdentifier")]
    pub item_identifier: String,
}

#[derive(Serialize, Debug, PartialEq, Default)]
pub struct BatchResponse {
    #[serde(rename = "batchItemFailures")]
    pub batch_item_failures: Vec<BatchItemFailure>,
}

pub fn parse_job(body: &str) -> Result<NotificationJob, NotificationError> {
    let job: NotificationJob = serde_json::from_str(body)
        .map_err(|e| NotificationError::InvalidJob(e.to_string()))?;
    validate_job(&job)?;
    Ok(job)
}

/// Partial token failures still count as delivered so the other recipients are not pushed twice.
pub async fn process_record(sender: &dyn PushSender, record: &SqsRecord) -> Result<PushReport, NotificationError> {
    let job = parse_job(&record.body)?;

    info!("Sending '{}' to {} tokens", job.title, job.tokens.len());
    let report = sender.send(job.messages()).await?;
    if report.failed > 0 {
        warn!("Message {} delivered with {} failures: {:?}", record.message_id, report.failed, report.errors);
    }
    Ok(report)
}

/// Sends every queued job and reports the records that should be redelivered.
pub async fn function_handler(
    event: LambdaEvent<Value>,
    sender: &dyn PushSender,
    cloud_watch_client: Option<&CloudWatchClient>,
) -> Result<Value, Error> {
    let sqs_event: SqsEvent = serde_json::from_value(event.payload)?;
    info!("Received {} notification records", sqs_event.records.len());

    let mut futures: FuturesUnordered<_> = sqs_event
        .records
        .iter()
        .map(|record| async move { (record.message_id.clone(), process_record(sender, record).await) })
        .collect();

    let mut response = BatchResponse::default();
    let mut total = PushReport::default();
    while let Some((message_id, outcome)) = futures.next().await {
        match outcome {
            Ok(report) => total.merge(report),
            Err(e) => {
                error!("Message {} failed: {}", message_id, e);
                response.batch_item_failures.push(BatchItemFailure { item_identifier: message_id });
            }
        }
    }

    emit_optional(cloud_watch_client, PUSH_SENT, total.sent as f64, StandardUnit::Count).await;
    if total.failed > 0 {
        emit_optional(cloud_watch_client, PUSH_FAILED, total.failed as f64, StandardUnit::Count).await;
    }

    info!(
        "Push batch done: sent={} failed={} retrying={}",
        total.sent,
        total.failed,
        response.batch_item_failures.len()
    );
    Ok(serde_json::to_value(response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use lambda_runtime::Context;
    use serde_json::json;

    struct FakeSender {
        fail_titles: Vec<&'static str>,
        sent: Mutex<Vec<PushMessage>>,
    }

    impl FakeSender {
        fn new(fail_titles: Vec<&'static str>) -> Self {
            Self { fail_titles, sent: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl PushSender for FakeSender {
        async fn send(&self, messages: Vec<PushMessage>) -> Result<PushReport, NotificationError> {
            if messages.iter().any(|m| self.fail_titles.contains(&m.title.as_str())) {
                return Err(NotificationError::PushRejected("503: unavailable".to_string()));
            }
            let count = messages.len();
            self.sent.lock().unwrap().extend(messages);
            Ok(PushReport { sent: count, ..Default::default() })
        }
    }

    fn record(id: &str, body: Value) -> Value {
        json!({"messageId": id, "body": body.to_string()})
    }

    fn job(title: &str, tokens: &[&str]) -> Value {
        json!({"tokens": tokens, "title": title, "body": "Fresh roses"})
    }

    fn event(records: Vec<Value>) -> LambdaEvent<Value> {
        LambdaEvent::new(json!({"Records": records}), Context::default())
    }

    #[test]
    fn parse_job_rejects_garbage_and_empty_jobs() {
        assert!(matches!(parse_job("not json"), Err(NotificationError::InvalidJob(_))));
        assert!(matches!(parse_job(&job("Hi", &[]).to_string()), Err(NotificationError::InvalidJob(_))));
        assert!(parse_job(&job("Hi", &["ExpoPushToken[a]"]).to_string()).is_ok());
    }

    #[tokio::test]
    async fn delivers_every_record() {
        let sender = FakeSender::new(vec![]);
        let result = function_handler(
            event(vec![
                record("m-1", job("Order shipped", &["ExpoPushToken[a]", "ExpoPushToken[b]"])),
                record("m-2", job("Order delivered", &["ExpoPushToken[c]"])),
            ]),
            &sender,
            None,
        )
        .await
        .unwrap();

        assert_eq!(result, json!({"batchItemFailures": []}));
        assert_eq!(sender.sent.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn failed_send_is_reported_for_retry() {
        let sender = FakeSender::new(vec!["Order delivered"]);
        let result = function_handler(
            event(vec![
                record("m-1", job("Order shipped", &["ExpoPushToken[a]"])),
                record("m-2", job("Order delivered", &["ExpoPushToken[c]"])),
            ]),
            &sender,
            None,
        )
        .await
        .unwrap();

        assert_eq!(result, json!({"batchItemFailures": [{"itemIdentifier": "m-2"}]}));
    }

    #[tokio::test]
    async fn malformed_record_is_reported() {
        let sender = FakeSender::new(vec![]);
        let malformed = json!({"messageId": "m-9", "body": "{oops"});
        let result = function_handler(event(vec![malformed]), &sender, None).await.unwrap();

        assert_eq!(result, json!({"batchItemFailures": [{"itemIdentifier": "m-9"}]}));
        assert!(sender.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_event_is_a_no_op() {
        let sender = FakeSender::new(vec![]);
        let result = function_handler(LambdaEvent::new(json!({}), Context::default()), &sender, None)
            .await
            .unwrap();
        assert_eq!(result, json!({"batchItemFailures": []}));
    }
}
