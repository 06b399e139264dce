use async_trait::async_trait;
use aws_sdk_sqs::Client;
use aws_config::meta::region::RegionProviderChain;
use crate::models::errors::NotificationError;
use crate::models::notifications::NotificationJob;

pub async fn get_sqs_client() -> Client {
    let region_provider = RegionProviderChain::default_provider().or_else("me-south-1");
    let config = aws_config::from_env().region(region_provider).load().await;
    Client::new(&config)
}

/// Checks a job before it is put on the queue, so the notifier only sees deliverable work.
pub fn validate_job(job: &NotificationJob) -> Result<(), NotificationError> {
    if job.tokens.is_empty() {
        return Err(NotificationError::InvalidJob("tokens must not be empty".to_string()));
    }
    if job.title.trim().is_empty() && job.body.trim().is_empty() {
        return Err(NotificationError::InvalidJob("title or body is required".to_string()));
    }
    Ok(())
}

pub async fn enqueue_notification(
    sqs_client: &Client,
    queue_url: &str,
    job: &NotificationJob,
) -> Result<(), NotificationError> {
    validate_job(job)?;
    let payload = serde_json::to_string(job)
        .map_err(|e| NotificationError::InvalidJob(e.to_string()))?;

    sqs_client
        .send_message()
        .queue_url(queue_url)
        .message_body(payload)
        .send()
        .await
        .map_err(|e| NotificationError::Queue(format!("{:?}", e)))?;

    log::info!("[Queue] Enqueued notification for {} tokens", job.tokens.len());
    Ok(())
}

/// Hands notification jobs to the notifier function.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish(&self, job: &NotificationJob) -> Result<(), NotificationError>;
}

pub struct SqsNotificationPublisher {
    client: Client,
    queue_url: String,
}

impl SqsNotificationPublisher {
    pub fn new(client: Client, queue_url: String) -> Self {
        Self { client, queue_url }
    }
}

#[async_trait]
impl NotificationPublisher for SqsNotificationPublisher {
    async fn publish(&self, job: &NotificationJob) -> Result<(), NotificationError> {
        enqueue_notification(&self.client, &self.queue_url, job).await
    }
}
