use std::time::Duration;
use futures::future::join_all;
use reqwest::Client;
use crate::models::errors::NotificationError;
use crate::models::notifications::{PushMessage, PushReport, PushResponse};

/// Largest batch the push service accepts in one request.
pub const PUSH_CHUNK_SIZE: usize = 100;

pub fn is_valid_push_token(token: &str) -> bool {
    ["ExponentPushToken[", "ExpoPushToken["]
        .iter()
        .any(|prefix| token.starts_with(prefix) && token.len() > prefix.len() + 1 && token.ends_with(']'))
}

/// Separates deliverable messages from those with malformed tokens.
pub fn partition_messages(messages: Vec<PushMessage>) -> (Vec<PushMessage>, Vec<String>) {
    let mut valid = Vec::with_capacity(messages.len());
    let mut invalid = Vec::new();
    for message in messages {
        if is_valid_push_token(&message.to) {
            valid.push(message);
        } else {
            invalid.push(message.to);
        }
    }
    (valid, invalid)
}

/// Counts tickets for one chunk. Missing tickets count as failures.
pub fn summarize_chunk(chunk_len: usize, response: PushResponse) -> PushReport {
    let mut report = PushReport::default();

    for error in response.errors {
        report.errors.push(error.message.or(error.code).unwrap_or_else(|| "Unknown push error".to_string()));
    }

    for ticket in response.data.iter() {
        if ticket.status == "ok" {
            report.sent += 1;
        } else {
            report.failed += 1;
            if let Some(message) = &ticket.message {
                report.errors.push(message.clone());
            }
        }
    }

    report.failed += chunk_len.saturating_sub(response.data.len());
    report
}

pub struct ExpoPushClient {
    client: Client,
    url: String,
    access_token: Option<String>,
}

impl ExpoPushClient {
    pub fn new(url: &str, access_token: Option<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
            access_token: access_token.filter(|t| !t.is_empty()),
        })
    }

    async fn send_chunk(&self, chunk: &[PushMessage]) -> Result<PushReport, NotificationError> {
        let mut request = self.client
            .post(&self.url)
            .header("Accept", "application/json")
            .json(chunk);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let res = request.send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await?;
            log::warn!("[Push] Chunk rejected with {}: {}", status, text);
            return Err(NotificationError::PushRejected(format!("{}: {}", status, text)));
        }

        let response: PushResponse = res
            .json()
            .await
            .map_err(|e| NotificationError::InvalidResponse(e.to_string()))?;
        Ok(summarize_chunk(chunk.len(), response))
    }

    /// Sends every message, chunked and concurrently. Individual chunk failures are
    /// folded into the report; an error is returned only when nothing could be sent.
    pub async fn send(&self, messages: Vec<PushMessage>) -> Result<PushReport, NotificationError> {
        let (valid, invalid) = partition_messages(messages);
        let mut report = PushReport { invalid_tokens: invalid, ..Default::default() };

        if !report.invalid_tokens.is_empty() {
            log::warn!("[Push] Dropping {} malformed tokens", report.invalid_tokens.len());
        }
        if valid.is_empty() {
            return Ok(report);
        }

        let chunks: Vec<&[PushMessage]> = valid.chunks(PUSH_CHUNK_SIZE).collect();
        let results = join_all(chunks.iter().map(|chunk| self.send_chunk(chunk))).await;

        let mut last_error = None;
        for (chunk, result) in chunks.iter().zip(results) {
            match result {
                Ok(chunk_report) => report.merge(chunk_report),
                Err(e) => {
                    log::error!("[Push] Chunk of {} failed: {:?}", chunk.len(), e);
                    report.failed += chunk.len();
                    report.errors.push(e.to_string());
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if report.sent == 0 => Err(e),
            _ => {
                log::info!("[Push] Sent {} / failed {}", report.sent, report.failed);
                Ok(report)
            }
        }
    }
}
