use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A push notification addressed to many device tokens, as carried on the notification queue.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NotificationJob {
    pub tokens: Vec<String>,
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl NotificationJob {
    pub fn messages(&self) -> Vec<PushMessage> {
        self.tokens
            .iter()
            .map(|token| PushMessage {
                to: token.clone(),
                title: self.title.clone(),
                body: self.body.clone(),
                data: self.data.clone(),
                sound: Some("default".to_string()),
            })
            .collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PushMessage {
    pub to: String,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct PushResponse {
    #[serde(default)]
    pub data: Vec<PushTicket>,
    #[serde(default)]
    pub errors: Vec<PushApiError>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PushTicket {
    pub status: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PushApiError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Default, Serialize, Clone, PartialEq)]
pub struct PushReport {
    pub sent: usize,
    pub failed: usize,
    pub invalid_tokens: Vec<String>,
    pub errors: Vec<String>,
}

impl PushReport {
    pub fn merge(&mut self, other: PushReport) {
        self.sent += other.sent;
        self.failed += other.failed;
        self.invalid_tokens.extend(other.invalid_tokens);
        self.errors.extend(other.errors);
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NotificationQueued {
    pub queued: bool,
    pub recipients: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn job_expands_to_one_message_per_token() {
        let job = NotificationJob {
            tokens: vec!["ExponentPushToken[a]".to_string(), "ExponentPushToken[b]".to_string()],
            title: "Order shipped".to_string(),
            body: "Your bouquet is on its way".to_string(),
            data: Some(json!({"order_id": 12})),
        };

        let messages = job.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].to, "ExponentPushToken[b]");
        assert_eq!(messages[0].data, Some(json!({"order_id": 12})));
    }

    #[test]
    fn report_merge_accumulates() {
        let mut report = PushReport { sent: 1, ..Default::default() };
        report.merge(PushReport { sent: 2, failed: 1, invalid_tokens: vec!["x".into()], errors: vec![] });
        assert_eq!(report.sent, 3);
        assert_eq!(report.failed, 1);
        assert_eq!(report.invalid_tokens, vec!["x".to_string()]);
    }
}
