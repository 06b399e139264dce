mod common;

#[cfg(test)]
mod tests {
    use serde_json::json;
    use super::common::{body_json, post_request, TestApp, ADMIN_KEY};

    fn job() -> serde_json::Value {
        json!({"data": {
            "tokens": ["ExpoPushToken[aaa]", "ExpoPushToken[bbb]"],
            "title": "Your bouquet is on its way",
            "body": "Order ORD-77 left the shop"
        }})
    }

    #[tokio::test]
    async fn send_without_admin_key_is_unauthenticated() {
        let app = TestApp::new();
        let response = app.call(post_request("/dev/sendNotification", job(), None)).await;

        assert_eq!(response.status(), 401);
        assert_eq!(body_json(&response)["error"]["code"], json!("unauthenticated"));
        assert!(app.publisher.jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn send_with_wrong_admin_key_is_unauthenticated() {
        let app = TestApp::new();
        let response = app.call(post_request("/sendNotification", job(), Some("guess"))).await;
        assert_eq!(response.status(), 401);
    }

    #[tokio::test]
    async fn send_with_admin_key_queues_job() {
        let app = TestApp::new();
        let response = app.call(post_request("/sendNotification", job(), Some(ADMIN_KEY))).await;

        assert_eq!(response.status(), 200);
        assert_eq!(body_json(&response), json!({"result": {"queued": true, "recipients": 2}}));

        let jobs = app.publisher.jobs.lock().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Your bouquet is on its way");
    }

    #[tokio::test]
    async fn send_without_tokens_is_invalid_argument() {
        let app = TestApp::new();
        let body = json!({"data": {"tokens": [], "title": "Hi", "body": ""}});
        let response = app.call(post_request("/sendNotification", body, Some(ADMIN_KEY))).await;

        assert_eq!(response.status(), 400);
        assert!(app.publisher.jobs.lock().unwrap().is_empty());
    }
}
