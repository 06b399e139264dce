#![allow(dead_code)]

use std::sync::Arc;
use http::Method;
use lambda_http::{Body, Request, RequestExt, Response};
use serde_json::Value;
use petal_lambda::context::AppContext;
use petal_lambda::router::handle_lambda;
use petal_shared::repositories::in_memory::InMemoryAccountRepository;
use petal_shared::services::payment_services::ChargeDefaults;
use petal_shared::utilities::test::{
    test_minter, RecordingPublisher, StaticOtpProvider, StaticPaymentGateway,
};

pub const ADMIN_KEY: &str = "admin-test-key";

pub struct TestApp {
    pub ctx: AppContext,
    pub otp: Arc<StaticOtpProvider>,
    pub accounts: Arc<InMemoryAccountRepository>,
    pub payments: Arc<StaticPaymentGateway>,
    pub publisher: Arc<RecordingPublisher>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(StaticOtpProvider::accepting(), StaticPaymentGateway::with_status("CAPTURED"))
    }

    pub fn with(otp: StaticOtpProvider, payments: StaticPaymentGateway) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let otp = Arc::new(otp);
        let accounts = Arc::new(InMemoryAccountRepository::new());
        let payments = Arc::new(payments);
        let publisher = Arc::new(RecordingPublisher::default());

        let ctx = AppContext {
            otp: otp.clone(),
            accounts: accounts.clone(),
            minter: Arc::new(test_minter()),
            payments: payments.clone(),
            charge_defaults: ChargeDefaults {
                currency: "SAR".to_string(),
                redirect_url: Some("https://petal.example/payment/done".to_string()),
                webhook_url: Some("https://api.petal.example/tap/webhook".to_string()),
            },
            notifications: publisher.clone(),
            admin_api_key: Some(ADMIN_KEY.to_string()),
            cloudwatch: None,
        };

        Self { ctx, otp, accounts, payments, publisher }
    }

    pub async fn call(&self, request: Request) -> Response<Body> {
        handle_lambda(&self.ctx, request).await.expect("handler never fails at the transport level")
    }

    pub async fn post(&self, path: &str, body: Value) -> Response<Body> {
        self.call(post_request(path, body, None)).await
    }
}

pub fn post_request(path: &str, body: Value, admin_key: Option<&str>) -> Request {
    let mut builder = http::Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Content-Type", "application/json");
    if let Some(key) = admin_key {
        builder = builder.header("x-admin-key", key);
    }

    Request::from(builder.body(Body::Text(body.to_string())).unwrap()).with_raw_http_path(path)
}

pub fn get_request(path: &str) -> Request {
    Request::from(http::Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::Empty)
        .unwrap())
        .with_raw_http_path(path)
}

pub fn body_json(response: &Response<Body>) -> Value {
    match response.body() {
        Body::Text(body) => serde_json::from_str(body).unwrap(),
        _ => panic!("Response body is not text"),
    }
}
