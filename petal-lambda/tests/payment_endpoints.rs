mod common;

#[cfg(test)]
mod tests {
    use serde_json::json;
    use petal_shared::models::errors::PaymentError;
    use petal_shared::utilities::test::{StaticOtpProvider, StaticPaymentGateway};
    use super::common::{body_json, TestApp};

    fn charge_request() -> serde_json::Value {
        json!({"data": {
            "amount": 150.5,
            "currency": "sar",
            "orderId": "ORD-77",
            "customer": {"first_name": "Noura", "phone": "0501234567"}
        }})
    }

    #[tokio::test]
    async fn create_charge_returns_payment_url() {
        let app = TestApp::new();
        let response = app.post("/dev/createTapCharge", charge_request()).await;

        assert_eq!(response.status(), 200);
        let body = body_json(&response);
        assert_eq!(body["result"]["charge_id"], json!("chg_TS0000000001"));
        assert_eq!(body["result"]["payment_url"], json!("https://checkout.tap.example/chg_TS0000000001"));

        let orders = app.payments.orders.lock().unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].currency, "SAR");
        assert_eq!(orders[0].redirect_url, "https://petal.example/payment/done");
        assert_eq!(orders[0].order_id.as_deref(), Some("ORD-77"));
    }

    #[tokio::test]
    async fn create_charge_rejects_zero_amount() {
        let app = TestApp::new();
        let response = app.post("/createTapCharge", json!({"data": {"amount": 0, "customer": {"first_name": "Noura"}}})).await;

        assert_eq!(response.status(), 400);
        assert_eq!(body_json(&response)["error"]["code"], json!("invalid-argument"));
        assert!(app.payments.orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn provider_rejection_is_internal_with_its_message() {
        let app = TestApp::with(
            StaticOtpProvider::accepting(),
            StaticPaymentGateway::failing(PaymentError::ProviderRejected("Invalid source".to_string())),
        );
        let response = app.post("/createTapCharge", charge_request()).await;

        assert_eq!(response.status(), 500);
        assert_eq!(
            body_json(&response),
            json!({"error": {"status": "INTERNAL", "code": "internal", "message": "Invalid source"}})
        );
    }

    #[tokio::test]
    async fn verify_reports_captured_charge_as_paid() {
        let app = TestApp::new();
        let response = app.post("/verifyTapPayment", json!({"data": {"chargeId": "chg_TS0000000001"}})).await;

        assert_eq!(response.status(), 200);
        let result = &body_json(&response)["result"];
        assert_eq!(result["paid"], json!(true));
        assert_eq!(result["status"], json!("CAPTURED"));
        assert_eq!(result["amount"], json!(150.0));
    }

    #[tokio::test]
    async fn verify_reports_pending_charge_as_unpaid() {
        let app = TestApp::with(StaticOtpProvider::accepting(), StaticPaymentGateway::with_status("INITIATED"));
        let response = app.post("/verifyTapPayment", json!({"data": {"chargeId": "chg_TS0000000001"}})).await;

        assert_eq!(body_json(&response)["result"]["paid"], json!(false));
    }

    #[tokio::test]
    async fn verify_without_charge_id_is_invalid_argument() {
        let app = TestApp::new();
        let response = app.post("/verifyTapPayment", json!({"data": {}})).await;

        assert_eq!(response.status(), 400);
        assert_eq!(body_json(&response)["error"]["message"], json!("chargeId is required"));
    }
}
