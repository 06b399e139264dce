mod common;

#[cfg(test)]
mod tests {
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
    use serde_json::{json, Value};
    use petal_shared::models::auth::{CustomTokenClaims, IDENTITY_TOOLKIT_AUDIENCE};
    use petal_shared::utilities::test::{
        sample_merchant, StaticOtpProvider, StaticPaymentGateway, TEST_SERVICE_ACCOUNT_PUBLIC_KEY,
    };
    use super::common::{body_json, TestApp};

    fn decode_token(token: &str) -> CustomTokenClaims {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[IDENTITY_TOOLKIT_AUDIENCE]);
        let key = DecodingKey::from_rsa_pem(TEST_SERVICE_ACCOUNT_PUBLIC_KEY.as_bytes()).unwrap();
        decode::<CustomTokenClaims>(token, &key, &validation).unwrap().claims
    }

    #[tokio::test]
    async fn request_otp_sends_to_normalized_phone() {
        let app = TestApp::new();
        let response = app.post("/dev/requestOtp", json!({"data": {"phone": "0501234567"}})).await;

        assert_eq!(response.status(), 200);
        assert_eq!(body_json(&response), json!({"result": {"success": true, "phone": "966501234567"}}));
        assert_eq!(*app.otp.sent.lock().unwrap(), vec!["966501234567".to_string()]);
    }

    #[tokio::test]
    async fn request_otp_without_phone_is_invalid_argument() {
        let app = TestApp::new();
        let response = app.post("/dev/requestOtp", json!({"data": {}})).await;

        assert_eq!(response.status(), 400);
        assert_eq!(body_json(&response)["error"]["code"], json!("invalid-argument"));
        assert!(app.otp.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn check_otp_creates_customer_and_signs_token() {
        let app = TestApp::new();
        let response = app.post("/dev/checkOtp", json!({"data": {"phone": "+966 50 123 4567", "otp": "4321"}})).await;

        assert_eq!(response.status(), 200);
        let body = body_json(&response);
        let result = &body["result"];
        assert_eq!(result["role"], json!("customer"));
        assert_eq!(result["user"]["mobile"], json!("966501234567"));

        let user_id = result["user"]["id"].as_u64().unwrap();
        let claims = decode_token(result["token"].as_str().unwrap());
        assert_eq!(claims.uid, format!("customer_{}", user_id));
        assert_eq!(claims.claims.user_id, user_id);
        assert_eq!(claims.claims.phone, "966501234567");

        assert_eq!(
            *app.otp.verified.lock().unwrap(),
            vec![("966501234567".to_string(), "4321".to_string())]
        );
        assert_eq!(app.accounts.user_count().await, 1);
    }

    #[tokio::test]
    async fn check_otp_prefers_merchant() {
        let app = TestApp::new();
        app.accounts.insert_merchant(sample_merchant("966501234567")).await;

        let response = app.post("/checkOtp", json!({"data": {"phone": "0501234567", "otp": "1111"}})).await;

        let body = body_json(&response);
        assert_eq!(body["result"]["role"], json!("merchant"));
        assert_eq!(body["result"]["user"]["store_name"], json!("Dana Flowers"));
        assert_eq!(app.accounts.customer_count().await, 0);
    }

    #[tokio::test]
    async fn check_otp_twice_returns_same_user() {
        let app = TestApp::new();
        let first = body_json(&app.post("/checkOtp", json!({"data": {"phone": "0501234567", "otp": "1"}})).await);
        let second = body_json(&app.post("/checkOtp", json!({"data": {"phone": "501234567", "otp": "2"}})).await);

        assert_eq!(first["result"]["user"]["id"], second["result"]["user"]["id"]);
        assert_eq!(app.accounts.customer_count().await, 1);
    }

    #[tokio::test]
    async fn check_otp_rejection_is_permission_denied() {
        let app = TestApp::with(StaticOtpProvider::rejecting("Invalid OTP"), StaticPaymentGateway::with_status("CAPTURED"));
        let response = app.post("/checkOtp", json!({"data": {"phone": "0501234567", "otp": "0000"}})).await;

        assert_eq!(response.status(), 403);
        assert_eq!(
            body_json(&response),
            json!({"error": {"status": "PERMISSION_DENIED", "code": "permission-denied", "message": "Invalid OTP"}})
        );
        assert_eq!(app.accounts.customer_count().await, 0);
    }

    #[tokio::test]
    async fn check_otp_missing_code_is_invalid_argument() {
        let app = TestApp::new();
        let response = app.post("/checkOtp", json!({"data": {"phone": "0501234567"}})).await;

        assert_eq!(response.status(), 400);
        let error: &Value = &body_json(&response)["error"];
        assert_eq!(error["status"], json!("INVALID_ARGUMENT"));
        assert!(app.otp.verified.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn check_otp_accepts_unwrapped_body() {
        let app = TestApp::new();
        let response = app.post("/checkOtp", json!({"phone": "0551112222", "otp": "9", "name": "Huda"})).await;

        assert_eq!(response.status(), 200);
        assert_eq!(body_json(&response)["result"]["user"]["name"], json!("Huda"));
    }
}
