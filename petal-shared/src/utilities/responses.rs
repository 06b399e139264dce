use http::StatusCode;
use lambda_http::{Response, Body};
use serde::Serialize;
use serde_json::json;
use crate::models::errors::CallableError;

pub fn success_response<T: Serialize>(data: T) -> Result<Response<Body>, lambda_http::Error> {
    response_with_code(data, StatusCode::OK)
}

pub fn not_found_response() -> Result<Response<Body>, lambda_http::Error> {
    response_with_code(json!({"error": "Not Found"}), StatusCode::NOT_FOUND)
}

/// Wraps a callable outcome in the `{"result": ...}` / `{"error": {...}}` envelope.
pub fn callable_response<T: Serialize>(outcome: Result<T, CallableError>) -> Result<Response<Body>, lambda_http::Error> {
    match outcome {
        Ok(data) => response_with_code(json!({ "result": data }), StatusCode::OK),
        Err(err) => callable_error_response(&err),
    }
}

pub fn callable_error_response(err: &CallableError) -> Result<Response<Body>, lambda_http::Error> {
    let body = json!({
        "error": {
            "status": err.code.status(),
            "code": err.code.as_str(),
            "message": err.message,
        }
    });
    response_with_code(body, err.code.http_status())
}

pub fn response_with_code<T: Serialize>(data: T, code: StatusCode) -> Result<Response<Body>, lambda_http::Error> {
    let body = serde_json::to_string(&data).map_err(|_| lambda_http::Error::from("Serialization error"))?;
    log::info!("Response Code:{}", code);
    log::debug!("Body: {}", body);
    Response::builder()
        .status(code)
        .header("Content-Type", "application/json")
        .body(Body::Text(body))
        .map_err(|e| {
            log::error!("Failed to build response: {:?}", e);
            lambda_http::Error::from("Failed to construct HTTP response")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn body_json(response: &Response<Body>) -> Value {
        match response.body() {
            Body::Text(text) => serde_json::from_str(text).unwrap(),
            _ => panic!("Response body is not text"),
        }
    }

    #[test]
    fn success_is_wrapped_in_result() {
        let response = callable_response::<Value>(Ok(json!({"success": true}))).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(&response), json!({"result": {"success": true}}));
    }

    #[test]
    fn errors_carry_code_status_and_message() {
        let response = callable_response::<Value>(Err(CallableError::permission_denied("Invalid OTP"))).unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(&response),
            json!({"error": {"status": "PERMISSION_DENIED", "code": "permission-denied", "message": "Invalid OTP"}})
        );
    }
}
