use lambda_http::Request;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use crate::models::errors::CallableError;

/// Extracts the JSON body from a request.
pub fn extract_body(event: &Request) -> Value {
    serde_json::from_slice(event.body().as_ref()).unwrap_or_else(|_| json!({}))
}

/// Callable clients wrap their arguments as `{"data": {...}}`; plain bodies are accepted too.
pub fn callable_payload(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or(Value::Null),
        other => other,
    }
}

/// Parses callable arguments, treating an absent payload as an empty object.
pub fn parse_callable<T: DeserializeOwned>(body: Value) -> Result<T, CallableError> {
    let payload = match callable_payload(body) {
        Value::Null => json!({}),
        other => other,
    };
    serde_json::from_value(payload)
        .map_err(|e| CallableError::invalid_argument(format!("Invalid request: {}", e)))
}

pub fn extract_header<'a>(event: &'a Request, name: &str) -> Option<&'a str> {
    event.headers()
        .get(name)
        .and_then(|header| header.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::phone::OtpCheckRequest;

    #[test]
    fn unwraps_data_envelope() {
        let payload = callable_payload(json!({"data": {"phone": "0501234567"}}));
        assert_eq!(payload, json!({"phone": "0501234567"}));
    }

    #[test]
    fn passes_plain_body_through() {
        let payload = callable_payload(json!({"phone": "0501234567"}));
        assert_eq!(payload, json!({"phone": "0501234567"}));
    }

    #[test]
    fn parses_null_data_as_empty_arguments() {
        let request: OtpCheckRequest = parse_callable(json!({"data": null})).unwrap();
        assert!(request.phone.is_none());
    }

    #[test]
    fn rejects_wrongly_typed_arguments() {
        let err = parse_callable::<OtpCheckRequest>(json!({"data": {"phone": 12}})).unwrap_err();
        assert_eq!(err.code, crate::models::errors::ErrorCode::InvalidArgument);
    }
}
