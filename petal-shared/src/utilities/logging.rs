use serde_json::json;
use log::{info, error, warn};

/// Logs an informational event in JSON format.
pub fn log_info(event: &str, message: &str) {
    info!("{}", json!({
        "event": event,
        "message": message
    }));
}

pub fn log_warn(event: &str, message: &str) {
    warn!("{}", json!({
        "event": event,
        "message": message
    }));
}

/// Logs an error event in JSON format.
pub fn log_error(event: &str, error_message: &str) {
    error!("{}", json!({
        "event": event,
        "error": error_message
    }));
}

/// Logs an error together with its full source chain.
pub fn log_error_chain(event: &str, err: &(dyn std::error::Error + 'static)) {
    let mut chain = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }

    error!("{}", json!({
        "event": event,
        "error": chain.first().cloned().unwrap_or_default(),
        "chain": chain,
        "debug": format!("{:?}", err)
    }));
}
