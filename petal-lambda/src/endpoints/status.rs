use lambda_http::{Body, Response};
use serde::Serialize;
use petal_shared::utilities::responses::success_response;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

pub fn handler() -> Result<Response<Body>, lambda_http::Error> {
    success_response(StatusResponse { status: "OK" })
}
