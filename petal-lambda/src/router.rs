use lambda_http::{Body, Request, Response};
use lambda_http::RequestExt;
use petal_shared::utilities::requests::extract_body;
use petal_shared::utilities::responses::not_found_response;
use crate::context::AppContext;
use crate::endpoints::{notifications, otp, payments, status};

const GET: &str = "GET";
const POST: &str = "POST";

pub async fn handle_lambda(ctx: &AppContext, event: Request) -> Result<Response<Body>, lambda_http::Error> {
    let raw_path = event.raw_http_path();
    let path = raw_path.strip_prefix("/dev")
        .or_else(|| raw_path.strip_prefix("/prod"))
        .unwrap_or(&raw_path);

    log::info!("Received {} request for path: {}", event.method(), path);
    let event_body = extract_body(&event);

    match (event.method().as_str(), path) {
        //Monitor
        (GET, "/status") => status::handler(),

        //Auth
        (POST, "/requestOtp") => otp::request::handler(ctx, event_body).await,
        (POST, "/checkOtp") => otp::check::handler(ctx, event_body).await,

        //Payments
        (POST, "/createTapCharge") => payments::create_charge::handler(ctx, event_body).await,
        (POST, "/verifyTapPayment") => payments::verify::handler(ctx, event_body).await,

        //Notifications
        (POST, "/sendNotification") => notifications::send::handler(ctx, &event, event_body).await,

        //Not found
        _ => not_found_response(),
    }
}
