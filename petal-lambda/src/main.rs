use std::sync::Arc;
use lambda_http::{service_fn, Error, Request};
use petal_lambda::context::AppContext;
use petal_lambda::router::handle_lambda;
use petal_shared::utilities::config;

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    std::panic::set_hook(Box::new(|info| {
        log::error!("Application panicked: {}", info);
    }));

    config::init();
    let context = Arc::new(AppContext::from_env().await.map_err(|e| {
        log::error!("Failed to initialise application context: {:?}", e);
        e
    })?);

    lambda_http::run(service_fn(move |event: Request| {
        let context = context.clone();
        async move { handle_lambda(&context, event).await }
    }))
    .await?;
    Ok(())
}
