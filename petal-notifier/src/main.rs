use std::sync::Arc;
use anyhow::Context;
use lambda_runtime::{service_fn, tracing, Error, LambdaEvent};
use serde_json::Value;
use petal_shared::services::cloudwatch_services::create_cloudwatch_client;
use petal_shared::services::notification_services::ExpoPushClient;
use petal_shared::services::secrets_services::ProviderSecrets;
use petal_shared::utilities::config;

mod notify_handler;

/// Installs the fmt subscriber. It also captures `log` records from petal-shared.
fn init_tracing() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .try_init()
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    config::init();
    init_tracing()?;

    let secrets = ProviderSecrets::load().await.context("loading provider secrets")?;
    let push_client = Arc::new(
        ExpoPushClient::new(&config::get_expo_push_url(), secrets.expo_access_token, config::get_provider_timeout()?)
            .context("building push client")?,
    );
    let cloud_watch_client = Arc::new(create_cloudwatch_client().await);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let push_client = push_client.clone();
        let cloud_watch_client = cloud_watch_client.clone();
        async move {
            notify_handler::function_handler(event, push_client.as_ref(), Some(cloud_watch_client.as_ref())).await
        }
    }))
    .await?;

    Ok(())
}
