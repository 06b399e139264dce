use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use crate::utilities::config::get_dynamodb_endpoint;

pub async fn load_aws_config() -> SdkConfig {
    aws_config::load_defaults(BehaviorVersion::latest()).await
}

/// Honors `DYNAMODB_ENDPOINT_URL` so the functions can run against a local DynamoDB.
pub async fn get_dynamodb_client(config: &SdkConfig) -> DynamoDbClient {
    match get_dynamodb_endpoint() {
        Some(endpoint) => {
            log::info!("Using DynamoDB endpoint {}", endpoint);
            let dynamo_config = aws_sdk_dynamodb::config::Builder::from(config)
                .endpoint_url(endpoint)
                .build();
            DynamoDbClient::from_conf(dynamo_config)
        }
        None => DynamoDbClient::new(config),
    }
}
