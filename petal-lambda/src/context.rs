use std::sync::Arc;
use aws_sdk_cloudwatch::Client as CloudWatchClient;
use petal_shared::database::client::{get_dynamodb_client, load_aws_config};
use petal_shared::models::errors::ConfigError;
use petal_shared::repositories::account_repository::{AccountRepository, DynamoAccountRepository};
use petal_shared::services::cloudwatch_services::create_cloudwatch_client;
use petal_shared::services::otp_services::{HttpOtpProvider, OtpProvider};
use petal_shared::services::payment_services::{ChargeDefaults, PaymentGateway, TapClient};
use petal_shared::services::queue_services::{get_sqs_client, NotificationPublisher, SqsNotificationPublisher};
use petal_shared::services::secrets_services::ProviderSecrets;
use petal_shared::services::token_services::TokenMinter;
use petal_shared::utilities::config;

/// Clients shared by every invocation of a warm function.
pub struct AppContext {
    pub otp: Arc<dyn OtpProvider>,
    pub accounts: Arc<dyn AccountRepository>,
    pub minter: Arc<TokenMinter>,
    pub payments: Arc<dyn PaymentGateway>,
    pub charge_defaults: ChargeDefaults,
    pub notifications: Arc<dyn NotificationPublisher>,
    pub admin_api_key: Option<String>,
    pub cloudwatch: Option<CloudWatchClient>,
}

impl AppContext {
    pub async fn from_env() -> Result<Self, ConfigError> {
        let timeout = config::get_provider_timeout()?;
        let secrets = ProviderSecrets::load().await?;
        let aws_config = load_aws_config().await;

        let otp = HttpOtpProvider::new(
            &config::get_otp_base_url(),
            &secrets.otp_api_key,
            &config::get_otp_method(),
            &config::get_otp_template_id()?,
            timeout,
        )?;

        let accounts = DynamoAccountRepository::new(
            get_dynamodb_client(&aws_config).await,
            config::get_accounts_table()?,
        );

        let payments = TapClient::new(&config::get_tap_base_url(), &secrets.tap_secret_key, timeout)?;
        let charge_defaults = ChargeDefaults {
            currency: config::get_default_currency(),
            redirect_url: config::get_tap_redirect_url().ok(),
            webhook_url: config::get_tap_webhook_url().ok(),
        };

        let notifications = SqsNotificationPublisher::new(get_sqs_client().await, config::get_notification_queue()?);

        if secrets.admin_api_key.is_none() {
            log::warn!("No admin API key configured, /sendNotification will reject every call");
        }

        Ok(Self {
            otp: Arc::new(otp),
            accounts: Arc::new(accounts),
            minter: Arc::new(TokenMinter::from_service_account(&secrets.service_account)?),
            payments: Arc::new(payments),
            charge_defaults,
            notifications: Arc::new(notifications),
            admin_api_key: secrets.admin_api_key,
            cloudwatch: Some(create_cloudwatch_client().await),
        })
    }

    pub fn metrics(&self) -> Option<&CloudWatchClient> {
        self.cloudwatch.as_ref()
    }
}
