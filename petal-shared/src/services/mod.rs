pub mod account_services;
pub mod cloudwatch_services;
pub mod notification_services;
pub mod otp_services;
pub mod payment_services;
pub mod queue_services;
pub mod secrets_services;
pub mod token_services;
