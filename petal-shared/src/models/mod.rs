pub mod account;
pub mod auth;
pub mod errors;
pub mod notifications;
pub mod payments;
pub mod phone;
