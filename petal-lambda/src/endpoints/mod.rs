pub mod notifications;
pub mod otp;
pub mod payments;
pub mod status;
