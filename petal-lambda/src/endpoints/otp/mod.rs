pub mod check;
pub mod request;
