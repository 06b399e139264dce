pub mod config;
pub mod fields;
pub mod id_generator;
pub mod logging;
pub mod phone_numbers;
pub mod requests;
pub mod responses;
