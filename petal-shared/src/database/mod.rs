pub mod account_items;
pub mod client;
