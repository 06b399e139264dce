pub mod account_repository;
pub mod in_memory;
