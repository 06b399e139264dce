pub mod context;
pub mod endpoints;
pub mod router;
