pub mod create_charge;
pub mod verify;
