pub mod account;
pub mod payment;
pub mod ports;
pub mod profile;
