pub mod application;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod infrastructure;
