pub mod address;
pub mod config;
pub mod error;

pub use address::Address;
pub use config::{Config, ReschedulePolicy};
pub use error::*;
