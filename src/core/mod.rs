pub mod config;
pub mod data;
pub mod error;

pub use self::config::{AppConfig, FirebaseConfig};
pub use self::data::*;
pub use self::error::*;
