pub mod config;
pub mod env_guard;

pub use config::Config;
