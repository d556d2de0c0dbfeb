// src/link/mod.rs

mod config;
pub mod retry;
pub mod sensor_link;

// Re-export the public types
pub use config::LinkConfig;
pub use retry::RetryPolicy;
pub use sensor_link::SensorLink;
