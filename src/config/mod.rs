//! Configuration loading for the Attendance Analytics Engine.
//!
//! This module loads the engine's tunables (overtime threshold, standard
//! monthly hours, refresh interval, paging defaults) from a YAML file.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/engine.yaml").unwrap();
//! println!("Overtime after {} hours", loader.config().daily_threshold_hours);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::EngineConfig;
