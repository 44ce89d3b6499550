// src/core/mod.rs
//! Service plumbing shared by the CLI and the web front-end

pub mod config_manager;
pub mod service_client;

pub use config_manager::ConfigManager;
pub use service_client::{ResumeService, ServiceClient};
