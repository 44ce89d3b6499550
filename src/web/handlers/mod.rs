// src/web/handlers/mod.rs
pub mod system_handlers;
pub mod upload_handlers;

pub use system_handlers::*;
pub use upload_handlers::*;
