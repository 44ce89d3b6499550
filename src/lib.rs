//! Résumé upload workflow: upload a document to an extraction service, show
//! the extracted text, and request interview questions or an experience
//! analysis for it.
//!
//! The workflow state lives in [`controller::Session`]; [`render`] turns it
//! into HTML or terminal text, [`web`] serves it to browsers and
//! [`core::ServiceClient`] talks to the extraction service.

pub mod cli;
pub mod controller;
pub mod core;
pub mod error;
pub mod logging;
pub mod page;
pub mod render;
pub mod types;
pub mod web;

pub use controller::{Session, UploadController};
pub use crate::core::{ConfigManager, ResumeService, ServiceClient};
pub use error::{ControllerError, ServiceError};
pub use page::{Page, Panel, PanelBody};
pub use types::{ExtractedDocument, ProcessAction, ProcessRequest, ProcessResult, UploadFile};
