// src/types/mod.rs
//! Wire types exchanged with the extraction service

pub mod request;
pub mod response;

pub use request::{ProcessAction, ProcessRequest, UploadFile};
pub use response::{ExtractedDocument, ProcessResult};
