// src/web/handlers/upload_handlers.rs
//! Upload and processing actions run against a shared session store.
//!
//! The store is locked for the `begin_*` and `finish_*` steps only, so
//! overlapping requests from the same browser proceed independently and the
//! session's tickets decide which answer lands on the page.

use rocket::fs::TempFile;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::core::ResumeService;
use crate::types::{ProcessAction, UploadFile};
use crate::web::session_store::SessionStore;

pub async fn upload_handler<S: ResumeService>(
    store: &SessionStore,
    service: &S,
    id: Uuid,
    file: UploadFile,
) {
    info!(
        "Session {} uploading {} ({} bytes)",
        id,
        file.file_name,
        file.len()
    );

    let ticket = match store.update(id, |session| session.begin_upload(&file)).await {
        Ok(ticket) => ticket,
        Err(e) => {
            warn!("Session {} upload refused: {}", id, e);
            return;
        }
    };

    let result = service.upload(&file).await;
    store
        .update(id, |session| session.finish_upload(ticket, result))
        .await;
}

pub async fn process_handler<S: ResumeService>(
    store: &SessionStore,
    service: &S,
    id: Uuid,
    action: ProcessAction,
) {
    let ticket = match store.update(id, |session| session.begin_process(action)).await {
        Ok(ticket) => ticket,
        Err(e) => {
            warn!("Session {} cannot run {}: {}", id, action, e);
            return;
        }
    };

    let result = service.process(&ticket.request()).await;
    store
        .update(id, |session| session.finish_process(ticket, result))
        .await;
}

/// Pull the submitted file out of the form into memory
pub async fn read_upload(file: &mut TempFile<'_>) -> anyhow::Result<UploadFile> {
    use anyhow::Context;

    let file_name = file
        .raw_name()
        .map(|n| n.dangerous_unsafe_unsanitized_raw().as_str().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "resume".to_string());
    let content_type = file.content_type().map(|ct| ct.to_string());

    let temp_path = std::env::temp_dir().join(format!("resume_upload_{}", Uuid::new_v4()));
    file.persist_to(&temp_path)
        .await
        .context("Failed to save uploaded file")?;

    let bytes = tokio::fs::read(&temp_path).await;
    if let Err(e) = tokio::fs::remove_file(&temp_path).await {
        error!("Failed to remove {}: {}", temp_path.display(), e);
    }
    let bytes = bytes.context("Failed to read uploaded file")?;

    let upload = UploadFile::new(file_name, bytes);
    Ok(match content_type {
        Some(content_type) => upload.with_content_type(content_type),
        None => upload,
    })
}
