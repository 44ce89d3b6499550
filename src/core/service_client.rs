// src/core/service_client.rs
//! HTTP client for the extraction service (`/upload` and `/process`)

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::ServiceError;
use crate::types::response::error_from_body;
use crate::types::{ExtractedDocument, ProcessAction, ProcessRequest, ProcessResult, UploadFile};

const UPLOAD_ENDPOINT: &str = "/upload";
const PROCESS_ENDPOINT: &str = "/process";

/// Multipart field the upload endpoint reads the document from
pub const UPLOAD_FIELD: &str = "file";

/// The two calls the controller makes against the extraction service
pub trait ResumeService {
    fn upload(
        &self,
        file: &UploadFile,
    ) -> impl Future<Output = Result<ExtractedDocument, ServiceError>> + Send;

    fn process(
        &self,
        request: &ProcessRequest,
    ) -> impl Future<Output = Result<ProcessResult, ServiceError>> + Send;
}

#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    /// No timeout is applied unless one is given
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Read the body, then split on status: 2xx bodies go to `parse`,
    /// everything else must carry an `error` field.
    async fn read_response<T>(
        response: reqwest::Response,
        parse: impl FnOnce(&str) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let status = response.status();
        let body = response.text().await?;
        debug!("Response status: {}", status);

        if status.is_success() {
            parse(&body)
        } else {
            Err(error_from_body(status.as_u16(), &body))
        }
    }
}

impl ResumeService for ServiceClient {
    async fn upload(&self, file: &UploadFile) -> Result<ExtractedDocument, ServiceError> {
        let url = self.url(UPLOAD_ENDPOINT);

        let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| ServiceError::Transport(format!("Invalid content type: {}", e)))?;
        }
        let form = Form::new().part(UPLOAD_FIELD, part);

        info!(
            "Uploading {} ({} bytes) to {}",
            file.file_name,
            file.len(),
            url
        );

        let response = self.client.post(&url).multipart(form).send().await?;
        Self::read_response(response, ExtractedDocument::from_body).await
    }

    async fn process(&self, request: &ProcessRequest) -> Result<ProcessResult, ServiceError> {
        let url = self.url(PROCESS_ENDPOINT);
        let action: ProcessAction = request.action;

        info!("Requesting {} for {} from {}", action, request.filename, url);

        let response = self.client.post(&url).json(request).send().await?;
        Self::read_response(response, |body| ProcessResult::from_body(action, body)).await
    }
}
