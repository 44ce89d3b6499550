// src/controller.rs
//! Upload workflow controller.
//!
//! [`Session`] holds everything that lives for one page: the stored filename
//! identifier, the text view mode and the [`Page`] view model. Each action is
//! split into a synchronous `begin_*` step that updates the page and hands
//! out a ticket, and a `finish_*` step that applies the service's answer only
//! when the ticket is still the latest one issued for its panel.
//! [`UploadController`] drives both steps around a [`ResumeService`] call.

use tracing::{debug, error, info, warn};

use crate::core::ResumeService;
use crate::error::{ControllerError, ServiceError};
use crate::page::{AlertLevel, Page, Panel, PanelBody, WhiteSpace};
use crate::types::{ExtractedDocument, ProcessAction, ProcessRequest, ProcessResult, UploadFile};

pub const UPLOADING_MESSAGE: &str = "Extracting text from document...";
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Document processed successfully!";
pub const UPLOAD_FAILED_MESSAGE: &str = "Processing failed. Please try again.";
pub const EMPTY_FILE_MESSAGE: &str = "The selected file is empty.";
pub const FILE_TOO_LARGE_MESSAGE: &str = "The selected file is too large.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessTicket {
    action: ProcessAction,
    filename: String,
    generation: u64,
}

impl ProcessTicket {
    pub fn request(&self) -> ProcessRequest {
        ProcessRequest {
            action: self.action,
            filename: self.filename.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Generations {
    upload: u64,
    questions: u64,
    experience: u64,
}

impl Generations {
    fn for_action(&mut self, action: ProcessAction) -> &mut u64 {
        match action {
            ProcessAction::GenerateQuestions => &mut self.questions,
            ProcessAction::AnalyzeExperience => &mut self.experience,
        }
    }

    fn invalidate_all(&mut self) {
        self.upload += 1;
        self.questions += 1;
        self.experience += 1;
    }
}

fn result_panel(action: ProcessAction) -> Panel {
    match action {
        ProcessAction::GenerateQuestions => Panel::GeneratedQuestions,
        ProcessAction::AnalyzeExperience => Panel::ExperienceAnalysis,
    }
}

fn loading_text(action: ProcessAction) -> &'static str {
    match action {
        ProcessAction::GenerateQuestions => "Generating questions...",
        ProcessAction::AnalyzeExperience => "Analyzing experience...",
    }
}

fn failure_text(action: ProcessAction) -> &'static str {
    match action {
        ProcessAction::GenerateQuestions => "Failed to generate questions.",
        ProcessAction::AnalyzeExperience => "Failed to analyze experience.",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    current_filename: Option<String>,
    is_raw_view: bool,
    page: Page,
    generations: Generations,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            current_filename: None,
            is_raw_view: true,
            page: Page::new(),
            generations: Generations::default(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_filename(&self) -> Option<&str> {
        self.current_filename.as_deref()
    }

    pub fn is_raw_view(&self) -> bool {
        self.is_raw_view
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Hide every result panel and clear the text and status.
    ///
    /// Tickets issued before the reset are no longer applied.
    pub fn reset_ui(&mut self) {
        for panel in Panel::ALL {
            self.page.hide(panel);
        }
        self.page.extracted_text.clear();
        self.page.clear_status();
        self.page.questions = PanelBody::Empty;
        self.page.experience = PanelBody::Empty;
        self.generations.invalidate_all();
    }

    pub fn begin_upload(&mut self, file: &UploadFile) -> Result<UploadTicket, ControllerError> {
        self.reset_ui();

        if file.is_empty() {
            warn!("Refusing to upload empty file {}", file.file_name);
            self.page.set_status(AlertLevel::Danger, EMPTY_FILE_MESSAGE);
            return Err(ControllerError::EmptyFile);
        }

        self.page.set_status(AlertLevel::Info, UPLOADING_MESSAGE);
        Ok(UploadTicket {
            generation: self.generations.upload,
        })
    }

    /// Apply an upload answer. Returns `false` when the ticket is stale.
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<ExtractedDocument, ServiceError>,
    ) -> bool {
        if ticket.generation != self.generations.upload {
            debug!(
                "Dropping stale upload response (generation {} < {})",
                ticket.generation, self.generations.upload
            );
            return false;
        }

        match result {
            Ok(document) => {
                info!("Upload succeeded, stored identifier {}", document.filename);
                self.current_filename = Some(document.filename);
                self.page.set_status(AlertLevel::Success, UPLOAD_SUCCESS_MESSAGE);
                self.page.extracted_text = document.text;
                self.page.show(Panel::ExtractedContent);
                self.page.show(Panel::ProcessingOptions);
                self.page.show(Panel::ProcessingResults);
            }
            Err(ServiceError::Server { status, message }) => {
                warn!("Upload rejected with status {}: {}", status, message);
                self.page.set_status(AlertLevel::Danger, format!("Error: {}", message));
            }
            Err(e) => {
                error!("Upload error: {}", e);
                self.page.set_status(AlertLevel::Danger, UPLOAD_FAILED_MESSAGE);
            }
        }
        true
    }

    /// Record an upload that failed before it reached the service
    pub fn fail_upload(&mut self, cause: &str) {
        self.reset_ui();
        error!("Upload error: {}", cause);
        self.page.set_status(AlertLevel::Danger, UPLOAD_FAILED_MESSAGE);
    }

    /// Record an upload the front-end refused for exceeding its body limit
    pub fn reject_oversized_upload(&mut self) {
        self.reset_ui();
        warn!("Upload refused: body exceeds the configured limit");
        self.page.set_status(AlertLevel::Danger, FILE_TOO_LARGE_MESSAGE);
    }

    pub fn begin_process(
        &mut self,
        action: ProcessAction,
    ) -> Result<ProcessTicket, ControllerError> {
        let filename = match &self.current_filename {
            Some(filename) => filename.clone(),
            None => {
                warn!("{} requested before any document was uploaded", action);
                return Err(ControllerError::NoDocument);
            }
        };

        self.page.show(result_panel(action));
        self.set_body(action, PanelBody::Loading(loading_text(action)));

        let generation = self.generations.for_action(action);
        *generation += 1;

        Ok(ProcessTicket {
            action,
            filename,
            generation: *generation,
        })
    }

    /// Apply a processing answer. Returns `false` when the ticket is stale.
    pub fn finish_process(
        &mut self,
        ticket: ProcessTicket,
        result: Result<ProcessResult, ServiceError>,
    ) -> bool {
        let action = ticket.action;
        let latest = *self.generations.for_action(action);
        if ticket.generation != latest {
            debug!(
                "Dropping stale {} response (generation {} < {})",
                action, ticket.generation, latest
            );
            return false;
        }

        let body = match (action, result) {
            (ProcessAction::GenerateQuestions, Ok(ProcessResult::Questions(questions))) => {
                info!("Rendering {} generated questions", questions.len());
                PanelBody::Questions(questions)
            }
            (ProcessAction::AnalyzeExperience, Ok(ProcessResult::Experience(record))) => {
                PanelBody::Experience(record)
            }
            (_, Ok(other)) => {
                error!("{} answered with an unexpected result: {:?}", action, other);
                PanelBody::Failed(failure_text(action))
            }
            (_, Err(e)) => {
                error!("{} failed: {}", action, e);
                PanelBody::Failed(failure_text(action))
            }
        };
        self.set_body(action, body);
        true
    }

    pub fn toggle_text_view(&mut self) {
        self.is_raw_view = !self.is_raw_view;
        self.page.white_space = if self.is_raw_view {
            WhiteSpace::PreWrap
        } else {
            WhiteSpace::Normal
        };
    }

    fn set_body(&mut self, action: ProcessAction, body: PanelBody) {
        match action {
            ProcessAction::GenerateQuestions => self.page.questions = body,
            ProcessAction::AnalyzeExperience => self.page.experience = body,
        }
    }
}

/// Owns a [`Session`] and the service it talks to
pub struct UploadController<S> {
    service: S,
    session: Session,
}

impl<S: ResumeService> UploadController<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn page(&self) -> &Page {
        self.session.page()
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Upload a résumé. Service failures end up on the page, not in the result.
    pub async fn submit_resume(&mut self, file: UploadFile) -> Result<(), ControllerError> {
        let ticket = self.session.begin_upload(&file)?;
        let result = self.service.upload(&file).await;
        self.session.finish_upload(ticket, result);
        Ok(())
    }

    pub async fn generate_questions(&mut self) -> Result<(), ControllerError> {
        self.run_action(ProcessAction::GenerateQuestions).await
    }

    pub async fn analyze_experience(&mut self) -> Result<(), ControllerError> {
        self.run_action(ProcessAction::AnalyzeExperience).await
    }

    pub fn toggle_text_view(&mut self) {
        self.session.toggle_text_view();
    }

    pub fn reset_ui(&mut self) {
        self.session.reset_ui();
    }

    async fn run_action(&mut self, action: ProcessAction) -> Result<(), ControllerError> {
        let ticket = self.session.begin_process(action)?;
        let result = self.service.process(&ticket.request()).await;
        self.session.finish_process(ticket, result);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted service answering from queues and recording what it was sent
    #[derive(Default)]
    pub struct ScriptedService {
        uploads: Mutex<VecDeque<Result<ExtractedDocument, ServiceError>>>,
        processes: Mutex<VecDeque<Result<ProcessResult, ServiceError>>>,
        pub uploaded: Mutex<Vec<String>>,
        pub processed: Mutex<Vec<ProcessRequest>>,
    }

    impl ScriptedService {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn upload_answer(self, answer: Result<ExtractedDocument, ServiceError>) -> Self {
            self.uploads.lock().unwrap().push_back(answer);
            self
        }

        pub fn process_answer(self, answer: Result<ProcessResult, ServiceError>) -> Self {
            self.processes.lock().unwrap().push_back(answer);
            self
        }
    }

    impl ResumeService for ScriptedService {
        async fn upload(&self, file: &UploadFile) -> Result<ExtractedDocument, ServiceError> {
            self.uploaded.lock().unwrap().push(file.file_name.clone());
            self.uploads
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ServiceError::Transport("no scripted answer".into())))
        }

        async fn process(&self, request: &ProcessRequest) -> Result<ProcessResult, ServiceError> {
            self.processed.lock().unwrap().push(request.clone());
            self.processes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ServiceError::Transport("no scripted answer".into())))
        }
    }

    pub fn extracted(filename: &str, text: &str) -> ExtractedDocument {
        ExtractedDocument {
            filename: filename.to_string(),
            text: text.to_string(),
        }
    }

    pub fn resume() -> UploadFile {
        UploadFile::new("resume.pdf", b"%PDF-1.4 resume".to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use serde_json::json;

    async fn uploaded_controller(service: ScriptedService) -> UploadController<ScriptedService> {
        let service = service.upload_answer(Ok(extracted("r1", "Hello")));
        let mut controller = UploadController::new(service);
        controller.submit_resume(resume()).await.unwrap();
        controller
    }

    #[tokio::test]
    async fn test_successful_upload_reveals_text_and_options() {
        let controller = uploaded_controller(ScriptedService::new()).await;
        let page = controller.page();

        assert_eq!(controller.session().current_filename(), Some("r1"));
        assert_eq!(page.extracted_text, "Hello");
        assert!(page.is_visible(Panel::ExtractedContent));
        assert!(page.is_visible(Panel::ProcessingOptions));
        assert!(page.is_visible(Panel::ProcessingResults));

        let status = page.status.as_ref().unwrap();
        assert_eq!(status.level, AlertLevel::Success);
        assert_eq!(status.text, UPLOAD_SUCCESS_MESSAGE);
        assert_eq!(*controller.service().uploaded.lock().unwrap(), vec!["resume.pdf"]);
    }

    #[tokio::test]
    async fn test_rejected_upload_shows_server_error() {
        let service = ScriptedService::new().upload_answer(Err(ServiceError::Server {
            status: 400,
            message: "bad format".to_string(),
        }));
        let mut controller = UploadController::new(service);
        controller.submit_resume(resume()).await.unwrap();

        let page = controller.page();
        assert!(!page.is_visible(Panel::ExtractedContent));
        assert!(!page.is_visible(Panel::ProcessingOptions));
        let status = page.status.as_ref().unwrap();
        assert_eq!(status.level, AlertLevel::Danger);
        assert!(status.text.contains("bad format"));
        assert_eq!(controller.session().current_filename(), None);
    }

    #[tokio::test]
    async fn test_transport_failure_shows_generic_message() {
        let service = ScriptedService::new()
            .upload_answer(Err(ServiceError::Malformed("not json".to_string())));
        let mut controller = UploadController::new(service);
        controller.submit_resume(resume()).await.unwrap();

        let status = controller.page().status.as_ref().unwrap();
        assert_eq!(status.text, UPLOAD_FAILED_MESSAGE);
        assert!(!status.text.contains("not json"));
    }

    #[tokio::test]
    async fn test_empty_file_is_refused_without_request() {
        let mut controller = UploadController::new(ScriptedService::new());
        let result = controller
            .submit_resume(UploadFile::new("empty.pdf", Vec::new()))
            .await;

        assert_eq!(result, Err(ControllerError::EmptyFile));
        assert!(controller.service().uploaded.lock().unwrap().is_empty());
        assert_eq!(
            controller.page().status.as_ref().unwrap().text,
            EMPTY_FILE_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_reset_hides_everything_and_is_idempotent() {
        let mut controller = uploaded_controller(ScriptedService::new()).await;
        controller.reset_ui();
        let once = controller.page().clone();

        assert_eq!(once.visible_panels().count(), 0);
        assert!(once.extracted_text.is_empty());
        assert!(once.status.is_none());

        controller.reset_ui();
        assert_eq!(*controller.page(), once);
    }

    #[tokio::test]
    async fn test_generate_questions_keeps_server_order() {
        let service = ScriptedService::new().process_answer(Ok(ProcessResult::Questions(vec![
            "Q1".to_string(),
            "Q2".to_string(),
        ])));
        let mut controller = uploaded_controller(service).await;
        controller.generate_questions().await.unwrap();

        assert!(controller.page().is_visible(Panel::GeneratedQuestions));
        assert_eq!(
            controller.page().questions,
            PanelBody::Questions(vec!["Q1".to_string(), "Q2".to_string()])
        );
        assert_eq!(
            controller.service().processed.lock().unwrap()[0],
            ProcessRequest {
                action: ProcessAction::GenerateQuestions,
                filename: "r1".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_analyze_experience_renders_record() {
        let service = ScriptedService::new()
            .process_answer(Ok(ProcessResult::Experience(json!({"years": 5}))));
        let mut controller = uploaded_controller(service).await;
        controller.analyze_experience().await.unwrap();

        assert!(controller.page().is_visible(Panel::ExperienceAnalysis));
        assert_eq!(
            controller.page().experience,
            PanelBody::Experience(json!({"years": 5}))
        );
    }

    #[tokio::test]
    async fn test_failed_action_replaces_panel_with_error() {
        let service = ScriptedService::new().process_answer(Err(ServiceError::Server {
            status: 500,
            message: "model crashed".to_string(),
        }));
        let mut controller = uploaded_controller(service).await;
        controller.analyze_experience().await.unwrap();

        assert_eq!(
            controller.page().experience,
            PanelBody::Failed("Failed to analyze experience.")
        );
    }

    #[tokio::test]
    async fn test_action_before_upload_sends_nothing() {
        let mut controller = UploadController::new(ScriptedService::new());
        let result = controller.generate_questions().await;

        assert_eq!(result, Err(ControllerError::NoDocument));
        assert!(controller.service().processed.lock().unwrap().is_empty());
        assert!(!controller.page().is_visible(Panel::GeneratedQuestions));
    }

    #[test]
    fn test_local_upload_failure_shows_generic_message() {
        let mut session = Session::new();
        session.fail_upload("disk full");

        let status = session.page().status.as_ref().unwrap();
        assert_eq!(status.level, AlertLevel::Danger);
        assert_eq!(status.text, UPLOAD_FAILED_MESSAGE);
        assert_eq!(session.page().visible_panels().count(), 0);
    }

    #[test]
    fn test_toggle_text_view_twice_restores_mode() {
        let mut session = Session::new();
        assert_eq!(session.page().white_space, WhiteSpace::PreWrap);

        session.toggle_text_view();
        assert!(!session.is_raw_view());
        assert_eq!(session.page().white_space, WhiteSpace::Normal);

        session.toggle_text_view();
        assert!(session.is_raw_view());
        assert_eq!(session.page().white_space, WhiteSpace::PreWrap);
    }

    #[test]
    fn test_stale_process_response_is_dropped() {
        let mut session = Session::new();
        let upload = session.begin_upload(&resume()).unwrap();
        session.finish_upload(upload, Ok(extracted("r1", "Hello")));

        let first = session.begin_process(ProcessAction::GenerateQuestions).unwrap();
        let second = session.begin_process(ProcessAction::GenerateQuestions).unwrap();

        assert!(session.finish_process(second, Ok(ProcessResult::Questions(vec!["new".into()]))));
        assert!(!session.finish_process(first, Ok(ProcessResult::Questions(vec!["old".into()]))));
        assert_eq!(
            session.page().questions,
            PanelBody::Questions(vec!["new".to_string()])
        );
    }

    #[test]
    fn test_panels_track_generations_independently() {
        let mut session = Session::new();
        let upload = session.begin_upload(&resume()).unwrap();
        session.finish_upload(upload, Ok(extracted("r1", "Hello")));

        let questions = session.begin_process(ProcessAction::GenerateQuestions).unwrap();
        let experience = session.begin_process(ProcessAction::AnalyzeExperience).unwrap();

        assert!(session.finish_process(experience, Ok(ProcessResult::Experience(json!({})))));
        assert!(session.finish_process(questions, Ok(ProcessResult::Questions(vec![]))));
    }

    #[test]
    fn test_new_upload_invalidates_in_flight_requests() {
        let mut session = Session::new();
        let upload = session.begin_upload(&resume()).unwrap();
        session.finish_upload(upload, Ok(extracted("r1", "Hello")));
        let pending = session.begin_process(ProcessAction::AnalyzeExperience).unwrap();

        let second_upload = session.begin_upload(&resume()).unwrap();
        let stale = Ok(ProcessResult::Experience(json!({"years": 1})));
        assert!(!session.finish_process(pending, stale));
        assert_eq!(session.page().experience, PanelBody::Empty);
        assert!(!session.page().is_visible(Panel::ExperienceAnalysis));

        assert!(session.finish_upload(second_upload, Ok(extracted("r2", "Again"))));
        assert_eq!(session.current_filename(), Some("r2"));
    }

    #[test]
    fn test_stale_upload_response_is_dropped() {
        let mut session = Session::new();
        let first = session.begin_upload(&resume()).unwrap();
        let second = session.begin_upload(&resume()).unwrap();

        assert!(session.finish_upload(second, Ok(extracted("r2", "Second"))));
        assert!(!session.finish_upload(first, Ok(extracted("r1", "First"))));
        assert_eq!(session.current_filename(), Some("r2"));
        assert_eq!(session.page().extracted_text, "Second");
    }
}
