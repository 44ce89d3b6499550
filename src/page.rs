// src/page.rs
//! View model of the upload page: panels, their bodies and the status line

use std::collections::BTreeSet;

pub const UPLOAD_FORM_ID: &str = "uploadForm";
pub const FILE_INPUT_ID: &str = "resumeFile";
pub const UPLOAD_STATUS_ID: &str = "uploadStatus";
pub const EXTRACTED_TEXT_ID: &str = "extractedText";

/// A region of the page that is either hidden or visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Panel {
    ExtractedContent,
    ProcessingOptions,
    ProcessingResults,
    GeneratedQuestions,
    ExperienceAnalysis,
    SkillGaps,
}

impl Panel {
    pub const ALL: [Panel; 6] = [
        Panel::ExtractedContent,
        Panel::ProcessingOptions,
        Panel::ProcessingResults,
        Panel::GeneratedQuestions,
        Panel::ExperienceAnalysis,
        Panel::SkillGaps,
    ];

    /// Element id of the panel in the rendered page
    pub fn element_id(&self) -> &'static str {
        match self {
            Panel::ExtractedContent => "extractedContent",
            Panel::ProcessingOptions => "processingOptions",
            Panel::ProcessingResults => "processingResults",
            Panel::GeneratedQuestions => "generatedQuestions",
            Panel::ExperienceAnalysis => "experienceAnalysis",
            Panel::SkillGaps => "skillGaps",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Success,
    Danger,
}

impl AlertLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            AlertLevel::Info => "alert alert-info",
            AlertLevel::Success => "alert alert-success",
            AlertLevel::Danger => "alert alert-danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: AlertLevel,
    pub text: String,
}

/// Content of a result panel's `card-body`
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PanelBody {
    #[default]
    Empty,
    Loading(&'static str),
    Questions(Vec<String>),
    Experience(serde_json::Value),
    Failed(&'static str),
}

/// Whitespace rendering of the extracted text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhiteSpace {
    PreWrap,
    Normal,
}

impl WhiteSpace {
    pub fn css_value(&self) -> &'static str {
        match self {
            WhiteSpace::PreWrap => "pre-wrap",
            WhiteSpace::Normal => "normal",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    visible: BTreeSet<Panel>,
    pub status: Option<StatusMessage>,
    pub extracted_text: String,
    pub white_space: WhiteSpace,
    pub questions: PanelBody,
    pub experience: PanelBody,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            visible: BTreeSet::new(),
            status: None,
            extracted_text: String::new(),
            white_space: WhiteSpace::PreWrap,
            questions: PanelBody::Empty,
            experience: PanelBody::Empty,
        }
    }
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self, panel: Panel) -> bool {
        self.visible.contains(&panel)
    }

    pub fn show(&mut self, panel: Panel) {
        self.visible.insert(panel);
    }

    pub fn hide(&mut self, panel: Panel) {
        self.visible.remove(&panel);
    }

    pub fn visible_panels(&self) -> impl Iterator<Item = Panel> + '_ {
        self.visible.iter().copied()
    }

    pub fn set_status(&mut self, level: AlertLevel, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            level,
            text: text.into(),
        });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }
}
