// src/types/response.rs
//! Response bodies of `/upload` and `/process`, validated at the boundary

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::types::request::ProcessAction;

/// Successful `/upload` answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub filename: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct QuestionsBody {
    questions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ExperienceBody {
    experience: serde_json::Value,
}

/// Successful `/process` answer, shaped by the requested action
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessResult {
    Questions(Vec<String>),
    Experience(serde_json::Value),
}

impl ExtractedDocument {
    pub fn from_body(body: &str) -> Result<Self, ServiceError> {
        serde_json::from_str(body).map_err(|e| {
            ServiceError::Malformed(format!("expected {{filename, text}}: {}", e))
        })
    }
}

impl ProcessResult {
    pub fn from_body(action: ProcessAction, body: &str) -> Result<Self, ServiceError> {
        match action {
            ProcessAction::GenerateQuestions => serde_json::from_str::<QuestionsBody>(body)
                .map(|b| ProcessResult::Questions(b.questions))
                .map_err(|e| ServiceError::Malformed(format!("expected {{questions}}: {}", e))),
            ProcessAction::AnalyzeExperience => serde_json::from_str::<ExperienceBody>(body)
                .map_err(|e| ServiceError::Malformed(format!("expected {{experience}}: {}", e)))
                .and_then(|b| {
                    if b.experience.is_null() {
                        Err(ServiceError::Malformed("experience is null".to_string()))
                    } else {
                        Ok(ProcessResult::Experience(b.experience))
                    }
                }),
        }
    }
}

/// Turn a non-2xx answer into a `ServiceError`.
///
/// A body without an `error` field counts as malformed rather than as a
/// server-reported error.
pub fn error_from_body(status: u16, body: &str) -> ServiceError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(b) => ServiceError::Server {
            status,
            message: b.error,
        },
        Err(_) => ServiceError::Malformed(format!("HTTP {} without error field: {}", status, body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracted_document_requires_both_fields() {
        let doc = ExtractedDocument::from_body(r#"{"filename":"r1","text":"Hello"}"#).unwrap();
        assert_eq!(doc.filename, "r1");
        assert_eq!(doc.text, "Hello");

        let err = ExtractedDocument::from_body(r#"{"message":"File uploaded successfully"}"#);
        assert!(matches!(err, Err(ServiceError::Malformed(_))));
    }

    #[test]
    fn test_process_result_follows_action() {
        let questions = ProcessResult::from_body(
            ProcessAction::GenerateQuestions,
            r#"{"questions":["Q1","Q2"]}"#,
        )
        .unwrap();
        assert_eq!(
            questions,
            ProcessResult::Questions(vec!["Q1".to_string(), "Q2".to_string()])
        );

        // an experience body does not satisfy a questions request
        let mismatch =
            ProcessResult::from_body(ProcessAction::GenerateQuestions, r#"{"experience":{}}"#);
        assert!(mismatch.is_err());
    }

    #[test]
    fn test_null_experience_is_malformed() {
        let result =
            ProcessResult::from_body(ProcessAction::AnalyzeExperience, r#"{"experience":null}"#);
        assert!(matches!(result, Err(ServiceError::Malformed(_))));
    }

    #[test]
    fn test_error_from_body() {
        assert_eq!(
            error_from_body(400, r#"{"error":"bad format"}"#),
            ServiceError::Server {
                status: 400,
                message: "bad format".to_string()
            }
        );
        assert!(matches!(
            error_from_body(502, "<html>Bad Gateway</html>"),
            ServiceError::Malformed(_)
        ));
    }
}
