use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type SequenceResult<T> = Result<T, SequenceError>;

/// 序列装载、序列化过程中可恢复的错误。
///
/// 重复提交之类的不变式破坏不在此列，那属于调用方的编程错误，会直接 panic。
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum SequenceError {
    #[error("unknown sequence element type `{label}`")]
    UnknownElementType { label: String },
    #[error("invalid content for `{label}` element: {message}")]
    InvalidContent { label: String, message: String },
    #[error("malformed sequence batch: {message}")]
    MalformedBatch { message: String },
}

impl SequenceError {
    pub fn unknown_element_type(label: impl Into<String>) -> Self {
        Self::UnknownElementType {
            label: label.into(),
        }
    }

    pub fn invalid_content(label: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self::InvalidContent {
            label: label.into(),
            message: error.to_string(),
        }
    }

    pub fn malformed_batch(error: impl std::fmt::Display) -> Self {
        Self::MalformedBatch {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for SequenceError {
    fn from(error: serde_json::Error) -> Self {
        Self::malformed_batch(error)
    }
}
