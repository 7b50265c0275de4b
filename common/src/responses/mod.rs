use serde::{Deserialize, Serialize};

/// Body of every error response and of the delete confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

/// Success envelope for create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        DataResponse {
            message: message.into(),
            data,
        }
    }
}
