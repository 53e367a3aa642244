use serde::{Deserialize, Serialize};

/// Returned by every simulated write.
#[derive(Debug, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    pub id: String,
    pub message: String,
}

impl MutationResponse {
    pub fn ok(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            id: id.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ValidationResponse {
    pub field: String,
    pub message: String,
}

impl ValidationResponse {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

// Collects field errors the way every form validator here reports them
pub fn into_result(errors: Vec<ValidationResponse>) -> Result<(), Vec<ValidationResponse>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
