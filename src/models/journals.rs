use crate::models::response::{into_result, ValidationResponse};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::ValidateEmail;

static ISSN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{3}[\dXx]$").expect("ISSN pattern is valid"));

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Journal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub issn: String,
    pub field: String,
    pub publisher: String,
    pub cover_image: String,
    pub contact_email: String,
}

/// Body of the create / edit journal form.
#[derive(Debug, Deserialize, Clone)]
pub struct JournalForm {
    pub title: String,
    pub description: String,
    pub issn: String,
    #[serde(default = "default_field")]
    pub field: String,
    pub publisher: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub contact_email: String,
}

fn default_field() -> String {
    String::from("Computer Science")
}

impl JournalForm {
    pub fn validate(&self) -> Result<(), Vec<ValidationResponse>> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(ValidationResponse::new("title", "Title cannot be empty"));
        }
        if !ISSN_PATTERN.is_match(self.issn.trim()) {
            errors.push(ValidationResponse::new(
                "issn",
                "ISSN must look like 1234-5678",
            ));
        }
        if self.field.trim().is_empty() {
            errors.push(ValidationResponse::new("field", "Field cannot be empty"));
        }
        if self.publisher.trim().is_empty() {
            errors.push(ValidationResponse::new(
                "publisher",
                "Publisher cannot be empty",
            ));
        }
        if !self.contact_email.trim().validate_email() {
            errors.push(ValidationResponse::new(
                "contact_email",
                "Invalid email address",
            ));
        }

        into_result(errors)
    }

    /// Builds the record; an edit keeps the previous cover when none is given.
    pub fn into_journal(self, id: String, previous: Option<&Journal>) -> Journal {
        let cover_image = self
            .cover_image
            .filter(|c| !c.trim().is_empty())
            .or_else(|| previous.map(|p| p.cover_image.clone()))
            .unwrap_or_else(|| format!("https://picsum.photos/400/600?seed={}", id));

        Journal {
            id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            issn: self.issn.trim().to_uppercase(),
            field: self.field.trim().to_string(),
            publisher: self.publisher.trim().to_string(),
            cover_image,
            contact_email: self.contact_email.trim().to_string(),
        }
    }
}
