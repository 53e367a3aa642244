use crate::models::response::{into_result, ValidationResponse};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Issue {
    pub id: String,
    pub volume: u32,
    pub number: u32,
    pub year: i32,
    pub cover_image: Option<String>,
    pub journal_id: String,
}

impl Issue {
    pub fn volume_issue_display(&self) -> String {
        format!("Vol. {} No. {}", self.volume, self.number)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct IssueForm {
    pub volume: u32,
    pub number: u32,
    pub year: i32,
    #[serde(default)]
    pub cover_image: Option<String>,
}

impl IssueForm {
    pub fn validate(&self) -> Result<(), Vec<ValidationResponse>> {
        let mut errors = Vec::new();

        if self.volume == 0 {
            errors.push(ValidationResponse::new(
                "volume",
                "Volume must be a positive number",
            ));
        }
        if self.number == 0 {
            errors.push(ValidationResponse::new(
                "number",
                "Issue number must be a positive number",
            ));
        }
        if !(1900..=2100).contains(&self.year) {
            errors.push(ValidationResponse::new(
                "year",
                "Year must be between 1900 and 2100",
            ));
        }

        into_result(errors)
    }

    pub fn into_issue(self, id: String, journal_id: String, previous: Option<&Issue>) -> Issue {
        let cover_image = self
            .cover_image
            .filter(|c| !c.trim().is_empty())
            .or_else(|| previous.and_then(|p| p.cover_image.clone()));

        Issue {
            id,
            volume: self.volume,
            number: self.number,
            year: self.year,
            cover_image,
            journal_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_volume_and_number() {
        let form = IssueForm {
            volume: 0,
            number: 0,
            year: 2024,
            cover_image: None,
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "volume");
        assert_eq!(errors[1].field, "number");
    }

    #[test]
    fn displays_volume_and_number() {
        let issue = IssueForm {
            volume: 12,
            number: 1,
            year: 2024,
            cover_image: Some(String::new()),
        }
        .into_issue("i1".to_string(), "j1".to_string(), None);
        assert_eq!(issue.volume_issue_display(), "Vol. 12 No. 1");
        assert_eq!(issue.cover_image, None);
    }
}
