use crate::models::response::{into_result, ValidationResponse};
use crate::utils;
use chrono::{Local, NaiveDate};
use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub affiliation: String,
}

#[derive(Debug, Display, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    #[display("draft")]
    Draft,
    #[display("pending")]
    Pending,
    #[display("under_review")]
    UnderReview,
    #[display("published")]
    Published,
    #[display("rejected")]
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub authors: Vec<Author>,
    pub abstract_text: String,
    /// ISO `YYYY-MM-DD`, compared as a plain string.
    pub publish_date: String,
    pub keywords: Vec<String>,
    pub pdf_url: Option<String>,
    pub page_range: String,
    pub issue_id: String,
    pub journal_id: String,
    pub status: ArticleStatus,
}

impl Article {
    pub fn has_author_named(&self, name: &str) -> bool {
        self.authors.iter().any(|a| a.name == name)
    }
}

/// Manuscript form. Authors come as `Name (Affiliation); Name (Affiliation)`,
/// keywords as a comma separated list.
#[derive(Debug, Deserialize, Clone)]
pub struct ArticleForm {
    pub title: String,
    pub abstract_text: String,
    pub authors: String,
    #[serde(default)]
    pub keywords: String,
    /// Absent on an edit keeps the current status; absent on create means draft.
    #[serde(default)]
    pub status: Option<ArticleStatus>,
    #[serde(default)]
    pub page_range: String,
    pub issue_id: String,
    #[serde(default)]
    pub publish_date: Option<String>,
}

impl ArticleForm {
    pub fn resolved_status(&self, previous: Option<&Article>) -> ArticleStatus {
        self.status
            .or_else(|| previous.map(|p| p.status))
            .unwrap_or(ArticleStatus::Draft)
    }

    pub fn validate(&self) -> Result<(), Vec<ValidationResponse>> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(ValidationResponse::new("title", "Title cannot be empty"));
        }
        if self.abstract_text.trim().is_empty() {
            errors.push(ValidationResponse::new(
                "abstract_text",
                "Abstract cannot be empty",
            ));
        }
        if parse_authors(&self.authors, &[]).is_empty() {
            errors.push(ValidationResponse::new(
                "authors",
                "At least one author is required",
            ));
        }
        if self.issue_id.trim().is_empty() {
            errors.push(ValidationResponse::new("issue_id", "Issue is required"));
        }
        if let Some(date) = self.publish_date.as_deref().filter(|d| !d.is_empty()) {
            if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                errors.push(ValidationResponse::new(
                    "publish_date",
                    "Publish date must be formatted as YYYY-MM-DD",
                ));
            }
        }

        into_result(errors)
    }

    pub fn into_article(self, id: String, journal_id: String, previous: Option<&Article>) -> Article {
        let known = previous.map(|p| p.authors.as_slice()).unwrap_or(&[]);
        let status = self.resolved_status(previous);
        let publish_date = self
            .publish_date
            .filter(|d| !d.is_empty())
            .or_else(|| previous.map(|p| p.publish_date.clone()))
            .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());

        Article {
            id,
            title: self.title.trim().to_string(),
            authors: parse_authors(&self.authors, known),
            abstract_text: self.abstract_text.trim().to_string(),
            publish_date,
            keywords: parse_keywords(&self.keywords),
            pdf_url: previous.and_then(|p| p.pdf_url.clone()),
            page_range: self.page_range.trim().to_string(),
            issue_id: self.issue_id.trim().to_string(),
            journal_id,
            status,
        }
    }
}

/// Parses `Name (Affiliation); ...`. Authors already known by name keep their id.
pub fn parse_authors(raw: &str, known: &[Author]) -> Vec<Author> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (name, affiliation) = match (entry.find('('), entry.rfind(')')) {
                (Some(open), Some(close)) if open < close => {
                    (entry[..open].trim(), entry[open + 1..close].trim())
                }
                _ => (entry, ""),
            };
            let id = known
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.id.clone())
                .unwrap_or_else(|| utils::new_id("au"));
            Author {
                id,
                name: name.to_string(),
                affiliation: affiliation.to_string(),
            }
        })
        .filter(|a| !a.name.is_empty())
        .collect()
}

pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}
