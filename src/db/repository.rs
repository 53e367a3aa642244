use std::sync::Arc;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::db::store::Dataset;
use crate::errors::PortalError;
use crate::models::{
    article::Article, issue::Issue, journals::Journal, log_entry::LogEntry, user::Role,
    user::User,
};

/// Record kinds reachable through the generic delete route.
#[derive(Debug, Display, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    #[display("journal")]
    Journal,
    #[display("issue")]
    Issue,
    #[display("article")]
    Article,
    #[display("user")]
    User,
}

/// Access to the catalogue. Reads work on an immutable snapshot; every
/// write replaces the whole collection.
pub trait CatalogRepository: Send + Sync {
    fn snapshot(&self) -> Result<Arc<Dataset>, PortalError>;

    fn save_journal(&self, journal: Journal) -> Result<(), PortalError>;
    fn save_issue(&self, issue: Issue) -> Result<(), PortalError>;
    fn save_article(&self, article: Article) -> Result<(), PortalError>;
    fn save_user(&self, user: User) -> Result<(), PortalError>;
    fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), PortalError>;
    fn append_log(&self, entry: LogEntry) -> Result<(), PortalError>;

    fn get_journal(&self, id: &str) -> Result<Journal, PortalError> {
        self.snapshot()?
            .journals
            .iter()
            .find(|j| j.id == id)
            .cloned()
            .ok_or_else(|| PortalError::NotFound(format!("Journal with ID {} not found", id)))
    }

    /// The issue must belong to `journal_id`.
    fn get_issue(&self, journal_id: &str, issue_id: &str) -> Result<Issue, PortalError> {
        self.snapshot()?
            .issues
            .iter()
            .find(|i| i.id == issue_id && i.journal_id == journal_id)
            .cloned()
            .ok_or_else(|| {
                PortalError::NotFound(format!(
                    "Issue with ID {} not found in journal {}",
                    issue_id, journal_id
                ))
            })
    }

    fn get_article(&self, id: &str) -> Result<Article, PortalError> {
        self.snapshot()?
            .articles
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| PortalError::NotFound(format!("Article with ID {} not found", id)))
    }

    fn get_user(&self, id: &str) -> Result<User, PortalError> {
        self.snapshot()?
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| PortalError::NotFound(format!("User with ID {} not found", id)))
    }

    /// First user holding `role`; the demo selector impersonates them.
    fn user_for_role(&self, role: Role) -> Result<Option<User>, PortalError> {
        Ok(self
            .snapshot()?
            .users
            .iter()
            .find(|u| u.role == role)
            .cloned())
    }
}
