//! Role gate deciding which actions a viewer is offered.
//!
//! This is presentation-layer authorization only. The role comes from an
//! unauthenticated demo selector and there is no credential model, so the
//! gate is not a trust boundary: it decides which edit/delete affordances
//! are reported, and the simulated writes consult it so the demo behaves
//! consistently.

pub mod session;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::models::{article::Article, user::Role, user::User};

#[derive(Debug, Display, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[display("view_published")]
    ViewPublished,
    #[display("view_unpublished")]
    ViewUnpublished,
    #[display("filter_by_status")]
    FilterByStatus,
    #[display("create_journal")]
    CreateJournal,
    #[display("edit_journal")]
    EditJournal,
    #[display("delete_journal")]
    DeleteJournal,
    #[display("create_issue")]
    CreateIssue,
    #[display("edit_issue")]
    EditIssue,
    #[display("delete_issue")]
    DeleteIssue,
    #[display("create_article")]
    CreateArticle,
    #[display("edit_article")]
    EditArticle,
    #[display("withdraw_article")]
    WithdrawArticle,
    #[display("delete_article")]
    DeleteArticle,
    #[display("manage_users")]
    ManageUsers,
    #[display("delete_user")]
    DeleteUser,
    #[display("view_logs")]
    ViewLogs,
}

impl Action {
    pub const ALL: [Action; 16] = [
        Action::ViewPublished,
        Action::ViewUnpublished,
        Action::FilterByStatus,
        Action::CreateJournal,
        Action::EditJournal,
        Action::DeleteJournal,
        Action::CreateIssue,
        Action::EditIssue,
        Action::DeleteIssue,
        Action::CreateArticle,
        Action::EditArticle,
        Action::WithdrawArticle,
        Action::DeleteArticle,
        Action::ManageUsers,
        Action::DeleteUser,
        Action::ViewLogs,
    ];
}

/// Who owns a resource. Ownership is a name match against the author list;
/// no identity binding exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceOwner {
    author_names: Vec<String>,
}

impl ResourceOwner {
    pub fn of_article(article: &Article) -> Self {
        Self {
            author_names: article.authors.iter().map(|a| a.name.clone()).collect(),
        }
    }
}

/// Explicit authorization context threaded through every gate check.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AuthContext {
    pub role: Role,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
}

impl AuthContext {
    pub fn new(role: Role, user: Option<&User>) -> Self {
        Self {
            role,
            user_id: user.map(|u| u.id.clone()),
            user_name: user.map(|u| u.name.clone()),
        }
    }

    pub fn guest() -> Self {
        Self::default()
    }

    fn owns(&self, owner: Option<&ResourceOwner>) -> bool {
        match (self.user_name.as_deref(), owner) {
            (Some(name), Some(owner)) => owner.author_names.iter().any(|n| n == name),
            _ => false,
        }
    }

    /// Id and display name used when recording an audit log entry.
    pub fn actor(&self) -> (&str, &str) {
        (
            self.user_id.as_deref().unwrap_or("anonymous"),
            self.user_name.as_deref().unwrap_or("Anonymous"),
        )
    }
}

pub fn can_perform(ctx: &AuthContext, action: Action, owner: Option<&ResourceOwner>) -> bool {
    match ctx.role {
        Role::Admin => true,
        Role::Editor => matches!(
            action,
            Action::ViewPublished
                | Action::ViewUnpublished
                | Action::FilterByStatus
                | Action::EditJournal
                | Action::CreateIssue
                | Action::EditIssue
                | Action::CreateArticle
                | Action::EditArticle
                | Action::WithdrawArticle
                | Action::DeleteArticle
        ),
        Role::Author => match action {
            Action::ViewPublished | Action::FilterByStatus | Action::CreateArticle => true,
            Action::ViewUnpublished | Action::EditArticle | Action::WithdrawArticle => {
                ctx.owns(owner)
            }
            _ => false,
        },
        Role::Guest => action == Action::ViewPublished,
    }
}

pub fn allowed_actions(ctx: &AuthContext, owner: Option<&ResourceOwner>) -> Vec<Action> {
    Action::ALL
        .into_iter()
        .filter(|action| can_perform(ctx, *action, owner))
        .collect()
}
