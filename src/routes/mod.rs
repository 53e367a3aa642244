use std::sync::Arc;

use actix_web::web;
use log::{info, warn};

use crate::ai::AiAdapter;
use crate::auth::{can_perform, Action, AuthContext, ResourceOwner};
use crate::config::SiteConfig;
use crate::db::repository::CatalogRepository;
use crate::errors::PortalError;
use crate::models::log_entry::LogEntry;

pub mod admin;
pub mod auxiliary;
pub mod forms;
pub mod journals;
pub mod profile;
pub mod search;

/// Shared by every handler through `web::Data`.
pub struct AppState {
    pub repository: Arc<dyn CatalogRepository>,
    pub ai: AiAdapter,
    pub site: SiteConfig,
}

impl AppState {
    pub fn new(repository: Arc<dyn CatalogRepository>, ai: AiAdapter, site: SiteConfig) -> Self {
        Self {
            repository,
            ai,
            site,
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // --- Browsing ---
        .service(journals::journal_list_handler)
        .service(journals::semantic_search_handler)
        .service(journals::journal_detail_handler)
        .service(journals::issue_detail_handler)
        .service(journals::article_detail_handler)
        .service(journals::summarize_article_handler)
        .service(search::search_handler)
        // --- Demo session & profile ---
        .service(profile::current_role_handler)
        .service(profile::switch_role_handler)
        .service(profile::profile_handler)
        // --- Admin ---
        .service(admin::list_users_handler)
        .service(admin::create_user_handler)
        .service(admin::update_user_handler)
        .service(admin::delete_user_handler)
        .service(admin::logs_handler)
        // --- Forms ---
        .service(forms::create_journal_handler)
        .service(forms::update_journal_handler)
        .service(forms::create_issue_handler)
        .service(forms::update_issue_handler)
        .service(forms::submit_article_handler)
        .service(forms::update_article_handler)
        .service(forms::withdraw_article_handler)
        // --- Auxiliary ---
        .service(auxiliary::about_handler)
        .service(auxiliary::faq_handler)
        .service(auxiliary::confirm_delete_handler)
        .service(auxiliary::delete_resource_handler);
}

/// Rejects a simulated write the role gate does not offer to this viewer.
pub(crate) fn require(
    ctx: &AuthContext,
    action: Action,
    owner: Option<&ResourceOwner>,
) -> Result<(), PortalError> {
    if can_perform(ctx, action, owner) {
        Ok(())
    } else {
        warn!("Role {} attempted {} without permission", ctx.role, action);
        Err(PortalError::Forbidden(format!(
            "Role {} may not perform {}",
            ctx.role, action
        )))
    }
}

/// Appends an audit entry for a simulated write.
pub(crate) fn record(
    state: &AppState,
    ctx: &AuthContext,
    action: &str,
    details: String,
) -> Result<(), PortalError> {
    let (user_id, user_name) = ctx.actor();
    info!("{} by {}: {}", action, user_name, details);
    state
        .repository
        .append_log(LogEntry::record(user_id, user_name, action, details))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use actix_session::{storage::CookieSessionStore, SessionMiddleware};
    use actix_web::cookie::Key;

    use super::AppState;
    use crate::ai::AiAdapter;
    use crate::config::SiteConfig;
    use crate::db::store::MockStore;

    pub fn state_with(ai: AiAdapter) -> (Arc<MockStore>, AppState) {
        let store = Arc::new(MockStore::seeded());
        let state = AppState::new(store.clone(), ai, SiteConfig::default());
        (store, state)
    }

    pub fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), Key::from(&[7u8; 64]))
            .cookie_secure(false)
            .build()
    }
}
