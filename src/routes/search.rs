use std::collections::HashSet;

use actix_session::Session;
use actix_web::{get, web, HttpResponse};
use log::debug;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{can_perform, session::auth_context, Action};
use crate::errors::PortalError;
use crate::models::article::ArticleStatus;
use crate::routes::journals::visible_to;
use crate::routes::AppState;
use crate::search::articles::{distinct_authors, filter_articles, ArticleFilter, SortKey};

/// Query string of the search page. List parameters are comma separated.
#[derive(Deserialize, Default)]
pub struct SearchQueryParams {
    pub q: Option<String>,
    pub author: Option<String>,
    pub journals: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_status(raw: &str) -> Result<ArticleStatus, PortalError> {
    serde_json::from_value(json!(raw))
        .map_err(|_| PortalError::ValidationError(format!("status: Unknown article status {:?}", raw)))
}

impl SearchQueryParams {
    /// Fails on an unknown status so a typo never widens the result set.
    pub fn into_filter(self) -> Result<ArticleFilter, PortalError> {
        let statuses = match self.status.as_deref() {
            Some(raw) => split_list(raw)
                .map(parse_status)
                .collect::<Result<HashSet<_>, _>>()?,
            None => ArticleFilter::default().statuses,
        };
        Ok(ArticleFilter {
            query: self.q.unwrap_or_default().trim().to_string(),
            author: self.author.unwrap_or_default().trim().to_string(),
            journals: self
                .journals
                .as_deref()
                .map(|raw| split_list(raw).map(String::from).collect())
                .unwrap_or_default(),
            date_from: self.date_from.unwrap_or_default(),
            date_to: self.date_to.unwrap_or_default(),
            statuses,
        })
    }
}

#[get("/api/search")]
pub async fn search_handler(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<SearchQueryParams>,
) -> Result<HttpResponse, PortalError> {
    let ctx = auth_context(&session, state.repository.as_ref())?;
    let data = state.repository.snapshot()?;

    let params = query.into_inner();
    let sort = params.sort;
    let filter = params.into_filter()?.restricted_to(&ctx);
    debug!("Searching with {:?} sorted by {:?}", filter, sort);

    let results: Vec<_> = filter_articles(&data.articles, &filter, sort)
        .into_iter()
        .filter(|a| visible_to(&ctx, a))
        .map(|a| {
            let journal_title = data
                .journals
                .iter()
                .find(|j| j.id == a.journal_id)
                .map(|j| j.title.clone());
            json!({ "article": a, "journal_title": journal_title })
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "total": results.len(),
        "results": results,
        "authors": distinct_authors(&data.articles),
        "journals": data.journals.iter().map(|j| json!({ "id": j.id, "title": j.title })).collect::<Vec<_>>(),
        "status_filter_enabled": can_perform(&ctx, Action::FilterByStatus, None),
    })))
}
