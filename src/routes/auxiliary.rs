use actix_session::Session;
use actix_web::{delete, get, web, HttpResponse};
use askama::Template;
use serde::Deserialize;

use crate::auth::{session::auth_context, Action, ResourceOwner};
use crate::db::{repository::ResourceKind, store::Dataset};
use crate::errors::PortalError;
use crate::models::{
    faq::{FaqCategory, FaqItem},
    response::MutationResponse,
};
use crate::routes::{record, require, AppState};
use crate::search::directory::filter_faqs;

#[derive(Template)]
#[template(path = "about.html")]
struct AboutTemplate<'a> {
    site_name: &'a str,
    description: &'a str,
    journal_count: usize,
    article_count: usize,
}

#[derive(Template)]
#[template(path = "faq.html")]
struct FaqTemplate<'a> {
    site_name: &'a str,
    tabs: Vec<FaqTab>,
    faqs: Vec<FaqItem>,
}

struct FaqTab {
    name: &'static str,
    active: bool,
}

#[derive(Template)]
#[template(path = "confirm_delete.html")]
struct ConfirmDeleteTemplate<'a> {
    site_name: &'a str,
    kind: ResourceKind,
    id: &'a str,
    label: String,
    cascades: bool,
}

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate<'a> {
    site_name: &'a str,
    path: &'a str,
}

#[derive(Deserialize)]
pub struct FaqQueryParams {
    pub category: Option<String>,
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type("text/html; charset=utf-8").body(body)
}

/// Human label of a record and, for articles, who owns it.
fn describe(
    data: &Dataset,
    kind: ResourceKind,
    id: &str,
) -> Result<(String, Option<ResourceOwner>), PortalError> {
    let found = match kind {
        ResourceKind::Journal => data
            .journals
            .iter()
            .find(|j| j.id == id)
            .map(|j| (j.title.clone(), None)),
        ResourceKind::Issue => data
            .issues
            .iter()
            .find(|i| i.id == id)
            .map(|i| (i.volume_issue_display(), None)),
        ResourceKind::Article => data
            .articles
            .iter()
            .find(|a| a.id == id)
            .map(|a| (a.title.clone(), Some(ResourceOwner::of_article(a)))),
        ResourceKind::User => data
            .users
            .iter()
            .find(|u| u.id == id)
            .map(|u| (u.name.clone(), None)),
    };
    found.ok_or_else(|| PortalError::NotFound(format!("{} with ID {} not found", kind, id)))
}

fn delete_action(kind: ResourceKind) -> Action {
    match kind {
        ResourceKind::Journal => Action::DeleteJournal,
        ResourceKind::Issue => Action::DeleteIssue,
        ResourceKind::Article => Action::DeleteArticle,
        ResourceKind::User => Action::DeleteUser,
    }
}

#[get("/about")]
pub async fn about_handler(state: web::Data<AppState>) -> Result<HttpResponse, PortalError> {
    let data = state.repository.snapshot()?;
    let page = AboutTemplate {
        site_name: &state.site.name,
        description: &state.site.description,
        journal_count: data.journals.len(),
        article_count: data.articles.len(),
    };
    Ok(html(page.render()?))
}

#[get("/faq")]
pub async fn faq_handler(
    state: web::Data<AppState>,
    query: web::Query<FaqQueryParams>,
) -> Result<HttpResponse, PortalError> {
    let data = state.repository.snapshot()?;
    let category = query
        .category
        .as_deref()
        .and_then(|c| serde_json::from_value::<FaqCategory>(serde_json::json!(c)).ok());
    let tabs = [
        ("all", None),
        ("general", Some(FaqCategory::General)),
        ("author", Some(FaqCategory::Author)),
        ("editor", Some(FaqCategory::Editor)),
    ]
    .into_iter()
    .map(|(name, tab)| FaqTab {
        name,
        active: tab == category,
    })
    .collect();

    let page = FaqTemplate {
        site_name: &state.site.name,
        tabs,
        faqs: filter_faqs(&data.faqs, category),
    };
    Ok(html(page.render()?))
}

#[get("/confirm-delete/{resource_type}/{id}")]
pub async fn confirm_delete_handler(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(ResourceKind, String)>,
) -> Result<HttpResponse, PortalError> {
    let (kind, id) = path.into_inner();
    let ctx = auth_context(&session, state.repository.as_ref())?;
    let data = state.repository.snapshot()?;
    let (label, owner) = describe(&data, kind, &id)?;
    require(&ctx, delete_action(kind), owner.as_ref())?;

    let page = ConfirmDeleteTemplate {
        site_name: &state.site.name,
        kind,
        id: &id,
        label,
        cascades: matches!(kind, ResourceKind::Journal | ResourceKind::Issue),
    };
    Ok(html(page.render()?))
}

/// Deleting a journal or an issue also removes what it contains.
#[delete("/api/{resource_type}/{id}")]
pub async fn delete_resource_handler(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(ResourceKind, String)>,
) -> Result<HttpResponse, PortalError> {
    let (kind, id) = path.into_inner();
    let ctx = auth_context(&session, state.repository.as_ref())?;
    let data = state.repository.snapshot()?;
    let (label, owner) = describe(&data, kind, &id)?;
    require(&ctx, delete_action(kind), owner.as_ref())?;

    state.repository.delete(kind, &id)?;
    record(
        &state,
        &ctx,
        &format!("Delete {}", capitalized(kind)),
        format!("Deleted {} \"{}\"", kind, label),
    )?;

    Ok(HttpResponse::Ok().json(MutationResponse::ok(
        id,
        format!("{} deleted successfully", capitalized(kind)),
    )))
}

fn capitalized(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Journal => "Journal",
        ResourceKind::Issue => "Issue",
        ResourceKind::Article => "Article",
        ResourceKind::User => "User",
    }
}

/// Fallback for every unmatched route.
pub async fn not_found_handler(
    state: web::Data<AppState>,
    req: actix_web::HttpRequest,
) -> Result<HttpResponse, PortalError> {
    let page = NotFoundTemplate {
        site_name: &state.site.name,
        path: req.path(),
    };
    Ok(HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(page.render()?))
}
