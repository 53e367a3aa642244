use actix_session::Session;
use actix_web::{get, post, web, HttpResponse};
use log::{debug, info};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{allowed_actions, can_perform, session::auth_context, Action, AuthContext, ResourceOwner};
use crate::errors::PortalError;
use crate::models::article::{Article, ArticleStatus};
use crate::routes::AppState;
use crate::search::journals::{
    apply_semantic_match, articles_for_issue, distinct_fields, filter_journals,
    issues_for_journal, IssueSort, JournalFilter,
};

#[derive(Deserialize)]
pub struct JournalQueryParams {
    pub q: Option<String>,
    pub field: Option<String>,
}

impl JournalQueryParams {
    fn into_filter(self) -> JournalFilter {
        JournalFilter {
            query: self.q.unwrap_or_default(),
            field: self.field.filter(|f| !f.is_empty() && f != "All"),
        }
    }
}

#[derive(Deserialize)]
pub struct SemanticSearchRequest {
    pub query: String,
    #[serde(default)]
    pub field: Option<String>,
}

#[derive(Deserialize)]
pub struct IssueQueryParams {
    #[serde(default)]
    pub sort: IssueSort,
}

/// Unpublished articles are only shown to viewers who may see them.
pub(crate) fn visible_to(ctx: &AuthContext, article: &Article) -> bool {
    article.status == ArticleStatus::Published
        || can_perform(
            ctx,
            Action::ViewUnpublished,
            Some(&ResourceOwner::of_article(article)),
        )
}

#[get("/api/journals")]
pub async fn journal_list_handler(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<JournalQueryParams>,
) -> Result<HttpResponse, PortalError> {
    let ctx = auth_context(&session, state.repository.as_ref())?;
    let data = state.repository.snapshot()?;
    let filter = query.into_inner().into_filter();

    Ok(HttpResponse::Ok().json(json!({
        "journals": filter_journals(&data.journals, &filter),
        "fields": distinct_fields(&data.journals),
        "allowed_actions": allowed_actions(&ctx, None),
        "ai_enabled": state.ai.is_configured(),
    })))
}

#[post("/api/journals/semantic-search")]
pub async fn semantic_search_handler(
    state: web::Data<AppState>,
    body: web::Json<SemanticSearchRequest>,
) -> Result<HttpResponse, PortalError> {
    let request = body.into_inner();
    if request.query.trim().is_empty() {
        return Err(PortalError::ValidationError(
            "query: Search query cannot be empty".to_string(),
        ));
    }

    let data = state.repository.snapshot()?;
    let prior = filter_journals(
        &data.journals,
        &JournalFilter {
            query: request.query.clone(),
            field: request.field.filter(|f| !f.is_empty() && f != "All"),
        },
    );
    let titles: Vec<String> = data.journals.iter().map(|j| j.title.clone()).collect();

    let outcome = state
        .ai
        .semantic_match_tracked(&request.query, &titles)
        .await?;
    info!(
        "Semantic search for {:?}: {} title(s)",
        request.query,
        outcome.titles().len()
    );
    let journals = apply_semantic_match(&prior, &data.journals, &outcome);

    Ok(HttpResponse::Ok().json(json!({
        "outcome": outcome,
        "journals": journals,
    })))
}

#[get("/api/journals/{journal_id}")]
pub async fn journal_detail_handler(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, PortalError> {
    let journal_id = path.into_inner();
    let ctx = auth_context(&session, state.repository.as_ref())?;
    let journal = state.repository.get_journal(&journal_id)?;
    let data = state.repository.snapshot()?;

    Ok(HttpResponse::Ok().json(json!({
        "journal": journal,
        "issues": issues_for_journal(&data.issues, &journal_id),
        "allowed_actions": allowed_actions(&ctx, None),
    })))
}

#[get("/api/journals/{journal_id}/issues/{issue_id}")]
pub async fn issue_detail_handler(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(String, String)>,
    query: web::Query<IssueQueryParams>,
) -> Result<HttpResponse, PortalError> {
    let (journal_id, issue_id) = path.into_inner();
    let ctx = auth_context(&session, state.repository.as_ref())?;
    let journal = state.repository.get_journal(&journal_id)?;
    let issue = state.repository.get_issue(&journal_id, &issue_id)?;
    let data = state.repository.snapshot()?;

    let articles: Vec<_> = articles_for_issue(&data.articles, &issue_id, query.sort)
        .into_iter()
        .filter(|a| visible_to(&ctx, a))
        .map(|a| {
            let actions = allowed_actions(&ctx, Some(&ResourceOwner::of_article(&a)));
            json!({ "article": a, "allowed_actions": actions })
        })
        .collect();
    debug!("Issue {} lists {} article(s)", issue_id, articles.len());

    Ok(HttpResponse::Ok().json(json!({
        "journal": journal,
        "issue": issue,
        "articles": articles,
        "allowed_actions": allowed_actions(&ctx, None),
    })))
}

#[get("/api/journals/{journal_id}/issues/{issue_id}/articles/{article_id}")]
pub async fn article_detail_handler(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(String, String, String)>,
) -> Result<HttpResponse, PortalError> {
    let (journal_id, issue_id, article_id) = path.into_inner();
    let ctx = auth_context(&session, state.repository.as_ref())?;
    let article = state.repository.get_article(&article_id)?;

    if article.journal_id != journal_id || article.issue_id != issue_id || !visible_to(&ctx, &article) {
        return Err(PortalError::NotFound(format!(
            "Article with ID {} not found",
            article_id
        )));
    }
    let journal = state.repository.get_journal(&journal_id)?;
    let owner = ResourceOwner::of_article(&article);

    Ok(HttpResponse::Ok().json(json!({
        "journal_title": journal.title,
        "article": article,
        "allowed_actions": allowed_actions(&ctx, Some(&owner)),
        "ai_enabled": state.ai.is_configured(),
    })))
}

#[post("/api/articles/{article_id}/summary")]
pub async fn summarize_article_handler(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, PortalError> {
    let article_id = path.into_inner();
    let ctx = auth_context(&session, state.repository.as_ref())?;
    let article = state.repository.get_article(&article_id)?;
    if !visible_to(&ctx, &article) {
        return Err(PortalError::NotFound(format!(
            "Article with ID {} not found",
            article_id
        )));
    }

    let summary = state
        .ai
        .summarize_tracked(&article.id, &article.abstract_text)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "article_id": article.id,
        "summary": summary,
        "ai_enabled": state.ai.is_configured(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::ai::adapter::SUMMARY_NOT_CONFIGURED;
    use crate::ai::{AiAction, AiAdapter, AiError, GenerateRequest, GenerativeClient, RequestPhase};
    use crate::routes::test_support::{session_middleware, state_with};
    use actix_web::{http::StatusCode, test, App};
    use async_trait::async_trait;
    use serde_json::Value;
    use tokio::sync::Notify;

    // Holds every call open until released.
    struct HeldClient {
        release: Arc<Notify>,
    }

    #[async_trait]
    impl GenerativeClient for HeldClient {
        async fn generate(&self, _request: GenerateRequest) -> Result<Option<String>, AiError> {
            self.release.notified().await;
            Ok(Some("A short summary.".to_string()))
        }
    }

    #[actix_web::test]
    async fn lists_journals_filtered_by_field() {
        let (_, state) = state_with(AiAdapter::new(None));
        let app = test::init_service(
            App::new()
                .wrap(session_middleware())
                .app_data(web::Data::new(state))
                .configure(crate::routes::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/journals?field=Physics")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["journals"].as_array().unwrap().len(), 1);
        assert_eq!(body["journals"][0]["id"], "j3");
        assert_eq!(body["fields"].as_array().unwrap().len(), 4);
        assert_eq!(body["allowed_actions"], json!(["view_published"]));
        assert_eq!(body["ai_enabled"], false);
    }

    #[actix_web::test]
    async fn semantic_search_without_key_keeps_text_results() {
        let (_, state) = state_with(AiAdapter::new(None));
        let app = test::init_service(
            App::new()
                .wrap(session_middleware())
                .app_data(web::Data::new(state))
                .configure(crate::routes::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/journals/semantic-search")
            .set_json(json!({ "query": "medical" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["outcome"]["outcome"], "unavailable");
        assert_eq!(body["journals"].as_array().unwrap().len(), 1);
        assert_eq!(body["journals"][0]["id"], "j2");
    }

    #[actix_web::test]
    async fn issue_lists_articles_sorted_by_title() {
        let (_, state) = state_with(AiAdapter::new(None));
        let app = test::init_service(
            App::new()
                .wrap(session_middleware())
                .app_data(web::Data::new(state))
                .configure(crate::routes::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/journals/j1/issues/i1?sort=title")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["articles"][0]["article"]["id"], "a2");
        assert_eq!(body["articles"][1]["article"]["id"], "a1");

        let req = test::TestRequest::get()
            .uri("/api/journals/j2/issues/i1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn article_must_match_its_route() {
        let (_, state) = state_with(AiAdapter::new(None));
        let app = test::init_service(
            App::new()
                .wrap(session_middleware())
                .app_data(web::Data::new(state))
                .configure(crate::routes::configure),
        )
        .await;

        let ok = test::TestRequest::get()
            .uri("/api/journals/j2/issues/i3/articles/a3")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, ok).await;
        assert_eq!(body["journal_title"], "Modern Medical Research");

        let wrong = test::TestRequest::get()
            .uri("/api/journals/j1/issues/i1/articles/a3")
            .to_request();
        assert_eq!(test::call_service(&app, wrong).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn summary_uses_fallback_without_key() {
        let (_, state) = state_with(AiAdapter::new(None));
        let app = test::init_service(
            App::new()
                .wrap(session_middleware())
                .app_data(web::Data::new(state))
                .configure(crate::routes::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/articles/a1/summary")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["summary"], SUMMARY_NOT_CONFIGURED);
    }

    #[actix_web::test]
    async fn second_summary_while_one_is_running_conflicts() {
        let release = Arc::new(Notify::new());
        let ai = AiAdapter::new(Some(Arc::new(HeldClient {
            release: release.clone(),
        })));
        let tracker = ai.tracker().clone();
        let (_, state) = state_with(ai);
        let app = test::init_service(
            App::new()
                .wrap(session_middleware())
                .app_data(web::Data::new(state))
                .configure(crate::routes::configure),
        )
        .await;

        let first = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/articles/a1/summary")
                .to_request(),
        );
        let second = async {
            while tracker.phase(AiAction::Summarize, "a1") != RequestPhase::Loading {
                tokio::task::yield_now().await;
            }
            let resp = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/api/articles/a1/summary")
                    .to_request(),
            )
            .await;
            release.notify_one();
            resp
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(second.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(second).await;
        assert_eq!(body["error"], "CONFLICT_ERROR");

        assert_eq!(first.status(), StatusCode::OK);
        let body: Value = test::read_body_json(first).await;
        assert_eq!(body["summary"], "A short summary.");
        assert_eq!(tracker.phase(AiAction::Summarize, "a1"), RequestPhase::Idle);
    }
}
