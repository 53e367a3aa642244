use actix_session::Session;
use actix_web::{post, put, web, HttpResponse};

use crate::auth::{can_perform, session::auth_context, Action, AuthContext, ResourceOwner};
use crate::errors::PortalError;
use crate::models::{
    article::{ArticleForm, ArticleStatus},
    issue::IssueForm,
    journals::JournalForm,
    response::MutationResponse,
};
use crate::routes::{record, require, AppState};
use crate::utils;

// Authors may only save drafts or send a manuscript for review; an
// unchanged status is always accepted.
fn check_status_choice(
    ctx: &AuthContext,
    status: ArticleStatus,
    current: Option<ArticleStatus>,
) -> Result<(), PortalError> {
    let editorial = can_perform(ctx, Action::EditArticle, None);
    match status {
        ArticleStatus::Draft | ArticleStatus::Pending => Ok(()),
        _ if editorial || current == Some(status) => Ok(()),
        _ => Err(PortalError::Forbidden(format!(
            "Role {} may not set status {}",
            ctx.role, status
        ))),
    }
}

#[post("/api/admin/journals")]
pub async fn create_journal_handler(
    state: web::Data<AppState>,
    session: Session,
    form: web::Json<JournalForm>,
) -> Result<HttpResponse, PortalError> {
    let ctx = auth_context(&session, state.repository.as_ref())?;
    require(&ctx, Action::CreateJournal, None)?;

    let form = form.into_inner();
    form.validate()?;
    let journal = form.into_journal(utils::new_id("j"), None);
    let id = journal.id.clone();
    let details = format!("Created \"{}\"", journal.title);
    state.repository.save_journal(journal)?;
    record(&state, &ctx, "Create Journal", details)?;

    Ok(HttpResponse::Created().json(MutationResponse::ok(id, "Journal created successfully")))
}

#[put("/api/admin/journals/{journal_id}")]
pub async fn update_journal_handler(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Json<JournalForm>,
) -> Result<HttpResponse, PortalError> {
    let journal_id = path.into_inner();
    let ctx = auth_context(&session, state.repository.as_ref())?;
    require(&ctx, Action::EditJournal, None)?;

    let previous = state.repository.get_journal(&journal_id)?;
    let form = form.into_inner();
    form.validate()?;
    let journal = form.into_journal(journal_id.clone(), Some(&previous));
    let details = format!("Updated \"{}\"", journal.title);
    state.repository.save_journal(journal)?;
    record(&state, &ctx, "Update Journal", details)?;

    Ok(HttpResponse::Ok().json(MutationResponse::ok(journal_id, "Journal updated successfully")))
}

#[post("/api/admin/journals/{journal_id}/issues")]
pub async fn create_issue_handler(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Json<IssueForm>,
) -> Result<HttpResponse, PortalError> {
    let journal_id = path.into_inner();
    let ctx = auth_context(&session, state.repository.as_ref())?;
    require(&ctx, Action::CreateIssue, None)?;

    let journal = state.repository.get_journal(&journal_id)?;
    let form = form.into_inner();
    form.validate()?;
    let issue = form.into_issue(utils::new_id("i"), journal_id, None);
    let id = issue.id.clone();
    let details = format!("Created {} of \"{}\"", issue.volume_issue_display(), journal.title);
    state.repository.save_issue(issue)?;
    record(&state, &ctx, "Create Issue", details)?;

    Ok(HttpResponse::Created().json(MutationResponse::ok(id, "Issue created successfully")))
}

#[put("/api/admin/journals/{journal_id}/issues/{issue_id}")]
pub async fn update_issue_handler(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(String, String)>,
    form: web::Json<IssueForm>,
) -> Result<HttpResponse, PortalError> {
    let (journal_id, issue_id) = path.into_inner();
    let ctx = auth_context(&session, state.repository.as_ref())?;
    require(&ctx, Action::EditIssue, None)?;

    let previous = state.repository.get_issue(&journal_id, &issue_id)?;
    let form = form.into_inner();
    form.validate()?;
    let issue = form.into_issue(issue_id.clone(), journal_id, Some(&previous));
    let details = format!("Updated {}", issue.volume_issue_display());
    state.repository.save_issue(issue)?;
    record(&state, &ctx, "Update Issue", details)?;

    Ok(HttpResponse::Ok().json(MutationResponse::ok(issue_id, "Issue updated successfully")))
}

#[post("/api/journals/{journal_id}/submit")]
pub async fn submit_article_handler(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Json<ArticleForm>,
) -> Result<HttpResponse, PortalError> {
    let journal_id = path.into_inner();
    let ctx = auth_context(&session, state.repository.as_ref())?;
    require(&ctx, Action::CreateArticle, None)?;

    state.repository.get_journal(&journal_id)?;
    let form = form.into_inner();
    form.validate()?;
    check_status_choice(&ctx, form.resolved_status(None), None)?;
    let article = form.into_article(utils::new_id("a"), journal_id, None);
    let id = article.id.clone();
    let action = if article.status == ArticleStatus::Draft {
        "Save Draft"
    } else {
        "Submit Article"
    };
    let details = format!("Submitted \"{}\"", article.title);
    state.repository.save_article(article)?;
    record(&state, &ctx, action, details)?;

    Ok(HttpResponse::Created().json(MutationResponse::ok(id, "Manuscript saved successfully")))
}

#[put("/api/submit/{article_id}")]
pub async fn update_article_handler(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Json<ArticleForm>,
) -> Result<HttpResponse, PortalError> {
    let article_id = path.into_inner();
    let ctx = auth_context(&session, state.repository.as_ref())?;
    let previous = state.repository.get_article(&article_id)?;
    require(
        &ctx,
        Action::EditArticle,
        Some(&ResourceOwner::of_article(&previous)),
    )?;

    let form = form.into_inner();
    form.validate()?;
    check_status_choice(&ctx, form.resolved_status(Some(&previous)), Some(previous.status))?;
    let article = form.into_article(
        article_id.clone(),
        previous.journal_id.clone(),
        Some(&previous),
    );
    let details = format!("Updated \"{}\"", article.title);
    state.repository.save_article(article)?;
    record(&state, &ctx, "Update Article", details)?;

    Ok(HttpResponse::Ok().json(MutationResponse::ok(article_id, "Manuscript updated successfully")))
}

/// Pulls a manuscript back to draft.
#[post("/api/articles/{article_id}/withdraw")]
pub async fn withdraw_article_handler(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, PortalError> {
    let article_id = path.into_inner();
    let ctx = auth_context(&session, state.repository.as_ref())?;
    let mut article = state.repository.get_article(&article_id)?;
    require(
        &ctx,
        Action::WithdrawArticle,
        Some(&ResourceOwner::of_article(&article)),
    )?;

    article.status = ArticleStatus::Draft;
    let details = format!("Withdrew \"{}\"", article.title);
    state.repository.save_article(article)?;
    record(&state, &ctx, "Withdraw Article", details)?;

    Ok(HttpResponse::Ok().json(MutationResponse::ok(article_id, "Manuscript withdrawn")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiAdapter;
    use crate::db::repository::CatalogRepository;
    use crate::routes::test_support::{session_middleware, state_with};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    fn journal_body() -> Value {
        json!({
            "title": "Journal of Rust Studies",
            "description": "Ownership, lifetimes and friends.",
            "issn": "1234-567x",
            "field": "Computer Science",
            "publisher": "Crab Press",
            "contact_email": "editor@crab.press"
        })
    }

    #[actix_web::test]
    async fn guests_cannot_create_journals() {
        let (store, state) = state_with(AiAdapter::new(None));
        let app = test::init_service(
            App::new()
                .wrap(session_middleware())
                .app_data(web::Data::new(state))
                .configure(crate::routes::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/admin/journals")
            .set_json(journal_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(store.snapshot().unwrap().journals.len(), 4);
    }

    #[actix_web::test]
    async fn admin_creates_journal_and_issue() {
        let (store, state) = state_with(AiAdapter::new(None));
        let app = test::init_service(
            App::new()
                .wrap(session_middleware())
                .app_data(web::Data::new(state))
                .configure(crate::routes::configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/session/role")
            .set_json(json!({ "role": "admin" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let cookie = resp.response().cookies().next().unwrap().into_owned();

        let req = test::TestRequest::post()
            .uri("/api/admin/journals")
            .cookie(cookie.clone())
            .set_json(journal_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let journal_id = body["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/api/admin/journals/{}/issues", journal_id))
            .cookie(cookie)
            .set_json(json!({ "volume": 1, "number": 1, "year": 2025 }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let data = store.snapshot().unwrap();
        let journal = data.journals.iter().find(|j| j.id == journal_id).unwrap();
        assert_eq!(journal.issn, "1234-567X");
        assert!(data.issues.iter().any(|i| i.journal_id == journal_id));
        assert_eq!(data.logs[0].action, "Create Issue");
        assert_eq!(data.logs[1].action, "Create Journal");
    }

    #[actix_web::test]
    async fn editor_updates_issue_but_invalid_year_is_rejected() {
        let (store, state) = state_with(AiAdapter::new(None));
        let app = test::init_service(
            App::new()
                .wrap(session_middleware())
                .app_data(web::Data::new(state))
                .configure(crate::routes::configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/session/role")
            .set_json(json!({ "role": "editor" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let cookie = resp.response().cookies().next().unwrap().into_owned();

        let req = test::TestRequest::put()
            .uri("/api/admin/journals/j1/issues/i1")
            .cookie(cookie.clone())
            .set_json(json!({ "volume": 12, "number": 2, "year": 1800 }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::put()
            .uri("/api/admin/journals/j1/issues/i1")
            .cookie(cookie)
            .set_json(json!({ "volume": 12, "number": 2, "year": 2024 }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let issue = store.get_issue("j1", "i1").unwrap();
        assert_eq!(issue.number, 2);
        assert!(issue.cover_image.is_some());
    }

    #[actix_web::test]
    async fn author_submits_and_withdraws_own_manuscript() {
        let (store, state) = state_with(AiAdapter::new(None));
        let app = test::init_service(
            App::new()
                .wrap(session_middleware())
                .app_data(web::Data::new(state))
                .configure(crate::routes::configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/session/role")
            .set_json(json!({ "role": "author" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let cookie = resp.response().cookies().next().unwrap().into_owned();

        let manuscript = json!({
            "title": "Borrow Checking in Practice",
            "abstract_text": "A field study.",
            "authors": "Dr. Jane Smith (MIT)",
            "keywords": "rust, ownership",
            "status": "pending",
            "issue_id": "i1"
        });
        let req = test::TestRequest::post()
            .uri("/api/journals/j1/submit")
            .cookie(cookie.clone())
            .set_json(&manuscript)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let article_id = body["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/api/articles/{}/withdraw", article_id))
            .cookie(cookie.clone())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        assert_eq!(
            store.get_article(&article_id).unwrap().status,
            ArticleStatus::Draft
        );

        // a3 is not hers
        let req = test::TestRequest::post()
            .uri("/api/articles/a3/withdraw")
            .cookie(cookie.clone())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let mut published = manuscript.clone();
        published["status"] = json!("published");
        let req = test::TestRequest::put()
            .uri(&format!("/api/submit/{}", article_id))
            .cookie(cookie)
            .set_json(&published)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn article_issue_must_belong_to_the_journal() {
        let (_, state) = state_with(AiAdapter::new(None));
        let app = test::init_service(
            App::new()
                .wrap(session_middleware())
                .app_data(web::Data::new(state))
                .configure(crate::routes::configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/session/role")
            .set_json(json!({ "role": "editor" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let cookie = resp.response().cookies().next().unwrap().into_owned();

        let req = test::TestRequest::post()
            .uri("/api/journals/j2/submit")
            .cookie(cookie)
            .set_json(json!({
                "title": "Misfiled",
                "abstract_text": "Wrong issue.",
                "authors": "Editor John (Science Press)",
                "issue_id": "i1"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn editing_without_a_status_keeps_the_article_published() {
        let (store, state) = state_with(AiAdapter::new(None));
        let app = test::init_service(
            App::new()
                .wrap(session_middleware())
                .app_data(web::Data::new(state))
                .configure(crate::routes::configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/session/role")
            .set_json(json!({ "role": "editor" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let cookie = resp.response().cookies().next().unwrap().into_owned();

        let req = test::TestRequest::put()
            .uri("/api/submit/a1")
            .cookie(cookie)
            .set_json(json!({
                "title": "Transformer Architectures in Low-Resource Languages (revised)",
                "abstract_text": "Corrected abstract.",
                "authors": "Dr. Jane Smith (MIT)",
                "issue_id": "i1"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let article = store.get_article("a1").unwrap();
        assert_eq!(article.status, ArticleStatus::Published);
        assert!(article.title.ends_with("(revised)"));
    }
}
