use actix_session::Session;
use actix_web::{get, post, web, HttpResponse};
use log::info;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{
    allowed_actions,
    session::{auth_context, current_role, store_role},
};
use crate::errors::PortalError;
use crate::models::user::Role;
use crate::routes::AppState;
use crate::search::directory::articles_by_author;

#[derive(Deserialize)]
pub struct RoleSwitch {
    pub role: Role,
}

#[get("/api/session/role")]
pub async fn current_role_handler(session: Session) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "role": current_role(&session) }))
}

/// Demo role selector. Anyone may pick any role; nothing is authenticated.
#[post("/api/session/role")]
pub async fn switch_role_handler(
    session: Session,
    body: web::Json<RoleSwitch>,
) -> Result<HttpResponse, PortalError> {
    let role = body.into_inner().role;
    store_role(&session, role)?;
    info!("Demo role switched to {}", role);
    Ok(HttpResponse::Ok().json(json!({ "role": role })))
}

#[get("/api/profile")]
pub async fn profile_handler(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, PortalError> {
    let ctx = auth_context(&session, state.repository.as_ref())?;
    let data = state.repository.snapshot()?;

    let user = match &ctx.user_id {
        Some(id) => Some(state.repository.get_user(id)?),
        None => None,
    };
    let articles = ctx
        .user_name
        .as_deref()
        .map(|name| articles_by_author(&data.articles, name))
        .unwrap_or_default();
    // editors look after the first two journals in this demo
    let managed_journals = if ctx.role == Role::Editor {
        data.journals.iter().take(2).cloned().collect::<Vec<_>>()
    } else {
        Vec::new()
    };

    Ok(HttpResponse::Ok().json(json!({
        "role": ctx.role,
        "user": user,
        "articles": articles,
        "managed_journals": managed_journals,
        "allowed_actions": allowed_actions(&ctx, None),
    })))
}
