use actix_session::Session;
use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{session::auth_context, Action};
use crate::db::repository::ResourceKind;
use crate::errors::PortalError;
use crate::models::{
    response::MutationResponse,
    user::{Role, UserForm},
};
use crate::routes::{record, require, AppState};
use crate::search::directory::{filter_logs, filter_users};
use crate::utils;

#[derive(Deserialize)]
pub struct UserQueryParams {
    pub q: Option<String>,
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct LogQueryParams {
    pub q: Option<String>,
}

// "All" and unknown values mean no role restriction
fn parse_role(raw: Option<&str>) -> Option<Role> {
    raw.and_then(|r| serde_json::from_value(json!(r.to_lowercase())).ok())
}

#[get("/api/admin/users")]
pub async fn list_users_handler(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<UserQueryParams>,
) -> Result<HttpResponse, PortalError> {
    let ctx = auth_context(&session, state.repository.as_ref())?;
    require(&ctx, Action::ManageUsers, None)?;
    let data = state.repository.snapshot()?;

    let term = query.q.as_deref().unwrap_or("");
    let users = filter_users(&data.users, term, parse_role(query.role.as_deref()));
    Ok(HttpResponse::Ok().json(json!({ "users": users, "total": users.len() })))
}

#[post("/api/admin/users")]
pub async fn create_user_handler(
    state: web::Data<AppState>,
    session: Session,
    form: web::Json<UserForm>,
) -> Result<HttpResponse, PortalError> {
    let ctx = auth_context(&session, state.repository.as_ref())?;
    require(&ctx, Action::ManageUsers, None)?;

    let form = form.into_inner();
    form.validate()?;
    let user = form.into_user(utils::new_id("u"), None);
    let id = user.id.clone();
    let details = format!("Created user \"{}\" as {}", user.name, user.role);
    state.repository.save_user(user)?;
    record(&state, &ctx, "Create User", details)?;

    Ok(HttpResponse::Created().json(MutationResponse::ok(id, "User created successfully")))
}

#[put("/api/admin/users/{user_id}")]
pub async fn update_user_handler(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Json<UserForm>,
) -> Result<HttpResponse, PortalError> {
    let user_id = path.into_inner();
    let ctx = auth_context(&session, state.repository.as_ref())?;
    require(&ctx, Action::ManageUsers, None)?;

    let previous = state.repository.get_user(&user_id)?;
    let form = form.into_inner();
    form.validate()?;
    let user = form.into_user(user_id.clone(), Some(&previous));
    let details = format!("Updated user \"{}\"", user.name);
    state.repository.save_user(user)?;
    record(&state, &ctx, "Update User", details)?;

    Ok(HttpResponse::Ok().json(MutationResponse::ok(user_id, "User updated successfully")))
}

#[delete("/api/admin/users/{user_id}")]
pub async fn delete_user_handler(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, PortalError> {
    let user_id = path.into_inner();
    let ctx = auth_context(&session, state.repository.as_ref())?;
    require(&ctx, Action::DeleteUser, None)?;

    let user = state.repository.get_user(&user_id)?;
    state.repository.delete(ResourceKind::User, &user_id)?;
    record(&state, &ctx, "Delete User", format!("Deleted user \"{}\"", user.name))?;

    Ok(HttpResponse::Ok().json(MutationResponse::ok(user_id, "User deleted successfully")))
}

#[get("/api/admin/logs")]
pub async fn logs_handler(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<LogQueryParams>,
) -> Result<HttpResponse, PortalError> {
    let ctx = auth_context(&session, state.repository.as_ref())?;
    require(&ctx, Action::ViewLogs, None)?;
    let data = state.repository.snapshot()?;

    let logs = filter_logs(&data.logs, query.q.as_deref().unwrap_or(""));
    Ok(HttpResponse::Ok().json(json!({ "logs": logs, "total": logs.len() })))
}
