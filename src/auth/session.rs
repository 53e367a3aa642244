use actix_session::Session;
use log::warn;

use crate::auth::AuthContext;
use crate::db::repository::CatalogRepository;
use crate::errors::PortalError;
use crate::models::user::Role;

const ROLE_KEY: &str = "role";

/// Role picked by the demo selector; guests when nothing was picked.
pub fn current_role(session: &Session) -> Role {
    match session.get::<Role>(ROLE_KEY) {
        Ok(Some(role)) => role,
        Ok(None) => Role::Guest,
        Err(e) => {
            warn!("Unreadable role in session, falling back to guest: {}", e);
            Role::Guest
        }
    }
}

/// Builds the context handed to the role gate for this request.
pub fn auth_context(
    session: &Session,
    repository: &dyn CatalogRepository,
) -> Result<AuthContext, PortalError> {
    let role = current_role(session);
    let user = repository.user_for_role(role)?;
    Ok(AuthContext::new(role, user.as_ref()))
}

pub fn store_role(session: &Session, role: Role) -> Result<(), PortalError> {
    session
        .insert(ROLE_KEY, role)
        .map_err(|e| PortalError::SessionError(format!("Session insert error: {}", e)))?;
    session.renew();
    Ok(())
}
