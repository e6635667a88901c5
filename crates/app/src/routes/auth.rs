//! Authentication route handlers.
//!
//! Login is a plain row lookup against `usuarios` - the backend owns the
//! accounts, this service only establishes the session context.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::backend::{self, QuerySpec};
use crate::error::{AppError, Result};
use crate::middleware::{OptionalUser, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub telefone: String,
}

/// Handle login.
///
/// Looks up the user by email + telefone and stores the match in the
/// session. An unknown pair is a 401, not an enumeration oracle.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<CurrentUser>> {
    let email = form.email.trim();
    let telefone = form.telefone.trim();
    if email.is_empty() || telefone.is_empty() {
        return Err(AppError::BadRequest(
            "Preencha e-mail e telefone".to_string(),
        ));
    }

    let spec = QuerySpec::from_collection("usuarios")
        .select("id,nome,email,telefone,bairro,cidade")
        .eq("email", email)
        .eq("telefone", telefone)
        .limit(1);

    let user: Option<backend::User> = state.backend().fetch_optional(&spec).await?;
    let Some(user) = user else {
        return Err(AppError::Unauthorized(
            "E-mail ou telefone inválido".to_string(),
        ));
    };

    let current = CurrentUser::from(user);
    set_current_user(&session, &current).await?;

    tracing::info!(user_id = %current.id, "User logged in");
    Ok(Json(current))
}

/// Handle logout: drop the session user.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Return the current session user, if any.
pub async fn me(OptionalUser(user): OptionalUser) -> Json<Option<CurrentUser>> {
    Json(user)
}
