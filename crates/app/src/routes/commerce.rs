//! Commerce page route handlers.
//!
//! Likes, follows, ratings, and comments are plain rows the backend owns;
//! the handlers here only toggle/insert them and echo the visible state
//! back.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use meubairro_core::CommerceId;

use crate::backend::{
    Comment, Commerce, NewComment, NewEdge, NewRating, Product, QuerySpec, Rating, RowId,
};
use crate::error::{AppError, Result};
use crate::middleware::{OptionalUser, RequireUser};
use crate::models::CurrentUser;
use crate::search::matches_term;
use crate::state::AppState;

/// Business details.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<CommerceId>,
) -> Result<Json<Commerce>> {
    let spec = QuerySpec::from_collection("comercios")
        .eq("id", id.to_string())
        .limit(1);
    let commerce: Commerce = state.backend().fetch_one(&spec).await?;
    Ok(Json(commerce))
}

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ProductParams {
    /// Optional term to narrow the listing, matched client-side.
    #[serde(default)]
    pub termo: Option<String>,
}

/// Products published by a business, optionally narrowed by a term.
#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    Path(id): Path<CommerceId>,
    Query(params): Query<ProductParams>,
) -> Result<Json<Vec<Product>>> {
    let spec = QuerySpec::from_collection("produtos_comercios")
        .select("id,nome,descricao,preco,imagem_url,curtidas")
        .eq("commerce_id", id.to_string());
    let mut rows: Vec<Product> = state.backend().fetch(&spec).await?;

    if let Some(termo) = params.termo.as_deref() {
        rows.retain(|p| {
            matches_term(&p.nome, termo)
                || p.descricao.as_deref().is_some_and(|d| matches_term(d, termo))
        });
    }

    Ok(Json(rows))
}

/// Comments on a business, newest first.
#[instrument(skip(state))]
pub async fn comments(
    State(state): State<AppState>,
    Path(id): Path<CommerceId>,
) -> Result<Json<Vec<Comment>>> {
    let spec = QuerySpec::from_collection("comentarios_comercio")
        .eq("comercio_id", id.to_string())
        .order_desc("data_comentario");
    let rows: Vec<Comment> = state.backend().fetch(&spec).await?;
    Ok(Json(rows))
}

/// Comment form data.
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub comentario: String,
}

/// Leave a comment on a business.
#[instrument(skip(state, user, form))]
pub async fn create_comment(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<CommerceId>,
    Json(form): Json<CommentForm>,
) -> Result<StatusCode> {
    let comentario = form.comentario.trim();
    if comentario.is_empty() {
        return Err(AppError::BadRequest("Comentário vazio".to_string()));
    }

    let row = NewComment {
        user_id: user.id,
        comercio_id: id,
        comentario: comentario.to_string(),
    };
    state.backend().insert("comentarios_comercio", &row).await?;
    Ok(StatusCode::CREATED)
}

/// Whether the user already has an edge row in the given collection.
async fn edge_exists(
    state: &AppState,
    collection: &str,
    user: &CurrentUser,
    commerce_id: CommerceId,
) -> Result<bool> {
    let spec = QuerySpec::from_collection(collection)
        .select("id")
        .eq("user_id", user.id.to_string())
        .eq("comercio_id", commerce_id.to_string())
        .limit(1);
    let existing: Option<RowId> = state.backend().fetch_optional(&spec).await?;
    Ok(existing.is_some())
}

/// Toggle an edge row (like / follow): delete it if present, insert it
/// otherwise. Returns whether the edge now exists.
async fn toggle_edge(
    state: &AppState,
    collection: &str,
    user: &CurrentUser,
    commerce_id: CommerceId,
) -> Result<bool> {
    if edge_exists(state, collection, user, commerce_id).await? {
        let spec = QuerySpec::from_collection(collection)
            .eq("user_id", user.id.to_string())
            .eq("comercio_id", commerce_id.to_string());
        state.backend().delete(&spec).await?;
        Ok(false)
    } else {
        let row = NewEdge {
            user_id: user.id,
            comercio_id: commerce_id,
        };
        state.backend().insert(collection, &row).await?;
        Ok(true)
    }
}

/// Like toggle response.
#[derive(Debug, Serialize)]
pub struct LikeState {
    pub liked: bool,
}

/// Toggle the user's like on a business.
#[instrument(skip(state, user))]
pub async fn toggle_like(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<CommerceId>,
) -> Result<Json<LikeState>> {
    let liked = toggle_edge(&state, "curtidas_comercio", &user, id).await?;
    Ok(Json(LikeState { liked }))
}

/// Follow toggle response.
#[derive(Debug, Serialize)]
pub struct FollowState {
    pub following: bool,
    pub followers: u64,
}

/// Toggle the user's follow on a business.
#[instrument(skip(state, user))]
pub async fn toggle_follow(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<CommerceId>,
) -> Result<Json<FollowState>> {
    let following = toggle_edge(&state, "seguidores_comercio", &user, id).await?;
    let followers = follower_count(&state, id).await?;
    Ok(Json(FollowState {
        following,
        followers,
    }))
}

async fn follower_count(state: &AppState, commerce_id: CommerceId) -> Result<u64> {
    let spec = QuerySpec::from_collection("seguidores_comercio")
        .select("id")
        .eq("comercio_id", commerce_id.to_string());
    Ok(state.backend().count(&spec).await?)
}

/// Follower count response.
#[derive(Debug, Serialize)]
pub struct FollowerCount {
    pub followers: u64,
}

/// Follower count for a business.
#[instrument(skip(state))]
pub async fn followers(
    State(state): State<AppState>,
    Path(id): Path<CommerceId>,
) -> Result<Json<FollowerCount>> {
    let followers = follower_count(&state, id).await?;
    Ok(Json(FollowerCount { followers }))
}

/// Rating summary response.
#[derive(Debug, Serialize)]
pub struct RatingSummary {
    pub media: f64,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minha_nota: Option<i32>,
}

/// Average of the given grades, 0.0 when there are none.
fn average_rating(notas: &[i32]) -> f64 {
    if notas.is_empty() {
        return 0.0;
    }
    let total: i32 = notas.iter().sum();
    #[allow(clippy::cast_precision_loss)] // Grade counts stay tiny
    let count = notas.len() as f64;
    f64::from(total) / count
}

async fn rating_summary(
    state: &AppState,
    commerce_id: CommerceId,
    user: Option<&CurrentUser>,
) -> Result<RatingSummary> {
    let spec = QuerySpec::from_collection("avaliacoes_comercios")
        .select("nota")
        .eq("commerce_id", commerce_id.to_string());
    let rows: Vec<Rating> = state.backend().fetch(&spec).await?;
    let notas: Vec<i32> = rows.into_iter().map(|r| r.nota).collect();

    let minha_nota = match user {
        Some(user) => {
            let spec = QuerySpec::from_collection("avaliacoes_comercios")
                .select("nota")
                .eq("user_id", user.id.to_string())
                .eq("commerce_id", commerce_id.to_string())
                .limit(1);
            state
                .backend()
                .fetch_optional::<Rating>(&spec)
                .await?
                .map(|r| r.nota)
        }
        None => None,
    };

    Ok(RatingSummary {
        media: average_rating(&notas),
        total: notas.len(),
        minha_nota,
    })
}

/// Rating summary for a business (plus the user's own grade, if logged in).
#[instrument(skip(state, user))]
pub async fn rating(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<CommerceId>,
) -> Result<Json<RatingSummary>> {
    Ok(Json(rating_summary(&state, id, user.as_ref()).await?))
}

/// Rating form data.
#[derive(Debug, Deserialize)]
pub struct RatingForm {
    pub nota: i32,
}

/// Rate a business 1-5; re-rating updates the existing row.
#[instrument(skip(state, user))]
pub async fn rate(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<CommerceId>,
    Json(form): Json<RatingForm>,
) -> Result<Json<RatingSummary>> {
    if !(1..=5).contains(&form.nota) {
        return Err(AppError::BadRequest("Nota deve ser de 1 a 5".to_string()));
    }

    let existing_spec = QuerySpec::from_collection("avaliacoes_comercios")
        .select("id")
        .eq("user_id", user.id.to_string())
        .eq("commerce_id", id.to_string())
        .limit(1);
    let existing: Option<RowId> = state.backend().fetch_optional(&existing_spec).await?;

    if let Some(row) = existing {
        let spec = QuerySpec::from_collection("avaliacoes_comercios").eq("id", row.id.to_string());
        state
            .backend()
            .update(&spec, &serde_json::json!({ "nota": form.nota }))
            .await?;
    } else {
        let row = NewRating {
            user_id: user.id,
            commerce_id: id,
            nota: form.nota,
        };
        state.backend().insert("avaliacoes_comercios", &row).await?;
    }

    Ok(Json(rating_summary(&state, id, Some(&user)).await?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_average_rating_empty_is_zero() {
        assert!((average_rating(&[]) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_rating() {
        assert!((average_rating(&[5, 4, 3]) - 4.0).abs() < f64::EPSILON);
        assert!((average_rating(&[1]) - 1.0).abs() < f64::EPSILON);
    }
}
