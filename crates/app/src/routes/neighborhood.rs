//! Neighborhood screen route handlers.
//!
//! Panels fail soft: if the backend is unavailable the section renders
//! empty, it never errors the whole screen.

use axum::{Json, extract::Query, extract::State};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tower_sessions::Session;
use tracing::instrument;

use meubairro_core::Coordinate;

use crate::backend::{Ambulante, Banner, Publication, QuerySpec};
use crate::error::Result;
use crate::geo::UNKNOWN_NEIGHBORHOOD;
use crate::middleware::{OptionalUser, RequireUser, set_current_user};
use crate::state::AppState;

/// Fetch rows, degrading to an empty panel on backend failure.
async fn fetch_or_empty<T: DeserializeOwned>(
    state: &AppState,
    spec: &QuerySpec,
    panel: &str,
) -> Vec<T> {
    match state.backend().fetch(spec).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(error = %e, panel, "Panel fetch failed, rendering empty");
            Vec::new()
        }
    }
}

/// Query parameters for bairro resolution.
#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    pub lat: f64,
    pub lng: f64,
}

/// The resolved bairro.
#[derive(Debug, Serialize)]
pub struct ResolvedNeighborhood {
    pub bairro: String,
}

/// Reverse-geocode the user's position to a bairro.
///
/// When a user is logged in and the resolved bairro differs from the
/// session's, the session user is replaced with the new bairro
/// (last-write-wins: a stale geolocation response that lands late simply
/// overwrites, which is the accepted behavior).
#[instrument(skip(state, session, user))]
pub async fn resolve(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Query(params): Query<ResolveParams>,
) -> Result<Json<ResolvedNeighborhood>> {
    let bairro = state
        .geocoder()
        .resolve_neighborhood(Coordinate::new(params.lat, params.lng))
        .await;

    if bairro != UNKNOWN_NEIGHBORHOOD
        && let Some(mut user) = user
        && user.bairro != bairro
    {
        user.bairro = bairro.clone();
        set_current_user(&session, &user).await?;
        tracing::info!(user_id = %user.id, bairro = %bairro, "Session bairro refreshed");
    }

    Ok(Json(ResolvedNeighborhood { bairro }))
}

/// Active public-organ announcements targeted at the user's bairro.
#[instrument(skip(state, user), fields(bairro = %user.bairro))]
pub async fn publications(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Json<Vec<Publication>> {
    let spec = QuerySpec::from_collection("publicacoes")
        .select(
            "id,titulo,mensagem,data_publicacao,ativo,bairro_destino,data_inicio,data_fim,\
             orgaos_publicadores(id,nome_orgao,tipo_orgao,status_orgao)",
        )
        .eq("ativo", "true")
        .eq("bairro_destino", &user.bairro)
        .order_desc("data_publicacao");

    Json(fetch_or_empty(&state, &spec, "publications").await)
}

/// Active itinerant vendors in the user's bairro.
#[instrument(skip(state, user), fields(bairro = %user.bairro))]
pub async fn ambulantes(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Json<Vec<Ambulante>> {
    let spec = QuerySpec::from_collection("ambulantes")
        .eq("ativo", "true")
        .eq("bairro_destino", &user.bairro);

    Json(fetch_or_empty(&state, &spec, "ambulantes").await)
}

/// Query parameters for the promotions panel.
#[derive(Debug, Deserialize)]
pub struct PromotionParams {
    /// Optional term to match against title or description.
    #[serde(default)]
    pub termo: Option<String>,
}

/// Promotion banners for the user's bairro, optionally narrowed by a term.
#[instrument(skip(state, user), fields(bairro = %user.bairro))]
pub async fn promotions(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(params): Query<PromotionParams>,
) -> Json<Vec<Banner>> {
    if let Some(termo) = params.termo.as_deref().filter(|t| !t.trim().is_empty()) {
        let banners = crate::search::search_promotions(state.backend(), &user.bairro, termo)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Promotion search failed, rendering empty");
                Vec::new()
            });
        return Json(banners);
    }

    let spec = QuerySpec::from_collection("banners").eq("bairro", &user.bairro);
    Json(fetch_or_empty(&state, &spec, "promotions").await)
}
