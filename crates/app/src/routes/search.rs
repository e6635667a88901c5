//! Search route handlers.
//!
//! The main search resolves which bairros are in scope (own bairro,
//! static neighbors, or a radius over the bairro centroids), queries the
//! unified view, and registers the submission. Concurrent searches from
//! the same session may race; the last response wins, which is the
//! accepted behavior for this screen.

use axum::{Json, extract::Query, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use meubairro_core::{Coordinate, FilterTab, SearchMode};

use crate::backend::SearchHit;
use crate::error::{AppError, Result};
use crate::geo::Located;
use crate::middleware::RequireUser;
use crate::search as search_svc;
use crate::search::TrendEntry;
use crate::state::AppState;

/// Query parameters for the unified search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub termo: String,
    /// Radius in km; 0 means "this bairro only, do not expand".
    #[serde(default)]
    pub raio: f64,
    /// Filter tab (`geral` / `promocoes`).
    #[serde(default)]
    pub tipo: Option<String>,
    /// How the search was submitted (`texto` / `voz` / `imagem`).
    #[serde(default)]
    pub modo: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    /// Expand to the static neighbor list when no radius is given.
    #[serde(default)]
    pub vizinhos: bool,
}

/// A search hit with its distance from the user, when both positions are
/// known.
#[derive(Debug, Serialize)]
pub struct SearchHitView {
    #[serde(flatten)]
    pub hit: SearchHit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Hit counts per result type.
#[derive(Debug, Default, Serialize)]
pub struct SearchCounts {
    pub promocoes: usize,
    pub servicos: usize,
    pub produtos: usize,
    pub comercios: usize,
}

/// The unified search response.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub termo: String,
    /// The bairros that were actually searched.
    pub bairros: Vec<String>,
    pub counts: SearchCounts,
    pub results: Vec<SearchHitView>,
}

/// Unified search across promotions, products, and businesses.
#[instrument(skip(state, user), fields(bairro = %user.bairro))]
pub async fn search(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>> {
    let termo = params.termo.trim();
    if termo.is_empty() {
        return Err(AppError::BadRequest("Informe um termo de busca".to_string()));
    }

    let tab = params
        .tipo
        .as_deref()
        .map(FilterTab::parse)
        .unwrap_or_default();
    let modo = params
        .modo
        .as_deref()
        .map(SearchMode::parse)
        .unwrap_or_default();
    let position = match (params.lat, params.lng) {
        (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
        _ => None,
    };

    let bairros = search_svc::neighborhoods_to_search(
        state.backend(),
        &user.bairro,
        position,
        params.raio,
        params.vizinhos,
    )
    .await;

    let hits = search_svc::search_listings(state.backend(), termo, &bairros).await?;

    // Record the submission; a lost row never fails the search
    search_svc::register_search(
        state.backend(),
        Some(user.id),
        &user.bairro,
        termo,
        modo,
        tab,
    )
    .await;

    let mut counts = SearchCounts::default();
    let results: Vec<SearchHitView> = hits
        .into_iter()
        .map(|hit| {
            match hit.tipo.as_str() {
                "promocao" => counts.promocoes += 1,
                "servico" => counts.servicos += 1,
                "produto" => counts.produtos += 1,
                "comercio" => counts.comercios += 1,
                _ => {}
            }
            let distance_km = position
                .filter(Coordinate::is_valid)
                .and_then(|p| hit.coordinate().map(|c| p.distance_km(&c)));
            SearchHitView { hit, distance_km }
        })
        .collect();

    Ok(Json(SearchResults {
        termo: termo.to_string(),
        bairros,
        counts,
        results,
    }))
}

/// Query parameters for the trend panel.
#[derive(Debug, Deserialize)]
pub struct TrendParams {
    #[serde(default = "default_trend_limit")]
    pub limit: usize,
}

const fn default_trend_limit() -> usize {
    10
}

/// Trending search terms in the user's bairro (30-day window).
#[instrument(skip(state, user), fields(bairro = %user.bairro))]
pub async fn trends(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(params): Query<TrendParams>,
) -> Json<Vec<TrendEntry>> {
    Json(search_svc::trending(state.backend(), &user.bairro, params.limit).await)
}

/// Query parameters for the recent-searches panel.
#[derive(Debug, Deserialize)]
pub struct RecentParams {
    #[serde(default = "default_recent_limit")]
    pub limit: u32,
}

const fn default_recent_limit() -> u32 {
    20
}

/// Recent searches in the user's bairro, newest first.
#[instrument(skip(state, user), fields(bairro = %user.bairro))]
pub async fn recent(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(params): Query<RecentParams>,
) -> Json<Vec<crate::backend::SearchRecord>> {
    Json(search_svc::recent_searches(state.backend(), &user.bairro, params.limit).await)
}

/// Query parameters for the user's own history.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default = "default_history_limit")]
    pub limit: u32,
}

const fn default_history_limit() -> u32 {
    5
}

/// The user's own latest searches in their bairro.
#[instrument(skip(state, user), fields(bairro = %user.bairro))]
pub async fn history(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(params): Query<HistoryParams>,
) -> Json<Vec<crate::backend::SearchRecord>> {
    let tab = params.tipo.as_deref().map(FilterTab::parse);
    Json(
        search_svc::search_history(
            state.backend(),
            user.id,
            &user.bairro,
            tab,
            params.limit,
        )
        .await,
    )
}
