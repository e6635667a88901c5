//! Search registration, history, and trend aggregation.
//!
//! Trends are never persisted: the backend hands back the raw search rows
//! for a bairro and a rolling 30-day window, and the ranking is a single
//! in-memory pass. Every fetch here fails soft - a backend hiccup renders
//! an empty panel, not an error page.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use meubairro_core::{Coordinate, FilterTab, SearchMode, UserId};

use crate::backend::{
    Banner, BackendError, Client, Filter, Neighborhood, NewSearchRecord, QuerySpec, SearchHit,
    SearchRecord,
};
use crate::geo::{neighbors_of, within_radius};

/// Rolling window for trend aggregation.
pub const TREND_WINDOW_DAYS: i64 = 30;

/// A ranked search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendEntry {
    pub termo: String,
    pub count: u64,
}

/// Normalize a search term the way it is stored: lower-cased and trimmed.
#[must_use]
pub fn normalize_term(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Group terms case/whitespace-insensitively, count, rank descending,
/// truncate to `limit`.
///
/// Tie order between equal counts is implementation-defined.
#[must_use]
pub fn rank_trends<I, S>(terms: I, limit: usize) -> Vec<TrendEntry>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts = std::collections::HashMap::new();
    for term in terms {
        let termo = normalize_term(term.as_ref());
        if termo.is_empty() {
            continue;
        }
        *counts.entry(termo).or_insert(0_u64) += 1;
    }

    let mut trends: Vec<TrendEntry> = counts
        .into_iter()
        .map(|(termo, count)| TrendEntry { termo, count })
        .collect();
    trends.sort_unstable_by(|a, b| b.count.cmp(&a.count));
    trends.truncate(limit);
    trends
}

/// Case/whitespace-insensitive substring match, for narrowing lists that
/// were already fetched.
#[must_use]
pub fn matches_term(haystack: &str, term: &str) -> bool {
    let needle = normalize_term(term);
    needle.is_empty() || haystack.to_lowercase().contains(&needle)
}

/// Projection used by the trend fetch.
#[derive(Debug, Deserialize)]
struct TermRow {
    search_text: String,
}

/// Trending terms for a bairro over the last [`TREND_WINDOW_DAYS`] days.
///
/// Returns an empty list if the fetch fails.
#[instrument(skip(backend))]
pub async fn trending(backend: &Client, bairro: &str, limit: usize) -> Vec<TrendEntry> {
    let window_start = Utc::now() - chrono::Duration::days(TREND_WINDOW_DAYS);
    let spec = QuerySpec::from_collection("pesquisas_usuarios")
        .select("search_text")
        .eq("bairro_usuario", bairro)
        .gte("created_at", window_start.to_rfc3339())
        .order_desc("created_at");

    match backend.fetch::<TermRow>(&spec).await {
        Ok(rows) => rank_trends(rows.iter().map(|r| r.search_text.as_str()), limit),
        Err(e) => {
            tracing::warn!(error = %e, bairro, "Failed to fetch search trends");
            Vec::new()
        }
    }
}

/// Most recent searches in a bairro, newest first.
///
/// Returns an empty list if the fetch fails.
#[instrument(skip(backend))]
pub async fn recent_searches(backend: &Client, bairro: &str, limit: u32) -> Vec<SearchRecord> {
    let spec = QuerySpec::from_collection("pesquisas_usuarios")
        .eq("bairro_usuario", bairro)
        .order_desc("created_at")
        .limit(limit);

    match backend.fetch(&spec).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(error = %e, bairro, "Failed to fetch recent searches");
            Vec::new()
        }
    }
}

/// A user's own latest searches in a bairro, optionally per filter tab.
///
/// Returns an empty list if the fetch fails.
#[instrument(skip(backend))]
pub async fn search_history(
    backend: &Client,
    user_id: UserId,
    bairro: &str,
    tab: Option<FilterTab>,
    limit: u32,
) -> Vec<SearchRecord> {
    let mut spec = QuerySpec::from_collection("pesquisas_usuarios")
        .eq("user_id", user_id.to_string())
        .eq("bairro_usuario", bairro)
        .order_desc("created_at")
        .limit(limit);
    if let Some(tab) = tab {
        spec = spec.eq("tipo_filtro", tab.as_str());
    }

    match backend.fetch(&spec).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(error = %e, bairro, "Failed to fetch search history");
            Vec::new()
        }
    }
}

/// Record a submitted search. Fire-and-forget: failures are logged and
/// swallowed, a lost row never blocks the search itself.
#[instrument(skip(backend))]
pub async fn register_search(
    backend: &Client,
    user_id: Option<UserId>,
    bairro: &str,
    termo: &str,
    tipo_busca: SearchMode,
    tipo_filtro: FilterTab,
) {
    let search_text = normalize_term(termo);
    if bairro.is_empty() || search_text.is_empty() {
        return;
    }

    let record = NewSearchRecord {
        user_id,
        bairro_usuario: bairro.to_string(),
        search_text,
        tipo_busca,
        tipo_filtro,
    };

    if let Err(e) = backend.insert("pesquisas_usuarios", &record).await {
        tracing::warn!(error = %e, "Failed to register search");
    }
}

/// Resolve which bairros a search should cover.
///
/// - `radius_km > 0` with a known position expands to every bairro whose
///   centroid is within range (the zero radius is a "do not expand"
///   sentinel and takes the branch below instead);
/// - otherwise, neighbor expansion adds the static adjacency list;
/// - otherwise the user's own bairro, alone.
///
/// Names come back normalized the way the search view stores them. If the
/// bairro fetch fails the scope degrades to the user's own bairro.
#[instrument(skip(backend))]
pub async fn neighborhoods_to_search(
    backend: &Client,
    bairro: &str,
    position: Option<Coordinate>,
    radius_km: f64,
    include_neighbors: bool,
) -> Vec<String> {
    let own = normalize_term(bairro);

    if radius_km > 0.0 {
        if let Some(origin) = position.filter(Coordinate::is_valid) {
            let spec = QuerySpec::from_collection("bairros");
            match backend.fetch::<Neighborhood>(&spec).await {
                Ok(rows) => {
                    return within_radius(origin, rows, radius_km)
                        .into_iter()
                        .map(|b| normalize_term(&b.nome))
                        .collect();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to fetch bairros for radius search");
                    return vec![own];
                }
            }
        }
    }

    if include_neighbors {
        let mut bairros = vec![own];
        bairros.extend(neighbors_of(bairro).iter().map(|b| normalize_term(b)));
        return bairros;
    }

    vec![own]
}

/// Query the unified search view for a term across the given bairros.
///
/// # Errors
///
/// Propagates backend failures; the caller owns the error response here
/// because the result IS the page.
#[instrument(skip(backend))]
pub async fn search_listings(
    backend: &Client,
    termo: &str,
    bairros: &[String],
) -> Result<Vec<SearchHit>, BackendError> {
    let spec = QuerySpec::from_collection("vw_search_geral")
        .ilike_contains("texto_unificado", &normalize_term(termo))
        .is_in("bairro", bairros.to_vec());
    backend.fetch(&spec).await
}

/// Promotion banners in a bairro matching a term in title or description.
///
/// # Errors
///
/// Propagates backend failures.
#[instrument(skip(backend))]
pub async fn search_promotions(
    backend: &Client,
    bairro: &str,
    termo: &str,
) -> Result<Vec<Banner>, BackendError> {
    let pattern = format!("*{}*", normalize_term(termo));
    let spec = QuerySpec::from_collection("banners").eq("bairro", bairro).or(vec![
        Filter::ILike("titulo".to_string(), pattern.clone()),
        Filter::ILike("descricao".to_string(), pattern),
    ]);
    backend.fetch(&spec).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_trends_groups_case_and_whitespace() {
        let trends = rank_trends(["pão", "PÃO ", "leite"], 10);
        assert_eq!(trends.len(), 2);
        assert_eq!(trends.first().unwrap().termo, "pão");
        assert_eq!(trends.first().unwrap().count, 2);
        assert_eq!(trends.get(1).unwrap().termo, "leite");
        assert_eq!(trends.get(1).unwrap().count, 1);
    }

    #[test]
    fn test_rank_trends_empty_input() {
        let trends = rank_trends(Vec::<&str>::new(), 10);
        assert!(trends.is_empty());
    }

    #[test]
    fn test_rank_trends_truncates_to_limit() {
        let terms = ["a", "a", "a", "b", "b", "c", "d"];
        let trends = rank_trends(terms, 2);
        assert_eq!(trends.len(), 2);
        assert_eq!(trends.first().unwrap().termo, "a");
        assert_eq!(trends.get(1).unwrap().termo, "b");
    }

    #[test]
    fn test_rank_trends_skips_blank_terms() {
        let trends = rank_trends(["  ", "", "café"], 10);
        assert_eq!(trends.len(), 1);
        assert_eq!(trends.first().unwrap().termo, "café");
    }

    #[test]
    fn test_normalize_term() {
        assert_eq!(normalize_term("  PÃO Francês  "), "pão francês");
        assert_eq!(normalize_term(""), "");
    }

    fn offline_client() -> Client {
        use secrecy::SecretString;

        // Never dialed by the zero-radius branches under test.
        Client::new(&crate::config::BackendConfig {
            base_url: "http://127.0.0.1:0".to_string(),
            service_key: SecretString::from("test-key"),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_zero_radius_stays_in_own_bairro() {
        let backend = offline_client();
        let position = Some(Coordinate::new(-29.7156, -52.4297));

        // Radius 0 is the "do not expand" sentinel: no backend call, no
        // distance filtering, just the user's own bairro.
        let bairros = neighborhoods_to_search(&backend, "Esmeralda", position, 0.0, false).await;
        assert_eq!(bairros, vec!["esmeralda".to_string()]);
    }

    #[tokio::test]
    async fn test_neighbor_expansion_uses_static_table() {
        let backend = offline_client();
        let bairros = neighborhoods_to_search(&backend, "Esmeralda", None, 0.0, true).await;
        assert_eq!(
            bairros,
            vec![
                "esmeralda".to_string(),
                "linha santa cruz".to_string(),
                "universitário".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_radius_without_position_does_not_expand() {
        let backend = offline_client();
        let bairros = neighborhoods_to_search(&backend, "Centro", None, 5.0, false).await;
        assert_eq!(bairros, vec!["centro".to_string()]);
    }

    #[tokio::test]
    async fn test_radius_search_degrades_to_own_bairro_on_backend_failure() {
        let backend = offline_client();
        let position = Some(Coordinate::new(-29.7156, -52.4297));
        let bairros = neighborhoods_to_search(&backend, "Centro", position, 5.0, false).await;
        assert_eq!(bairros, vec!["centro".to_string()]);
    }

    #[test]
    fn test_matches_term() {
        assert!(matches_term("Padaria do Bairro", "padaria"));
        assert!(matches_term("Padaria do Bairro", "  BAIRRO "));
        assert!(!matches_term("Padaria do Bairro", "farmácia"));
        // Empty term matches everything (no narrowing)
        assert!(matches_term("qualquer coisa", "   "));
    }
}
