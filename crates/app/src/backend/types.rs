//! Typed rows for the backend collections.
//!
//! Field names mirror the backend's Portuguese column names; the structs
//! carry no invariants beyond what the routes display.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use meubairro_core::{
    AmbulanteId, CommentId, CommerceId, Coordinate, FilterTab, OrganId, Price, ProductId,
    PublicationId, SearchMode, UserId,
};

use crate::geo::Located;

/// A registered user (`usuarios`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub bairro: String,
    pub cidade: String,
}

/// A neighborhood row (`bairros`) with its optional centroid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neighborhood {
    pub nome: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Located for Neighborhood {
    fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        }
    }
}

/// A stored search submission (`pesquisas_usuarios`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRecord {
    pub id: Uuid,
    pub user_id: Option<UserId>,
    pub bairro_usuario: String,
    pub search_text: String,
    #[serde(default)]
    pub tipo_busca: Option<SearchMode>,
    #[serde(default)]
    pub tipo_filtro: Option<FilterTab>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a search submission.
#[derive(Debug, Clone, Serialize)]
pub struct NewSearchRecord {
    pub user_id: Option<UserId>,
    pub bairro_usuario: String,
    pub search_text: String,
    pub tipo_busca: SearchMode,
    pub tipo_filtro: FilterTab,
}

/// A row of the unified search view (`vw_search_geral`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id_registro: Uuid,
    /// One of `promocao`, `servico`, `produto`, `comercio`.
    pub tipo: String,
    pub nome_item: String,
    pub texto_unificado: String,
    #[serde(default)]
    pub bairro: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl Located for SearchHit {
    fn coordinate(&self) -> Option<Coordinate> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        }
    }
}

/// A business (`comercios`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commerce {
    pub id: CommerceId,
    pub nome_razao_social: String,
    #[serde(default)]
    pub proprietario: Option<String>,
    pub endereco: String,
    pub bairro: String,
    #[serde(default)]
    pub cidade: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub plano: Option<String>,
}

/// A product published by a business (`produtos_comercios`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
    pub preco: Price,
    #[serde(default)]
    pub imagem_url: Option<String>,
    #[serde(default)]
    pub curtidas: Option<i64>,
}

/// A promotion banner shown on the neighborhood screen (`banners`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Banner {
    pub id: Uuid,
    pub titulo: String,
    #[serde(default)]
    pub descricao: Option<String>,
    pub bairro: String,
    #[serde(default)]
    pub imagem_url: Option<String>,
}

/// Insert payload for a vendor-published offer (`promocoes`).
#[derive(Debug, Clone, Serialize)]
pub struct NewPromotion {
    pub titulo: String,
    pub descricao: String,
    pub imagem_url: String,
    pub desconto: i32,
    pub data_validade: NaiveDate,
    pub comercio_id: CommerceId,
}

/// A publishing public organ (`orgaos_publicadores`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organ {
    pub id: OrganId,
    pub nome_orgao: String,
    #[serde(default)]
    pub tipo_orgao: Option<String>,
    #[serde(default)]
    pub status_orgao: Option<String>,
}

/// An announcement from a public organ (`publicacoes`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
    pub id: PublicationId,
    pub titulo: String,
    pub mensagem: String,
    pub data_publicacao: DateTime<Utc>,
    pub ativo: bool,
    pub bairro_destino: String,
    #[serde(default)]
    pub data_inicio: Option<NaiveDate>,
    #[serde(default)]
    pub data_fim: Option<NaiveDate>,
    #[serde(default)]
    pub orgaos_publicadores: Option<Organ>,
}

/// An itinerant vendor (`ambulantes`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ambulante {
    pub id: AmbulanteId,
    pub nome: String,
    pub produto: String,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub dias_semana: Option<String>,
    #[serde(default)]
    pub horarios: Option<String>,
    pub bairro_destino: String,
    #[serde(default)]
    pub foto_url: Option<String>,
    pub ativo: bool,
}

/// A comment on a business (`comentarios_comercio`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub user_id: UserId,
    pub comentario: String,
    pub data_comentario: DateTime<Utc>,
}

/// Insert payload for a comment.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub user_id: UserId,
    pub comercio_id: CommerceId,
    pub comentario: String,
}

/// Insert payload for a like / follow edge.
#[derive(Debug, Clone, Serialize)]
pub struct NewEdge {
    pub user_id: UserId,
    pub comercio_id: CommerceId,
}

/// A rating row (`avaliacoes_comercios`), as fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub nota: i32,
}

/// Insert payload for a rating.
#[derive(Debug, Clone, Serialize)]
pub struct NewRating {
    pub user_id: UserId,
    pub commerce_id: CommerceId,
    pub nota: i32,
}

/// Minimal projection used for existence checks.
#[derive(Debug, Clone, Deserialize)]
pub struct RowId {
    pub id: Uuid,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_neighborhood_coordinate_requires_both_axes() {
        let full = Neighborhood {
            nome: "Esmeralda".to_string(),
            latitude: Some(-29.70),
            longitude: Some(-52.43),
        };
        assert!(full.coordinate().is_some());

        let partial = Neighborhood {
            nome: "Centro".to_string(),
            latitude: Some(-29.70),
            longitude: None,
        };
        assert!(partial.coordinate().is_none());
    }

    #[test]
    fn test_search_record_parses_backend_row() {
        let json = r#"{
            "id": "4b54e2a0-6a43-4d3a-8f91-54f2c7a8f001",
            "user_id": null,
            "bairro_usuario": "universitário",
            "search_text": "pão francês",
            "tipo_busca": "voz",
            "created_at": "2026-08-01T12:30:00Z"
        }"#;
        let record: SearchRecord = serde_json::from_str(json).unwrap();
        assert!(record.user_id.is_none());
        assert_eq!(record.tipo_busca, Some(SearchMode::Voice));
        assert_eq!(record.tipo_filtro, None);
        assert_eq!(record.search_text, "pão francês");
    }

    #[test]
    fn test_product_price_from_numeric_column() {
        let json = r#"{
            "id": "4b54e2a0-6a43-4d3a-8f91-54f2c7a8f002",
            "nome": "Pão Francês",
            "preco": 0.5
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.preco.display(), "R$ 0.50");
    }
}
