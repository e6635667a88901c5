//! Vendor offer publishing.

use axum::{Json, extract::State, http::StatusCode};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::instrument;

use meubairro_core::CommerceId;

use crate::backend::NewPromotion;
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Promotion form data.
#[derive(Debug, Deserialize)]
pub struct PromotionForm {
    pub titulo: String,
    pub descricao: String,
    pub imagem_url: String,
    /// Discount percentage, 1-100.
    pub desconto: i32,
    pub data_validade: NaiveDate,
    pub comercio_id: CommerceId,
}

/// Publish a promotion for a business.
#[instrument(skip(state, user, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(form): Json<PromotionForm>,
) -> Result<StatusCode> {
    if form.titulo.trim().is_empty() || form.descricao.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Preencha título e descrição".to_string(),
        ));
    }
    if !(1..=100).contains(&form.desconto) {
        return Err(AppError::BadRequest(
            "Desconto deve ser de 1 a 100".to_string(),
        ));
    }

    let row = NewPromotion {
        titulo: form.titulo.trim().to_string(),
        descricao: form.descricao.trim().to_string(),
        imagem_url: form.imagem_url,
        desconto: form.desconto,
        data_validade: form.data_validade,
        comercio_id: form.comercio_id,
    };
    state.backend().insert("promocoes", &row).await?;

    tracing::info!(user_id = %user.id, comercio_id = %row.comercio_id, "Promotion published");
    Ok(StatusCode::CREATED)
}
