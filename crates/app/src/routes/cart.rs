//! Cart route handlers.
//!
//! The cart lives in the session and is rendered as a snapshot view. The
//! order endpoint produces the formatted message and the outbound
//! messaging link; placing the order happens outside this system.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use meubairro_core::{CommerceId, Price, ProductId};

use crate::backend::{Commerce, Product, QuerySpec};
use crate::cart::{Cart, order_link};
use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub nome: String,
    pub preco: String,
    pub quantidade: u32,
    pub subtotal: String,
}

/// Cart display data.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartItemView {
                    product_id: item.product_id,
                    nome: item.nome.clone(),
                    preco: item.preco.display(),
                    quantidade: item.quantidade,
                    subtotal: Price::new(
                        item.preco.amount * rust_decimal::Decimal::from(item.quantidade),
                    )
                    .display(),
                })
                .collect(),
            total: Price::new(cart.total()).display(),
            item_count: cart.item_count(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart from the session, or an empty one.
async fn get_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Store the cart in the session.
async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Show the cart snapshot.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = get_cart(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add a product to the cart.
///
/// The product row is fetched now and its price captured; later price
/// changes do not reprice the line.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<CartView>> {
    let spec = QuerySpec::from_collection("produtos_comercios")
        .eq("id", form.product_id.to_string())
        .limit(1);
    let product: Product = state.backend().fetch_one(&spec).await?;

    let mut cart = get_cart(&session).await?;
    cart.add(&product);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Remove a product's line from the cart.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(form): Json<RemoveFromCartForm>,
) -> Result<Json<CartView>> {
    let mut cart = get_cart(&session).await?;
    cart.remove(form.product_id);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// The order handoff payload.
#[derive(Debug, Serialize)]
pub struct OrderHandoff {
    pub message: String,
    pub link: String,
}

/// Build the order message and messaging link for a business.
#[instrument(skip(state, session))]
pub async fn order(
    State(state): State<AppState>,
    session: Session,
    Path(commerce_id): Path<CommerceId>,
) -> Result<Json<OrderHandoff>> {
    let cart = get_cart(&session).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("O carrinho está vazio".to_string()));
    }

    let spec = QuerySpec::from_collection("comercios")
        .eq("id", commerce_id.to_string())
        .limit(1);
    let commerce: Commerce = state.backend().fetch_one(&spec).await?;

    let Some(telefone) = commerce.telefone.filter(|t| !t.trim().is_empty()) else {
        return Err(AppError::BadRequest(
            "O comércio não tem telefone cadastrado".to_string(),
        ));
    };

    let message = cart.format_order_message();
    let link = order_link(&state.config().order_link_base, &telefone, &message);

    Ok(Json(OrderHandoff { message, link }))
}
