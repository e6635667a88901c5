//! Session-related types.
//!
//! The session is the explicit home of the "current user" context: it is
//! created at login, replaced wholesale when geolocation resolves a new
//! bairro, and removed at logout. Nothing else mutates it.

use serde::{Deserialize, Serialize};

use meubairro_core::UserId;

use crate::backend;

/// Session-stored user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's backend row ID.
    pub id: UserId,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    /// The bairro all searches and panels are scoped to.
    pub bairro: String,
    pub cidade: String,
}

impl From<backend::User> for CurrentUser {
    fn from(user: backend::User) -> Self {
        Self {
            id: user.id,
            nome: user.nome,
            email: user.email,
            telefone: user.telefone,
            bairro: user.bairro,
            cidade: user.cidade,
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for storing the session cart.
    pub const CART: &str = "cart";
}
