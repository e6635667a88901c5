//! Per-session shopping cart and order message formatting.
//!
//! The cart is a snapshot value stored in the session: it never touches
//! the backend, and the unit price is whatever the product row said when
//! the item was added. Checkout is a handoff - the cart renders a text
//! order message and a messaging link, and its responsibility ends there.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use meubairro_core::{Price, ProductId};

use crate::backend::Product;

/// One line of the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub nome: String,
    /// Unit price captured when the product was looked up.
    pub preco: Price,
    pub quantidade: u32,
}

/// A session-scoped cart. Insertion order is preserved so the order
/// message is deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantidade).sum()
    }

    /// Add a product: increments the quantity if the product is already in
    /// the cart, otherwise appends a new line at quantity 1.
    pub fn add(&mut self, product: &Product) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            item.quantidade += 1;
            return;
        }
        self.items.push(CartItem {
            product_id: product.id,
            nome: product.nome.clone(),
            preco: product.preco,
            quantidade: 1,
        });
    }

    /// Remove a product's line entirely (not a decrement).
    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|i| i.product_id != product_id);
    }

    /// Grand total: Σ quantity × unit price.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(|i| i.preco.amount * Decimal::from(i.quantidade))
            .sum()
    }

    /// Deterministic order text: a greeting, one line per item with
    /// quantity, name, and unit price, then the total line.
    #[must_use]
    pub fn format_order_message(&self) -> String {
        let mut lines = vec!["Olá! Gostaria de fazer um pedido:".to_string()];
        for item in &self.items {
            lines.push(format!(
                "{}x {} ({})",
                item.quantidade,
                item.nome,
                item.preco.display()
            ));
        }
        lines.push(format!("Total: {}", Price::new(self.total()).display()));
        lines.join("\n")
    }
}

/// Build the outbound messaging link that hands off the order message.
///
/// The phone number keeps digits only, as the link format requires.
#[must_use]
pub fn order_link(base: &str, phone: &str, message: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    format!(
        "{}/{digits}?text={}",
        base.trim_end_matches('/'),
        urlencoding::encode(message)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn product(id: &str, nome: &str, preco: &str) -> Product {
        Product {
            id: id.parse().unwrap(),
            nome: nome.to_string(),
            descricao: None,
            preco: Price::new(Decimal::from_str(preco).unwrap()),
            imagem_url: None,
            curtidas: None,
        }
    }

    const PAO: &str = "4b54e2a0-6a43-4d3a-8f91-54f2c7a8f001";
    const CAFE: &str = "4b54e2a0-6a43-4d3a-8f91-54f2c7a8f002";

    #[test]
    fn test_add_twice_increments_quantity() {
        let pao = product(PAO, "Pão", "0.50");
        let mut cart = Cart::new();
        cart.add(&pao);
        cart.add(&pao);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items().first().unwrap().quantidade, 2);
        assert_eq!(cart.total(), Decimal::from_str("1.00").unwrap());
    }

    #[test]
    fn test_remove_deletes_line_entirely() {
        let pao = product(PAO, "Pão", "0.50");
        let mut cart = Cart::new();
        cart.add(&pao);
        cart.add(&pao);
        cart.remove(pao.id);

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let mut cart = Cart::new();
        cart.add(&product(PAO, "Pão", "0.50"));
        cart.add(&product(PAO, "Pão", "0.50"));
        cart.add(&product(CAFE, "Café Expresso", "3.00"));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_unit_price_is_captured_at_add_time() {
        let mut cart = Cart::new();
        cart.add(&product(PAO, "Pão", "0.50"));
        // The same product fetched later at a different price does not
        // reprice the existing line.
        cart.add(&product(PAO, "Pão", "9.99"));

        assert_eq!(cart.total(), Decimal::from_str("1.00").unwrap());
    }

    #[test]
    fn test_format_order_message() {
        let pao = product(PAO, "Pão", "0.50");
        let mut cart = Cart::new();
        cart.add(&pao);
        cart.add(&pao);
        cart.add(&pao);

        let message = cart.format_order_message();
        assert!(message.contains("3x Pão"), "got: {message}");
        assert!(message.contains("Total: R$ 1.50"), "got: {message}");
    }

    #[test]
    fn test_format_order_message_empty_cart() {
        let message = Cart::new().format_order_message();
        assert!(message.contains("Total: R$ 0.00"));
    }

    #[test]
    fn test_order_link_encodes_message_and_strips_phone() {
        let link = order_link("https://wa.me", "+55 (51) 99999-0000", "2x Pão (R$ 0.50)");
        assert!(link.starts_with("https://wa.me/5551999990000?text="));
        assert!(!link.contains(' '));
        assert!(link.contains("2x%20P%C3%A3o"));
    }
}
