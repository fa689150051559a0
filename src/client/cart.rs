//! Cart persistence: every mutation is written back immediately so the badge
//! count and totals survive a reload.

use rust_decimal::Decimal;

use super::kv::keys;
use super::store::Storefront;
use crate::domain::Cart;

impl Storefront {
    pub fn load_cart(&self) -> Cart {
        self.kv()
            .get(keys::CART)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    fn save_cart(&self, cart: &Cart) {
        if let Ok(raw) = serde_json::to_string(cart) {
            self.kv().set(keys::CART, &raw);
        }
    }

    /// Look the id up in the current catalog; unknown ids are a no-op.
    pub fn add_to_cart(&self, id: &str, qty: u32) {
        let Some(product) = self.load_products().into_iter().find(|p| p.id == id) else {
            return;
        };
        let mut cart = self.load_cart();
        cart.add(&product, qty);
        self.save_cart(&cart);
    }

    pub fn increment(&self, id: &str) {
        let mut cart = self.load_cart();
        cart.increment(id);
        self.save_cart(&cart);
    }

    pub fn decrement(&self, id: &str) {
        let mut cart = self.load_cart();
        cart.decrement(id);
        self.save_cart(&cart);
    }

    pub fn remove_from_cart(&self, id: &str) {
        let mut cart = self.load_cart();
        cart.remove(id);
        self.save_cart(&cart);
    }

    pub fn clear_cart(&self) {
        self.save_cart(&Cart::default());
    }

    /// Badge count: sum of all line quantities.
    pub fn cart_count(&self) -> u32 {
        self.load_cart().count()
    }

    pub fn cart_total(&self) -> Decimal {
        self.load_cart().total()
    }
}
