//! Cart engine: product-id keyed lines holding a product snapshot and a
//! quantity. Prices are copied at add time, so later catalog edits do not
//! retroactively change lines already in the cart.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::OrderItem;
use super::product::Product;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub qty: u32,
}

/// Serialized as an object keyed by product id, matching the persisted wire
/// shape.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Cart {
    #[serde(flatten)]
    lines: BTreeMap<String, CartLine>,
}

impl Cart {
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Badge count: sum of all quantities.
    pub fn count(&self) -> u32 {
        self.lines.values().map(|l| l.qty).sum()
    }

    /// Grand total: sum of `qty * price` over all lines.
    pub fn total(&self) -> Decimal {
        self.lines
            .values()
            .map(|l| l.product.price * Decimal::from(l.qty))
            .sum()
    }

    /// Add a snapshot of `product`, merging into an existing line by id.
    pub fn add(&mut self, product: &Product, qty: u32) {
        if qty == 0 {
            return;
        }
        if let Some(line) = self.lines.get_mut(&product.id) {
            line.qty += qty;
        } else {
            self.lines
                .insert(product.id.clone(), CartLine { product: product.clone(), qty });
        }
    }

    pub fn increment(&mut self, id: &str) {
        if let Some(line) = self.lines.get_mut(id) {
            line.qty += 1;
        }
    }

    /// Decrement a line; reaching zero removes it, so quantities never drop
    /// below one.
    pub fn decrement(&mut self, id: &str) {
        if let Some(line) = self.lines.get_mut(id) {
            line.qty -= 1;
            if line.qty == 0 {
                self.lines.remove(id);
            }
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.lines.remove(id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Flatten lines into the order-payload item shape.
    pub fn order_items(&self) -> Vec<OrderItem> {
        self.lines
            .values()
            .map(|l| OrderItem {
                title: l.product.title.clone(),
                qty: l.qty,
                price: l.product.price,
            })
            .collect()
    }
}
