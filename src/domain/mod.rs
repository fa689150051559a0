//! Core storefront types: catalog products, orders, and the cart engine.

pub mod cart;
pub mod order;
pub mod product;

pub use cart::{Cart, CartLine};
pub use order::{NewOrder, Order, OrderItem, OrderPatch};
pub use product::{NewProduct, Product, ProductPatch};

use rust_decimal::Decimal;

/// Render an amount with exactly two decimal places ("25" -> "25.00").
pub fn format_amount(amount: Decimal) -> String {
    let mut a = amount;
    a.rescale(2);
    a.to_string()
}
