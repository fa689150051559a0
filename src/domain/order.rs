//! Orders: intake request, stored record, and admin patch.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, ShopError};

pub const STATUS_PENDING: &str = "pending";

/// One purchased line as submitted by the storefront.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub title: String,
    pub qty: u32,
    pub price: Decimal,
}

/// A stored order. Status is a free-form string patched by the admin with no
/// transition validation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total: Decimal,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_status() -> String {
    STATUS_PENDING.to_string()
}

/// Public order intake payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewOrder {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewOrder {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.phone.trim().is_empty() || self.items.is_empty() {
            return Err(ShopError::Validation(
                "missing required fields: name, phone, items".into(),
            ));
        }
        Ok(())
    }

    pub fn into_order(self) -> Order {
        Order {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            phone: self.phone,
            email: self.email,
            items: self.items,
            total: self.total,
            status: default_status(),
            timestamp: self.timestamp,
            created_at: Some(Utc::now()),
            updated_at: None,
        }
    }
}

/// Typed shallow patch; commonly used to move an order out of `pending`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OrderPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total: Option<Decimal>,
}

impl OrderPatch {
    pub fn apply(self, order: &mut Order) {
        if let Some(name) = self.name {
            order.name = name;
        }
        if let Some(phone) = self.phone {
            order.phone = phone;
        }
        if let Some(email) = self.email {
            order.email = email;
        }
        if let Some(status) = self.status {
            order.status = status;
        }
        if let Some(total) = self.total {
            order.total = total;
        }
        order.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> OrderItem {
        OrderItem { title: "Pad".into(), qty: 2, price: Decimal::new(10, 0) }
    }

    #[test]
    fn test_validate_required_fields() {
        let order = NewOrder {
            name: "Ada".into(),
            phone: "123456".into(),
            email: String::new(),
            items: vec![item()],
            total: Decimal::new(20, 0),
            timestamp: None,
        };
        assert!(order.validate().is_ok());

        let missing = NewOrder { phone: String::new(), ..order.clone() };
        assert!(missing.validate().is_err());
        let empty_items = NewOrder { items: vec![], ..order };
        assert!(empty_items.validate().is_err());
    }

    #[test]
    fn test_intake_stamps_pending() {
        let order = NewOrder {
            name: "Ada".into(),
            phone: "123456".into(),
            email: String::new(),
            items: vec![item()],
            total: Decimal::new(20, 0),
            timestamp: None,
        }
        .into_order();
        assert_eq!(order.status, STATUS_PENDING);
        assert!(!order.id.is_empty());
        assert!(order.created_at.is_some());
    }

    #[test]
    fn test_patch_updates_status_only() {
        let mut order = NewOrder {
            name: "Ada".into(),
            phone: "123456".into(),
            email: String::new(),
            items: vec![item()],
            total: Decimal::new(20, 0),
            timestamp: None,
        }
        .into_order();
        OrderPatch { status: Some("shipped".into()), ..Default::default() }.apply(&mut order);
        assert_eq!(order.status, "shipped");
        assert_eq!(order.name, "Ada");
        assert!(order.updated_at.is_some());
    }
}
