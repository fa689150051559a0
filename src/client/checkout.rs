//! Order submission: idle -> submitting -> succeeded, or failed ->
//! fallback-notified. The fallback (pre-filled email and messaging links) is
//! the sole failure recovery; the order is never retried or queued.

use chrono::Utc;

use super::kv::keys;
use super::store::Storefront;
use crate::domain::{format_amount, NewOrder};
use crate::{Result, ShopError};

#[derive(Clone, Debug, Default)]
pub struct ContactForm {
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// Manual-fallback notification targets for a failed submission.
#[derive(Clone, Debug)]
pub struct FallbackLinks {
    pub mailto: String,
    pub whatsapp: String,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Order accepted; the cart has been cleared.
    Succeeded,
    /// Submission failed; the caller should surface the links to the user.
    FallbackNotified { error: String, links: FallbackLinks },
}

impl Storefront {
    /// Assemble the intake payload from the contact form and cart contents.
    pub fn build_order_payload(&self, form: &ContactForm) -> NewOrder {
        let cart = self.load_cart();
        NewOrder {
            name: form.name.clone(),
            phone: form.phone.clone(),
            email: form.email.clone(),
            items: cart.order_items(),
            total: cart.total(),
            timestamp: Some(Utc::now()),
        }
    }

    pub async fn submit_order(&self, form: &ContactForm) -> SubmitOutcome {
        let payload = self.build_order_payload(form);
        match self.post_order(&payload).await {
            Ok(()) => {
                self.clear_cart();
                SubmitOutcome::Succeeded
            }
            Err(e) => SubmitOutcome::FallbackNotified {
                error: e.to_string(),
                links: self.fallback_links(&payload),
            },
        }
    }

    async fn post_order(&self, payload: &NewOrder) -> Result<()> {
        let url = format!("{}/api/orders", self.base_url);
        let res = self.http.post(&url).json(payload).send().await?;
        if !res.status().is_success() {
            return Err(ShopError::Upstream {
                status: res.status().as_u16(),
                body: res.text().await.unwrap_or_default(),
            });
        }
        // A 2xx body can still carry an application-level failure flag.
        let body: serde_json::Value = res.json().await.unwrap_or(serde_json::Value::Null);
        for flag in ["ok", "success"] {
            if body.get(flag).and_then(serde_json::Value::as_bool) == Some(false) {
                let msg = body
                    .get("error")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("server error");
                return Err(ShopError::Internal(msg.to_string()));
            }
        }
        Ok(())
    }

    /// Pre-filled email and WhatsApp compose links carrying the order
    /// summary. The phone is digits-only and omitted when too short to be a
    /// real number.
    pub fn fallback_links(&self, payload: &NewOrder) -> FallbackLinks {
        let summary = order_summary(payload);
        let email = self.kv().get(keys::BUSINESS_EMAIL).unwrap_or_default();
        // Primary number first, secondary as backup.
        let digits = [keys::BUSINESS_WHATSAPP, keys::BUSINESS_WHATSAPP_2]
            .iter()
            .filter_map(|key| self.kv().get(key))
            .map(|raw| raw.chars().filter(char::is_ascii_digit).collect::<String>())
            .find(|d| d.len() >= 6)
            .unwrap_or_default();

        let mailto = format!(
            "mailto:{}?subject={}&body={}",
            percent_encode(&email),
            percent_encode("New order"),
            percent_encode(&summary)
        );
        let whatsapp = if digits.len() >= 6 {
            format!("https://api.whatsapp.com/send?phone={}&text={}", digits, percent_encode(&summary))
        } else {
            format!("https://api.whatsapp.com/send?text={}", percent_encode(&summary))
        };
        FallbackLinks { mailto, whatsapp }
    }
}

fn order_summary(payload: &NewOrder) -> String {
    let mut lines = vec![
        "Order".to_string(),
        format!("Name: {}", payload.name),
        format!("Phone: {}", payload.phone),
        format!("Email: {}", payload.email),
        String::new(),
        "Items:".to_string(),
    ];
    for item in &payload.items {
        let line_total = item.price * rust_decimal::Decimal::from(item.qty);
        lines.push(format!("- {} x{} : ${}", item.title, item.qty, format_amount(line_total)));
    }
    lines.push(format!("Total: ${}", format_amount(payload.total)));
    lines.join("\n")
}

/// Minimal percent-encoding for mailto/messaging query components.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
