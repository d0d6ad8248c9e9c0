//! Hosted checkout URL construction.
//!
//! The query layout is a wire contract with the backend's checkout endpoint:
//! one `add-to-cart[]`/`quantity[]` pair per cart line, then optional billing
//! prefill fields, then `coupon_code`, then `return_url`. The bracketed keys
//! are emitted verbatim; only values are percent-encoded.

use serde::{Deserialize, Serialize};

use crate::cart::CartItem;

/// Payload handed to an adapter's checkout capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    pub items: Vec<CartItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CheckoutPrefill>,
}

/// Billing details to prefill on the hosted checkout page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPrefill {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
}

/// One cart line for checkout: a product id and a quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
    pub product_id: String,
    pub quantity: u32,
}

impl CheckoutLine {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Everything needed to build a hosted checkout redirect.
#[derive(Debug, Clone, Default)]
pub struct CheckoutRequest {
    /// Backend store URL; a trailing slash is tolerated.
    pub store_url: String,
    /// Cart lines to add at checkout.
    pub items: Vec<CheckoutLine>,
    /// Optional billing prefill.
    pub prefill: Option<CheckoutPrefill>,
    /// Optional coupon code.
    pub coupon: Option<String>,
    /// Optional URL to return to after checkout.
    pub return_url: Option<String>,
}

impl CheckoutRequest {
    pub fn new(store_url: impl Into<String>) -> Self {
        Self {
            store_url: store_url.into(),
            ..Default::default()
        }
    }

    pub fn with_item(mut self, product_id: impl Into<String>, quantity: u32) -> Self {
        self.items.push(CheckoutLine::new(product_id, quantity));
        self
    }

    pub fn with_prefill(mut self, prefill: CheckoutPrefill) -> Self {
        self.prefill = Some(prefill);
        self
    }

    pub fn with_coupon(mut self, coupon: impl Into<String>) -> Self {
        self.coupon = Some(coupon.into());
        self
    }

    pub fn with_return_url(mut self, url: impl Into<String>) -> Self {
        self.return_url = Some(url.into());
        self
    }

    /// Build the checkout URL.
    pub fn checkout_url(&self) -> String {
        let base = format!("{}/checkout/", self.store_url.trim_end_matches('/'));
        let mut params: Vec<(String, String)> = Vec::new();

        for item in &self.items {
            params.push(("add-to-cart[]".to_string(), item.product_id.clone()));
            params.push(("quantity[]".to_string(), item.quantity.to_string()));
        }

        if let Some(prefill) = &self.prefill {
            let fields = [
                ("billing_first_name", &prefill.first_name),
                ("billing_last_name", &prefill.last_name),
                ("billing_email", &prefill.email),
                ("billing_phone", &prefill.phone),
                ("billing_company", &prefill.company),
                ("billing_address_1", &prefill.address1),
                ("billing_address_2", &prefill.address2),
                ("billing_city", &prefill.city),
                ("billing_state", &prefill.state),
                ("billing_postcode", &prefill.postcode),
                ("billing_country", &prefill.country),
            ];
            for (key, value) in fields {
                if let Some(value) = value {
                    params.push((key.to_string(), value.clone()));
                }
            }
        }

        if let Some(coupon) = &self.coupon {
            params.push(("coupon_code".to_string(), coupon.clone()));
        }
        if let Some(return_url) = &self.return_url {
            params.push(("return_url".to_string(), return_url.clone()));
        }

        if params.is_empty() {
            return base;
        }

        let query: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, encode_value(v)))
            .collect();
        format!("{}?{}", base, query.join("&"))
    }
}

/// Percent-encode a query value. Unreserved characters pass through; the
/// keys themselves are fixed strings and are never encoded.
fn encode_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
