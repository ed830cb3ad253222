use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single purchased line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
    /// Absolute URL or storefront-relative path of the product image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl OrderItem {
    /// `price × quantity`, unrounded.
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Order items as stored (a JSON string) or as already decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderItems {
    Encoded(String),
    Decoded(Vec<OrderItem>),
}

impl OrderItems {
    /// Borrow the decoded items, parsing the JSON text first if needed.
    pub fn decode(&self) -> Result<Cow<'_, [OrderItem]>, serde_json::Error> {
        match self {
            OrderItems::Encoded(raw) => {
                let items: Vec<OrderItem> = serde_json::from_str(raw)?;
                Ok(Cow::Owned(items))
            }
            OrderItems::Decoded(items) => Ok(Cow::Borrowed(items)),
        }
    }
}

/// A persisted customer order, as handed to the notification dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: Option<i64>,
    pub shipping_name: String,
    pub shipping_email: String,
    pub shipping_phone: String,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_country: String,
    pub shipping_zip: String,
    pub items: OrderItems,
    /// Grand total as charged; never recomputed from the items.
    pub total: f64,
    pub payment_method: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Raw `orders` table row. Items are kept as the stored JSON text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub items: String,
    pub total: f64,
    pub shipping_name: String,
    pub shipping_email: String,
    pub shipping_phone: String,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_country: String,
    pub shipping_zip: String,
    pub payment_method: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: row.id,
            user_id: row.user_id,
            shipping_name: row.shipping_name,
            shipping_email: row.shipping_email,
            shipping_phone: row.shipping_phone,
            shipping_address: row.shipping_address,
            shipping_city: row.shipping_city,
            shipping_country: row.shipping_country,
            shipping_zip: row.shipping_zip,
            items: OrderItems::Encoded(row.items),
            total: row.total,
            payment_method: row.payment_method,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Shipping block submitted with a new order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub zip: String,
}
