//! Order persistence: insert and lookup against the `orders` table.

use sqlx::PgPool;

use shopfront_common::error::AppError;
use shopfront_common::types::{Order, OrderItem, OrderRow, ShippingDetails};

/// A validated order ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Option<i64>,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub shipping: ShippingDetails,
    pub payment_method: String,
}

/// Service layer for order storage.
pub struct OrderStore;

impl OrderStore {
    /// Insert an order and return the stored record, including generated id,
    /// default status and creation timestamp.
    pub async fn create(pool: &PgPool, order: &NewOrder) -> Result<Order, AppError> {
        let items_json = serde_json::to_string(&order.items)
            .map_err(|e| AppError::Internal(format!("Failed to encode order items: {}", e)))?;

        let row: OrderRow = sqlx::query_as(
            r#"
            INSERT INTO orders (user_id, items, total, shipping_name, shipping_email, shipping_phone,
                                shipping_address, shipping_city, shipping_country, shipping_zip, payment_method)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(order.user_id)
        .bind(&items_json)
        .bind(order.total)
        .bind(&order.shipping.name)
        .bind(&order.shipping.email)
        .bind(&order.shipping.phone)
        .bind(&order.shipping.address)
        .bind(&order.shipping.city)
        .bind(&order.shipping.country)
        .bind(&order.shipping.zip)
        .bind(&order.payment_method)
        .fetch_one(pool)
        .await?;

        tracing::info!(
            order_id = row.id,
            items = order.items.len(),
            total = order.total,
            "Order created"
        );

        Ok(row.into())
    }

    /// Get a single order by ID. Items are returned as the stored JSON text.
    pub async fn get(pool: &PgPool, order_id: i64) -> Result<Order, AppError> {
        let row: OrderRow = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
            .bind(order_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        Ok(row.into())
    }
}
