//! Order routes: checkout and order lookup.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use shopfront_common::error::AppError;
use shopfront_common::types::{Order, OrderItem, OrderItems, ShippingDetails};
use shopfront_notifier::NotificationDispatcher;
use tokio_util::task::TaskTracker;

use crate::state::AppState;
use crate::store::{NewOrder, OrderStore};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", post(create_order))
        .route("/api/orders/{id}", get(get_order))
}

/// Request body for checkout.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: Option<i64>,
    pub items: Option<Vec<OrderItem>>,
    pub total: Option<f64>,
    pub shipping: Option<ShippingDetails>,
    pub payment_method: Option<String>,
}

/// Response for a stored order.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order_id: i64,
}

impl CreateOrderRequest {
    fn validate(self) -> Result<NewOrder, AppError> {
        let (Some(items), Some(total), Some(shipping)) = (self.items, self.total, self.shipping)
        else {
            return Err(missing_fields());
        };

        if total == 0.0 || total.is_nan() {
            return Err(missing_fields());
        }
        if total < 0.0 || !total.is_finite() {
            return Err(AppError::Validation(
                "total must be a non-negative number".to_string(),
            ));
        }

        if let Some(item) = items.iter().find(|i| i.quantity == 0) {
            return Err(AppError::Validation(format!(
                "Item '{}' must have a positive quantity",
                item.name
            )));
        }
        if let Some(item) = items.iter().find(|i| i.price < 0.0 || !i.price.is_finite()) {
            return Err(AppError::Validation(format!(
                "Item '{}' must have a non-negative price",
                item.name
            )));
        }

        Ok(NewOrder {
            user_id: self.user_id,
            items,
            total,
            shipping,
            payment_method: self.payment_method.unwrap_or_default(),
        })
    }
}

fn missing_fields() -> AppError {
    AppError::Validation("Missing required fields".to_string())
}

/// POST /api/orders: Store the order, then notify the shop chat in the background.
///
/// The response is built before the notification runs and never reflects its
/// outcome.
async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, AppError> {
    let new_order = req.validate()?;
    let order = OrderStore::create(&state.pool, &new_order).await?;
    let order_id = order.id;

    spawn_order_notification(&state.tasks, state.notifier.clone(), order);

    Ok(Json(CreateOrderResponse {
        success: true,
        order_id,
    }))
}

/// GET /api/orders/:id: Fetch an order with its items decoded.
async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Order>, AppError> {
    let mut order = OrderStore::get(&state.pool, id).await?;
    let items = order
        .items
        .decode()
        .map_err(|e| AppError::Internal(format!("Stored items for order {} are invalid: {}", id, e)))?
        .into_owned();
    order.items = OrderItems::Decoded(items);

    Ok(Json(order))
}

/// Run `send_order_with_images` on a tracked task; outcomes only reach the logs.
fn spawn_order_notification(
    tasks: &TaskTracker,
    notifier: Arc<NotificationDispatcher>,
    order: Order,
) {
    tasks.spawn(async move {
        match notifier.send_order_with_images(&order).await {
            Ok(report) => {
                tracing::debug!(
                    order_id = report.order_id,
                    message_delivered = report.message_delivered,
                    images = report.images.len(),
                    images_failed = report.failed_images(),
                    "Order notification finished"
                );
            }
            Err(e) => {
                tracing::error!(order_id = order.id, error = %e, "Order notification failed");
            }
        }
    });
}
