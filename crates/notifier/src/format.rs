//! Rendering of orders into Telegram HTML messages.
//!
//! Everything here is pure: the same order always renders to the same bytes.

use std::borrow::Cow;

use chrono::{DateTime, Utc};

use shopfront_common::types::{Order, OrderItem};

use crate::error::{NotifyError, Result};

/// Render the order summary posted to the chat.
///
/// The grand total is taken from `order.total` as-is; item line totals are
/// `price × quantity` rounded to cents.
pub fn format_order_notification(order: &Order) -> Result<String> {
    let items = decode_items(order)?;
    render_order(order, &items)
}

/// Decode `order.items`, reporting a malformed list as a format error.
pub fn decode_items(order: &Order) -> Result<Cow<'_, [OrderItem]>> {
    order.items.decode().map_err(|e| {
        NotifyError::Format(format!("Invalid items for order #{}: {}", order.id, e))
    })
}

/// Render the summary from already decoded items.
pub fn render_order(order: &Order, items: &[OrderItem]) -> Result<String> {
    let items_list = items
        .iter()
        .map(format_item_line)
        .collect::<Vec<_>>()
        .join("\n");

    let message = format!(
        "<b>📦 New Order Received!</b>\n\
         \n\
         <b>Order #{id}</b>\n\
         \n\
         <b>Customer:</b> {name}\n\
         <b>Email:</b> {email}\n\
         <b>Phone:</b> {phone}\n\
         \n\
         <b>Shipping Address:</b>\n\
         {address}\n\
         {city}, {country} {zip}\n\
         \n\
         <b>Items Ordered:</b>\n\
         {items_list}\n\
         \n\
         <b>Total Amount:</b> ${total:.2}\n\
         <b>Payment Method:</b> {payment}\n\
         <b>Status:</b> {status}\n\
         \n\
         <b>Date:</b> {date}",
        id = order.id,
        name = escape_html(&order.shipping_name),
        email = escape_html(&order.shipping_email),
        phone = escape_html(&order.shipping_phone),
        address = escape_html(&order.shipping_address),
        city = escape_html(&order.shipping_city),
        country = escape_html(&order.shipping_country),
        zip = escape_html(&order.shipping_zip),
        total = order.total,
        payment = escape_html(&normalize_payment_method(&order.payment_method)),
        status = escape_html(&order.status),
        date = format_created_at(&order.created_at),
    );

    if message.trim().is_empty() {
        return Err(NotifyError::Format(format!(
            "Rendered notification for order #{} is empty",
            order.id
        )));
    }

    Ok(message)
}

/// Caption attached to a product photo.
pub fn format_image_caption(item: &OrderItem) -> String {
    format!(
        "<b>{}</b>\nQty: {} - ${:.2}",
        escape_html(&item.name),
        item.quantity,
        item.line_total()
    )
}

/// `cash_on_delivery` → `CASH ON DELIVERY`.
pub fn normalize_payment_method(method: &str) -> String {
    method.replace('_', " ").to_uppercase()
}

/// en-US style local date/time, e.g. `3/5/2026, 2:07:09 PM` (UTC).
pub fn format_created_at(created_at: &DateTime<Utc>) -> String {
    created_at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

fn format_item_line(item: &OrderItem) -> String {
    format!(
        "• <b>{}</b> x{} - ${:.2}",
        escape_html(&item.name),
        item.quantity,
        item.line_total()
    )
}

/// Escape the characters Telegram's HTML parse mode treats as markup.
pub fn escape_html(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['&', '<', '>']) {
        return Cow::Borrowed(raw);
    }

    let mut escaped = String::with_capacity(raw.len() + 8);
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shopfront_common::types::OrderItems;

    fn sample_order(items: OrderItems) -> Order {
        Order {
            id: 42,
            user_id: None,
            shipping_name: "A".to_string(),
            shipping_email: "a@b.com".to_string(),
            shipping_phone: "123".to_string(),
            shipping_address: "St".to_string(),
            shipping_city: "C".to_string(),
            shipping_country: "X".to_string(),
            shipping_zip: "00000".to_string(),
            items,
            total: 11.0,
            payment_method: "cash_on_delivery".to_string(),
            status: "pending".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 5, 14, 7, 9).unwrap(),
        }
    }

    fn cable_items_json() -> OrderItems {
        OrderItems::Encoded(r#"[{"name":"Cable","quantity":2,"price":5.5}]"#.to_string())
    }

    #[test]
    fn test_format_reference_order() {
        let message = format_order_notification(&sample_order(cable_items_json())).unwrap();

        assert!(message.contains("Order #42"));
        assert!(message.contains("CASH ON DELIVERY"));
        let cable_line = message
            .lines()
            .find(|l| l.contains("Cable"))
            .expect("item line present");
        assert!(cable_line.contains("x2"));
        assert!(cable_line.contains("$11.00"));
        assert!(message.contains("<b>Total Amount:</b> $11.00"));
        assert!(message.contains("<b>Status:</b> pending"));
        assert!(message.contains("St\nC, X 00000"));
        assert!(message.contains("<b>Date:</b> 3/5/2026, 2:07:09 PM"));
    }

    #[test]
    fn test_format_is_deterministic() {
        let order = sample_order(cable_items_json());
        let first = format_order_notification(&order).unwrap();
        let second = format_order_notification(&order).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_encoded_and_decoded_items_render_identically() {
        let decoded = OrderItems::Decoded(vec![OrderItem {
            name: "Cable".to_string(),
            quantity: 2,
            price: 5.5,
            image: None,
        }]);
        assert_eq!(
            format_order_notification(&sample_order(cable_items_json())).unwrap(),
            format_order_notification(&sample_order(decoded)).unwrap()
        );
    }

    #[test]
    fn test_total_is_not_recomputed() {
        let mut order = sample_order(cable_items_json());
        order.total = 99.5;
        let message = format_order_notification(&order).unwrap();
        assert!(message.contains("<b>Total Amount:</b> $99.50"));
        assert!(message.contains("x2 - $11.00"));
    }

    #[test]
    fn test_line_total_rounds_to_cents() {
        let items = OrderItems::Decoded(vec![OrderItem {
            name: "Resistor".to_string(),
            quantity: 3,
            price: 0.333,
            image: None,
        }]);
        let message = format_order_notification(&sample_order(items)).unwrap();
        assert!(message.contains("<b>Resistor</b> x3 - $1.00"));
    }

    #[test]
    fn test_zero_items_renders_empty_section() {
        let message = format_order_notification(&sample_order(OrderItems::Decoded(vec![]))).unwrap();
        assert!(message.contains("<b>Items Ordered:</b>\n\n\n<b>Total Amount:</b>"));
        assert!(!message.contains('•'));
    }

    #[test]
    fn test_render_from_decoded_items_matches_full_format() {
        let order = sample_order(cable_items_json());
        let items = decode_items(&order).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(
            render_order(&order, &items).unwrap(),
            format_order_notification(&order).unwrap()
        );
    }

    #[test]
    fn test_decode_items_malformed_is_format_error() {
        let order = sample_order(OrderItems::Encoded("[{".to_string()));
        assert!(matches!(decode_items(&order), Err(NotifyError::Format(_))));
    }

    #[test]
    fn test_malformed_items_is_format_error() {
        let order = sample_order(OrderItems::Encoded("not json".to_string()));
        let err = format_order_notification(&order).unwrap_err();
        assert!(matches!(err, NotifyError::Format(_)));
        assert!(err.to_string().contains("#42"));
    }

    #[test]
    fn test_customer_fields_are_escaped() {
        let mut order = sample_order(cable_items_json());
        order.shipping_name = "Tom & <Jerry>".to_string();
        let message = format_order_notification(&order).unwrap();
        assert!(message.contains("<b>Customer:</b> Tom &amp; &lt;Jerry&gt;"));
    }

    #[test]
    fn test_normalize_payment_method() {
        assert_eq!(normalize_payment_method("cash_on_delivery"), "CASH ON DELIVERY");
        assert_eq!(normalize_payment_method("aba"), "ABA");
        assert_eq!(normalize_payment_method(""), "");
    }

    #[test]
    fn test_image_caption() {
        let item = OrderItem {
            name: "USB <C> Hub".to_string(),
            quantity: 4,
            price: 12.25,
            image: Some("/img/hub.png".to_string()),
        };
        assert_eq!(
            format_image_caption(&item),
            "<b>USB &lt;C&gt; Hub</b>\nQty: 4 - $49.00"
        );
    }

    #[test]
    fn test_escape_html_borrows_when_clean() {
        assert!(matches!(escape_html("plain"), Cow::Borrowed("plain")));
    }
}
