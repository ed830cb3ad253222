//! Checks the Telegram notification setup by sending a sample order.
//!
//! ```bash
//! TELEGRAM_BOT_TOKEN=... TELEGRAM_CHAT_ID=... cargo run -p shopfront-notifier --bin notify-check
//! ```

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use shopfront_common::config::NotifierConfig;
use shopfront_common::types::{Order, OrderItem, OrderItems};
use shopfront_notifier::{ChatChannel, NotificationDispatcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("shopfront_notifier=debug")),
        )
        .init();

    let config = NotifierConfig::from_env()?;

    println!("Telegram notification check");
    println!(
        "  TELEGRAM_BOT_TOKEN: {}",
        if config.telegram_bot_token.is_some() { "set" } else { "MISSING" }
    );
    println!(
        "  TELEGRAM_CHAT_ID:   {}",
        config.telegram_chat_id.as_deref().unwrap_or("MISSING")
    );
    println!("  TELEGRAM_API_URL:   {}", config.telegram_api_url);
    println!("  BASE_URL:           {}", config.base_url);

    let dispatcher = NotificationDispatcher::from_config(&config)?;
    if !dispatcher.channel().is_configured() {
        anyhow::bail!("Telegram credentials are not configured");
    }

    let order = sample_order();
    let message = dispatcher.format_order_notification(&order)?;
    println!("\nMessage preview:\n{}\n", message);

    let report = dispatcher.send_order_with_images(&order).await?;
    if !report.message_delivered {
        anyhow::bail!("Test message was not delivered");
    }

    println!("Test message sent to chat {}", config.telegram_chat_id.as_deref().unwrap_or(""));
    Ok(())
}

fn sample_order() -> Order {
    Order {
        id: 999,
        user_id: None,
        shipping_name: "Test User".to_string(),
        shipping_email: "test@example.com".to_string(),
        shipping_phone: "123456789".to_string(),
        shipping_address: "Test Street".to_string(),
        shipping_city: "Test City".to_string(),
        shipping_country: "Test Country".to_string(),
        shipping_zip: "12345".to_string(),
        items: OrderItems::Decoded(vec![OrderItem {
            name: "Test Product".to_string(),
            quantity: 1,
            price: 100.0,
            image: None,
        }]),
        total: 100.0,
        payment_method: "test_payment".to_string(),
        status: "pending".to_string(),
        created_at: Utc::now(),
    }
}
