//! Order notification delivery.
//!
//! Turns a persisted [`Order`](shopfront_common::types::Order) into an HTML chat
//! message and delivers it, followed by one photo per item that carries an
//! image, to a single Telegram chat.
//!
//! Delivery is best-effort: a single attempt per message, no retry, no queue.
//! A missing bot token or chat id turns every send into a logged no-op.

pub mod dispatcher;
pub mod error;
pub mod format;
pub mod telegram;

pub use dispatcher::{DispatchReport, ImageDelivery, ImageOutcome, NotificationDispatcher};
pub use error::NotifyError;
pub use telegram::{ChatChannel, TelegramClient};
