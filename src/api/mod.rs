//! Inbound webhook handling

pub mod event_handler;
pub mod handler;
pub mod helpers;
pub mod interactive_handler;
pub mod parsing;
pub mod signature;
pub mod slash_handler;

// Re-export the entry points for convenience
pub use handler::{WebhookRequest, WebhookService};
pub use helpers::{ResponseBody, WebhookResponse};
