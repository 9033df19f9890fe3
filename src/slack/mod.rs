//! All Slack-specific functionality

pub mod actions;
pub mod client;
pub mod command_parser;
pub mod driver;
pub mod references;
pub mod resources;
pub mod views;

// Re-export main types for convenience
pub use client::{RequestBody, SlackClient};
pub use driver::SlackDriver;
pub use references::parse_reference;
pub use resources::{Collection, collect_all, pages};
pub use views::{Triggers, Views};
