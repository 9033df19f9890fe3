//! Configuration, entity models and the host-facing seams.

pub mod config;
pub mod events;
pub mod ids;
pub mod models;
