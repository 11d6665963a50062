//! HTTP handlers for the outline service.

pub mod health;
pub mod metrics;
pub mod outline;
