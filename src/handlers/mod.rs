//! HTTP request handlers

pub mod analyze;
pub mod health;
pub mod logs;
pub mod metrics;
pub mod rules;
