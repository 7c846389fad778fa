//! Route Handlers

pub mod diagnose;
pub mod metrics;
pub mod rules;
