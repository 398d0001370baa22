//! Core abstractions for the upstream provider layer

pub mod config;
pub mod error;
pub mod provider;
pub mod types;
