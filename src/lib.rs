// Relay gateway modules
pub mod config;
pub mod gateway;
pub mod handlers;
pub mod models;
pub mod routes;

// Upstream provider adapter
pub mod llm;

// Conversation client
pub mod client;
