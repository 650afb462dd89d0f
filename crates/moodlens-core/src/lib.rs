// Core library: wire protocol, label table, display math, configuration and
// the HTTP client for the emotion classification service.

pub mod client;
pub mod config;
pub mod emotion;
pub mod protocol;
pub mod summary;
