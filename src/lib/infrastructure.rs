//! Adapters: configuration, SMTP and HTTP.

pub mod config;
pub mod email;
pub mod http;
