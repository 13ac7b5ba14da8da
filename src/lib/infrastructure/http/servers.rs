//! Application servers

pub mod http;
