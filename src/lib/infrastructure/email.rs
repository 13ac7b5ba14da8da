//! Outbound email over SMTP.

pub mod smtp;
mod staging;
