//! Email handlers

pub mod send_email;
