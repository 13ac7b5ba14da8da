#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Internal email gateway: validates send requests, optionally wraps them in
//! the branded base template and relays them over SMTP.

pub mod domain;
pub mod infrastructure;
