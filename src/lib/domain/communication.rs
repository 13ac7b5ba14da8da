//! Outbound communication: addresses, emails and the mailer contract.

pub mod email_addresses;
pub mod emails;
pub mod mailer;
