//! Send request validation
//!
//! A [`RequestValidator`] runs an ordered list of [`ValidationRule`]s against
//! an [`EmailRequest`]. The first rule that fails rejects the request; which
//! rule failed is logged but never reported to the caller.

use std::fmt;

use tracing::debug;

use super::{EmailRequest, ValidationError};

mod rules;

pub use rules::{
    has_allowed_domain, has_supported_extension, has_unique_file_names, is_not_blank,
    is_not_blank_base64, total_decoded_size, AllowedSenderDomain, AttachmentData,
    AttachmentFileName, AttachmentSizeWithinLimit, BodyContent, Recipients, SenderAddress,
    SubjectNotBlank, UniqueAttachmentNames,
};

/// A single, independent check over a send request
pub trait ValidationRule: Send + Sync {
    /// Name used when logging a rejection
    fn name(&self) -> &'static str;

    /// Returns `true` when the request satisfies the rule
    fn validate(&self, request: &EmailRequest) -> bool;
}

/// Policy values the rules are built from
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Domains the sender address may belong to
    pub allowed_sender_domains: Vec<String>,

    /// Attachment extensions that are refused, compared case-sensitively
    pub unsupported_attachment_extensions: Vec<String>,

    /// Maximum combined decoded size of all attachments, inclusive
    pub permissible_attachment_size: usize,
}

/// Runs every rule, in order, against a request
pub struct RequestValidator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl RequestValidator {
    /// The standard rule set for `config`
    pub fn new(config: &ValidationConfig) -> Self {
        Self::with_rules(vec![
            Box::new(SenderAddress),
            Box::new(AllowedSenderDomain::new(&config.allowed_sender_domains)),
            Box::new(Recipients),
            Box::new(SubjectNotBlank),
            Box::new(BodyContent),
            Box::new(AttachmentFileName::new(
                &config.unsupported_attachment_extensions,
            )),
            Box::new(AttachmentData),
            Box::new(UniqueAttachmentNames),
            Box::new(AttachmentSizeWithinLimit::new(
                config.permissible_attachment_size,
            )),
        ])
    }

    /// A validator running exactly `rules`
    pub fn with_rules(rules: Vec<Box<dyn ValidationRule>>) -> Self {
        Self { rules }
    }

    /// Accepts the request or rejects it with the first failing rule
    pub fn validate(&self, request: &EmailRequest) -> Result<(), ValidationError> {
        match self.rules.iter().find(|rule| !rule.validate(request)) {
            Some(rule) => {
                debug!(rule = rule.name(), "send request failed validation");

                Err(ValidationError::RuleFailed(rule.name()))
            }
            None => Ok(()),
        }
    }
}

impl fmt::Debug for RequestValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestValidator")
            .field(
                "rules",
                &self.rules.iter().map(|rule| rule.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
