//! The individual validation rules and the predicates behind them.

use std::collections::HashSet;

use crate::domain::communication::{
    email_addresses::EmailAddress,
    emails::{decode_base64, AttachmentRequest, EmailRequest},
};

use super::ValidationRule;

/// True if `value` has content other than whitespace.
pub fn is_not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// True if `encoded` is valid base64 whose decoded bytes are not blank.
pub fn is_not_blank_base64(encoded: &str) -> bool {
    decode_base64(encoded)
        .map(|decoded| is_not_blank(&String::from_utf8_lossy(&decoded)))
        .unwrap_or(false)
}

/// True if `address` ends with `@domain` for one of `domains`, ignoring case.
pub fn has_allowed_domain(address: &str, domains: &[String]) -> bool {
    let address = address.to_lowercase();

    domains
        .iter()
        .any(|domain| address.ends_with(&format!("@{}", domain.to_lowercase())))
}

/// True if `file_name` has an extension and it is not one of `unsupported`.
///
/// Names without a dot, starting with their only dot or ending in a dot have
/// no usable extension and are refused. Extensions are compared by suffix,
/// case-sensitively.
pub fn has_supported_extension(file_name: &str, unsupported: &[String]) -> bool {
    let file_name = file_name.trim();

    match file_name.rfind('.') {
        None | Some(0) => false,
        Some(index) if index == file_name.len() - 1 => false,
        Some(_) => !unsupported
            .iter()
            .any(|extension| file_name.ends_with(&format!(".{extension}"))),
    }
}

/// True if no two attachments share a file name.
pub fn has_unique_file_names(attachments: &[AttachmentRequest]) -> bool {
    let mut seen = HashSet::with_capacity(attachments.len());

    attachments
        .iter()
        .all(|attachment| seen.insert(attachment.file_name.as_str()))
}

/// Combined decoded size of the attachments. Attachments that do not decode
/// count as zero bytes.
pub fn total_decoded_size(attachments: &[AttachmentRequest]) -> usize {
    attachments
        .iter()
        .filter_map(|attachment| decode_base64(&attachment.base64_encoded_data).ok())
        .map(|decoded| decoded.len())
        .sum()
}

/// The sender is a syntactically valid address
#[derive(Debug, Clone, Copy)]
pub struct SenderAddress;

impl ValidationRule for SenderAddress {
    fn name(&self) -> &'static str {
        "sender_address"
    }

    fn validate(&self, request: &EmailRequest) -> bool {
        EmailAddress::new(&request.from).is_ok()
    }
}

/// The sender belongs to an allowed domain
#[derive(Debug, Clone)]
pub struct AllowedSenderDomain {
    domains: Vec<String>,
}

impl AllowedSenderDomain {
    /// Allow senders from `domains`
    pub fn new(domains: &[String]) -> Self {
        Self {
            domains: domains.to_vec(),
        }
    }
}

impl ValidationRule for AllowedSenderDomain {
    fn name(&self) -> &'static str {
        "allowed_sender_domain"
    }

    fn validate(&self, request: &EmailRequest) -> bool {
        has_allowed_domain(&request.from, &self.domains)
    }
}

/// There is at least one recipient and every recipient is a valid address
#[derive(Debug, Clone, Copy)]
pub struct Recipients;

impl ValidationRule for Recipients {
    fn name(&self) -> &'static str {
        "recipients"
    }

    fn validate(&self, request: &EmailRequest) -> bool {
        !request.to.is_empty()
            && request
                .to
                .iter()
                .all(|recipient| EmailAddress::new(recipient).is_ok())
    }
}

/// The subject is not blank
#[derive(Debug, Clone, Copy)]
pub struct SubjectNotBlank;

impl ValidationRule for SubjectNotBlank {
    fn name(&self) -> &'static str {
        "subject_not_blank"
    }

    fn validate(&self, request: &EmailRequest) -> bool {
        is_not_blank(&request.subject)
    }
}

/// The body decodes to something other than whitespace
#[derive(Debug, Clone, Copy)]
pub struct BodyContent;

impl ValidationRule for BodyContent {
    fn name(&self) -> &'static str {
        "body_content"
    }

    fn validate(&self, request: &EmailRequest) -> bool {
        is_not_blank_base64(&request.message_body.base64_encoded_content)
    }
}

/// Every attachment has a file name with a supported extension
#[derive(Debug, Clone)]
pub struct AttachmentFileName {
    unsupported_extensions: Vec<String>,
}

impl AttachmentFileName {
    /// Refuse attachments ending in any of `unsupported_extensions`
    pub fn new(unsupported_extensions: &[String]) -> Self {
        Self {
            unsupported_extensions: unsupported_extensions.to_vec(),
        }
    }
}

impl ValidationRule for AttachmentFileName {
    fn name(&self) -> &'static str {
        "attachment_file_name"
    }

    fn validate(&self, request: &EmailRequest) -> bool {
        request.attachments.iter().all(|attachment| {
            has_supported_extension(&attachment.file_name, &self.unsupported_extensions)
        })
    }
}

/// Every attachment carries non-empty, valid base64 data
#[derive(Debug, Clone, Copy)]
pub struct AttachmentData;

impl ValidationRule for AttachmentData {
    fn name(&self) -> &'static str {
        "attachment_data"
    }

    fn validate(&self, request: &EmailRequest) -> bool {
        request.attachments.iter().all(|attachment| {
            !attachment.base64_encoded_data.is_empty()
                && decode_base64(&attachment.base64_encoded_data).is_ok()
        })
    }
}

/// No two attachments share a file name
#[derive(Debug, Clone, Copy)]
pub struct UniqueAttachmentNames;

impl ValidationRule for UniqueAttachmentNames {
    fn name(&self) -> &'static str {
        "unique_attachment_names"
    }

    fn validate(&self, request: &EmailRequest) -> bool {
        has_unique_file_names(&request.attachments)
    }
}

/// The attachments fit within the permissible combined size
#[derive(Debug, Clone, Copy)]
pub struct AttachmentSizeWithinLimit {
    limit: usize,
}

impl AttachmentSizeWithinLimit {
    /// Allow at most `limit` decoded bytes across all attachments
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl ValidationRule for AttachmentSizeWithinLimit {
    fn name(&self) -> &'static str {
        "attachment_size_within_limit"
    }

    fn validate(&self, request: &EmailRequest) -> bool {
        total_decoded_size(&request.attachments) <= self.limit
    }
}
