//! The send request as received, before validation.

/// MIME type used when the caller does not supply one
pub const DEFAULT_MIME_TYPE: &str = "text/plain";

/// A request to send an email
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmailRequest {
    /// Sender address
    pub from: String,

    /// Recipient addresses, in order
    pub to: Vec<String>,

    /// Subject line
    pub subject: String,

    /// Base64 encoded body
    pub message_body: MessageBodyRequest,

    /// Base64 encoded attachments
    pub attachments: Vec<AttachmentRequest>,

    /// Wrap the body in the branded base template
    pub include_base_template: bool,
}

/// The body of an [`EmailRequest`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageBodyRequest {
    /// MIME type of the decoded content, if supplied
    pub mime_type: Option<String>,

    /// Base64 encoded content
    pub base64_encoded_content: String,
}

impl MessageBodyRequest {
    /// The supplied MIME type, or [`DEFAULT_MIME_TYPE`] when absent or empty
    pub fn mime_type(&self) -> &str {
        self.mime_type
            .as_deref()
            .map(str::trim)
            .filter(|mime_type| !mime_type.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
    }
}

/// An attachment of an [`EmailRequest`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttachmentRequest {
    /// File name shown to recipients
    pub file_name: String,

    /// Base64 encoded file content
    pub base64_encoded_data: String,
}
