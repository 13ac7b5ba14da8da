//! The email domain model

use crate::domain::communication::email_addresses::EmailAddress;

use super::{
    decode_base64, decode_base64_text, AttachmentRequest, BuildEmailError, DecodeError,
    EmailRequest,
};

/// An email ready to be dispatched
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Email {
    /// The sender
    pub from: EmailAddress,

    /// The recipients, in request order
    pub to: Vec<EmailAddress>,

    /// The subject line
    pub subject: String,

    /// The decoded body
    pub body: MessageBody,

    /// The decoded attachments
    pub attachments: Vec<Attachment>,

    /// Whether the body should be wrapped in the base template
    pub include_base_template: bool,
}

/// A decoded message body
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageBody {
    /// MIME type of `content`
    pub mime_type: String,

    /// The body text
    pub content: String,
}

/// A decoded attachment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    /// File name shown to recipients
    pub file_name: String,

    /// Raw file content
    pub data: Vec<u8>,
}

impl TryFrom<&AttachmentRequest> for Attachment {
    type Error = DecodeError;

    fn try_from(request: &AttachmentRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            file_name: request.file_name.clone(),
            data: decode_base64(&request.base64_encoded_data)?,
        })
    }
}

/// Builds an [`Email`] from a request, decoding the body and every
/// attachment. Stops at the first field that fails to decode.
impl TryFrom<EmailRequest> for Email {
    type Error = BuildEmailError;

    fn try_from(request: EmailRequest) -> Result<Self, Self::Error> {
        let body = MessageBody {
            mime_type: request.message_body.mime_type().to_string(),
            content: decode_base64_text(&request.message_body.base64_encoded_content)?,
        };

        let attachments = request
            .attachments
            .iter()
            .map(Attachment::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let to = request
            .to
            .iter()
            .map(|recipient| EmailAddress::new(recipient))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            from: EmailAddress::new(&request.from)?,
            to,
            subject: request.subject,
            body,
            attachments,
            include_base_template: request.include_base_template,
        })
    }
}
