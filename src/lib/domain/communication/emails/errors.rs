use css_inline::InlineError;
use thiserror::Error;
use tracing::debug;

use crate::domain::communication::{email_addresses::EmailAddressError, mailer::MailerError};

/// Errors decoding base64 request content
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The content is not valid base64
    #[error("content is not valid base64")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The decoded content is not valid UTF-8
    #[error("decoded content is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// A send request failed validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The named rule rejected the request
    #[error("request rejected by the {0} rule")]
    RuleFailed(&'static str),
}

/// Errors turning a request into an [`Email`](super::Email)
#[derive(Debug, Error)]
pub enum BuildEmailError {
    /// Body or attachment content could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// An address could not be parsed
    #[error(transparent)]
    Address(#[from] EmailAddressError),
}

/// Errors embedding content in the base template
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The caller's content is not a valid template
    #[error("email content is not a valid template")]
    Content(#[source] tera::Error),

    /// The base template file could not be read
    #[error("base template file could not be read")]
    BaseTemplateFile(#[source] std::io::Error),

    /// The base template is not a valid template
    #[error("base template could not be parsed")]
    BaseTemplate(#[source] tera::Error),

    /// Rendering the base template failed
    #[error("base template could not be rendered")]
    Render(#[source] tera::Error),

    /// Inlining the rendered styles failed
    #[error("styles could not be inlined")]
    InlineStyles(#[source] InlineError),
}

impl From<InlineError> for TemplateError {
    fn from(err: InlineError) -> Self {
        debug!("InlineError -> TemplateError");

        TemplateError::InlineStyles(err)
    }
}

/// Errors dispatching a built email
#[derive(Debug, Error)]
pub enum SendEmailError {
    /// The base template could not be applied
    #[error("could not embed the content in the base template")]
    Template(#[from] TemplateError),

    /// The mailer failed to deliver the message to the relay
    #[error("could not send the email")]
    Mailer(MailerError),
}

impl From<MailerError> for SendEmailError {
    fn from(err: MailerError) -> Self {
        debug!("MailerError -> SendEmailError");

        SendEmailError::Mailer(err)
    }
}
