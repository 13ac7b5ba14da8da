//! Mailer errors

use lettre::address::AddressError;
use thiserror::Error;
use tracing::debug;

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// The relay refused the message
    #[error("An error occurred while sending the email")]
    SendError,

    /// Invalid email address
    #[error("Invalid email address")]
    InvalidEmail,

    /// The relay did not answer in time
    #[error("The mail relay timed out")]
    Timeout,

    /// Attachments could not be written to or read from disk
    #[error("Could not stage attachments: {0}")]
    Attachment(#[from] std::io::Error),

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for MailerError {
    fn from(err: anyhow::Error) -> Self {
        MailerError::UnknownError(err)
    }
}

impl From<AddressError> for MailerError {
    fn from(err: AddressError) -> Self {
        debug!("AddressError -> MailerError: {err}");

        MailerError::InvalidEmail
    }
}

impl From<lettre::error::Error> for MailerError {
    fn from(err: lettre::error::Error) -> Self {
        MailerError::UnknownError(err.into())
    }
}
