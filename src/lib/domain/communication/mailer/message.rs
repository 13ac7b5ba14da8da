//! Email message

use crate::domain::communication::{
    email_addresses::EmailAddress,
    emails::{Attachment, Email, MessageBody},
};

/// A message as handed to the [`Mailer`](super::Mailer)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// The sender of the email
    pub from: EmailAddress,

    /// The recipients of the email
    pub to: Vec<EmailAddress>,

    /// The subject of the email
    pub subject: String,

    /// The final body, after any templating
    pub body: MessageBody,

    /// Decoded attachments
    pub attachments: Vec<Attachment>,
}

impl From<Email> for Message {
    fn from(email: Email) -> Self {
        Self {
            from: email.from,
            to: email.to,
            subject: email.subject,
            body: email.body,
            attachments: email.attachments,
        }
    }
}
