//! Mailer module

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

mod errors;
mod message;

pub use errors::MailerError;
pub use message::Message;

/// Hands finished messages to a mail relay
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Send a message
    ///
    /// # Arguments
    /// * `message` - The [`Message`] to send, with decoded attachments.
    ///
    /// # Returns
    /// A [`Result`] indicating whether the relay accepted the message.
    async fn send_email(&self, message: &Message) -> Result<(), MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn send_email(&self, message: &Message) -> Result<(), MailerError>;
    }
}

#[cfg(test)]
pub mod tests {
    pub use super::MockMailer;
}
