//! Email dispatch service

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::{
    email_addresses::EmailAddress,
    mailer::{Mailer, Message},
};

use super::{BaseTemplate, Email, SendEmailError};

/// Email service
#[async_trait]
pub trait EmailService: Clone + Send + Sync + 'static {
    /// Sends a built email.
    ///
    /// When the email asks for it, the body is first wrapped in the base
    /// template. Nothing is retried.
    ///
    /// # Returns
    /// - [`Ok`] once the relay accepted the message.
    /// - [`Err`] with [`SendEmailError::Template`] if templating failed, in
    ///   which case the mailer is never called.
    /// - [`Err`] with [`SendEmailError::Mailer`] if the mailer failed.
    async fn send_email(&self, email: Email) -> Result<(), SendEmailError>;
}

#[cfg(test)]
mock! {
    pub EmailService {}

    impl Clone for EmailService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl EmailService for EmailService {
        async fn send_email(&self, email: Email) -> Result<(), SendEmailError>;
    }
}

/// Email service implementation
#[derive(Debug, Clone)]
pub struct EmailServiceImpl<M>
where
    M: Mailer,
{
    mailer: Arc<M>,
    template: Arc<BaseTemplate>,
}

impl<M> EmailServiceImpl<M>
where
    M: Mailer,
{
    /// Creates a new email service.
    pub fn new(mailer: Arc<M>, template: Arc<BaseTemplate>) -> Self {
        Self { mailer, template }
    }
}

#[async_trait]
impl<M> EmailService for EmailServiceImpl<M>
where
    M: Mailer,
{
    async fn send_email(&self, mut email: Email) -> Result<(), SendEmailError> {
        if email.include_base_template {
            email.body.content = self.template.embed(&email.body.content).map_err(|err| {
                error!("could not embed content in base template: {err:?}");
                err
            })?;
        }

        let message = Message::from(email);

        self.mailer.send_email(&message).await.map_err(|err| {
            error!("mailer failed to send email: {err}");
            err
        })?;

        let recipients = message
            .to
            .iter()
            .map(EmailAddress::masked)
            .collect::<Vec<_>>()
            .join(", ");

        info!("email sent successfully to {recipients}");

        Ok(())
    }
}
