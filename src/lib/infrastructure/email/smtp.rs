//! SMTP mailer implementation

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{ArgAction, Parser, ValueEnum};
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message as MimeMessage, Tokio1Executor,
};
use tracing::{debug, error, warn};

use crate::domain::communication::mailer::{Mailer, MailerError, Message};

use super::staging::StagingDir;

/// Transport security towards the relay
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SmtpTlsMode {
    /// Upgrade with STARTTLS when the relay offers it, otherwise stay in plain text
    #[default]
    Opportunistic,

    /// Refuse relays that do not offer STARTTLS
    Required,

    /// Connect over TLS from the start, usually on port 465
    Wrapper,

    /// Never use TLS
    None,
}

/// SMTP configuration
#[derive(Clone, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[clap(long = "smtp-host", env = "SMTP_HOST")]
    pub host: String,

    /// The SMTP port
    #[clap(long = "smtp-port", env = "SMTP_PORT", default_value = "587")]
    pub port: u16,

    /// The SMTP username, credentials are only sent when set
    #[clap(long = "smtp-username", env = "SMTP_USERNAME", default_value = "")]
    pub username: String,

    /// The SMTP password
    #[clap(
        long = "smtp-password",
        env = "SMTP_CLIENT_PASSWORD",
        default_value = "",
        hide_env_values = true
    )]
    pub password: String,

    /// Verify the relay's TLS certificate
    #[clap(
        long = "smtp-verify-tls",
        env = "SMTP_VERIFY_TLS",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub verify_tls: bool,

    /// How the connection to the relay is secured
    #[clap(
        long = "smtp-tls",
        env = "SMTP_TLS",
        value_enum,
        default_value_t = SmtpTlsMode::Opportunistic
    )]
    pub tls: SmtpTlsMode,

    /// Seconds to wait for the relay before giving up
    #[clap(long = "smtp-timeout-secs", env = "SMTP_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    /// Where per-send attachment directories are created, defaults to the OS temp dir
    #[clap(long = "attachment-temp-dir", env = "ATTACHMENT_TEMP_DIR")]
    pub temp_dir: Option<PathBuf>,
}

impl SMTPConfig {
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl fmt::Debug for SMTPConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SMTPConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"********")
            .field("verify_tls", &self.verify_tls)
            .field("tls", &self.tls)
            .field("timeout_secs", &self.timeout_secs)
            .field("temp_dir", &self.temp_dir)
            .finish()
    }
}

/// Delivers a composed message to a mail relay
#[async_trait]
pub trait Relay: Send + Sync + 'static {
    /// Connect to the relay and send `message`
    async fn dial_and_send(&self, message: MimeMessage) -> Result<(), MailerError>;
}

#[async_trait]
impl Relay for AsyncSmtpTransport<Tokio1Executor> {
    async fn dial_and_send(&self, message: MimeMessage) -> Result<(), MailerError> {
        match self.send(message).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_timeout() => Err(MailerError::Timeout),
            Err(err) if err.is_permanent() || err.is_transient() => {
                error!("SMTP relay rejected the message: {err}");
                Err(MailerError::SendError)
            }
            Err(err) => Err(MailerError::UnknownError(err.into())),
        }
    }
}

/// The lettre TLS setting for `config`
fn tls(config: &SMTPConfig) -> Result<Tls> {
    if config.tls == SmtpTlsMode::None {
        return Ok(Tls::None);
    }

    let parameters = TlsParameters::builder(config.host.clone())
        .dangerous_accept_invalid_certs(!config.verify_tls)
        .build()
        .context("failed to build SMTP TLS parameters")?;

    Ok(match config.tls {
        SmtpTlsMode::Opportunistic => Tls::Opportunistic(parameters),
        SmtpTlsMode::Required => Tls::Required(parameters),
        SmtpTlsMode::Wrapper => Tls::Wrapper(parameters),
        SmtpTlsMode::None => Tls::None,
    })
}

/// Builds the async SMTP transport described by `config`
pub fn transport(config: &SMTPConfig) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
    let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        .port(config.port)
        .tls(tls(config)?)
        .timeout(Some(config.timeout()));

    if !config.username.is_empty() {
        builder = builder.credentials(Credentials::new(
            config.username.clone(),
            config.password.clone(),
        ));
    }

    Ok(builder.build())
}

/// SMTP mailer.
///
/// Every send stages its attachments as files in a fresh directory under
/// `temp_dir`, composes a multipart message from them and hands it to the
/// relay within `timeout`. The directory is removed whatever the outcome.
pub struct SMTPMailer<R: Relay = AsyncSmtpTransport<Tokio1Executor>> {
    relay: Arc<R>,
    temp_dir: PathBuf,
    timeout: Duration,
}

impl SMTPMailer {
    /// Create a new SMTP mailer
    pub fn new(config: &SMTPConfig) -> Result<Self> {
        Ok(Self::with_relay(
            transport(config)?,
            config.temp_dir(),
            config.timeout(),
        ))
    }
}

impl<R: Relay> SMTPMailer<R> {
    /// Create a mailer sending through `relay`
    pub fn with_relay(relay: R, temp_dir: PathBuf, timeout: Duration) -> Self {
        Self {
            relay: Arc::new(relay),
            temp_dir,
            timeout,
        }
    }

    async fn compose(
        &self,
        message: &Message,
        staging: &StagingDir,
    ) -> Result<MimeMessage, MailerError> {
        let mut builder = MimeMessage::builder()
            .from(message.from.as_str().parse::<Mailbox>()?)
            .subject(message.subject.clone());

        for recipient in &message.to {
            builder = builder.to(recipient.as_str().parse::<Mailbox>()?);
        }

        let body = SinglePart::builder()
            .header(body_content_type(&message.body.mime_type))
            .body(message.body.content.clone());

        let mut parts = MultiPart::mixed().singlepart(body);

        for attachment in &message.attachments {
            let path = staging
                .write(&attachment.file_name, &attachment.data)
                .await?;

            parts = parts.singlepart(attach_file(&path).await?);
        }

        Ok(builder.multipart(parts)?)
    }

    async fn compose_and_relay(
        &self,
        message: &Message,
        staging: &StagingDir,
    ) -> Result<(), MailerError> {
        let email = self.compose(message, staging).await?;

        debug!(
            "relaying message with {} attachment(s) staged in {}",
            message.attachments.len(),
            staging.path().display()
        );

        match tokio::time::timeout(self.timeout, self.relay.dial_and_send(email)).await {
            Ok(result) => result,
            Err(_) => {
                error!("mail relay did not answer within {:?}", self.timeout);
                Err(MailerError::Timeout)
            }
        }
    }
}

#[async_trait]
impl<R: Relay> Mailer for SMTPMailer<R> {
    async fn send_email(&self, message: &Message) -> Result<(), MailerError> {
        let staging = StagingDir::create(&self.temp_dir).await?;

        let result = self.compose_and_relay(message, &staging).await;

        staging.remove().await;

        result
    }
}

impl<R: Relay> Clone for SMTPMailer<R> {
    fn clone(&self) -> Self {
        Self {
            relay: Arc::clone(&self.relay),
            temp_dir: self.temp_dir.clone(),
            timeout: self.timeout,
        }
    }
}

impl<R: Relay> fmt::Debug for SMTPMailer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SMTPMailer")
            .field("temp_dir", &self.temp_dir)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn body_content_type(mime_type: &str) -> ContentType {
    let mime_type = if mime_type.starts_with("text/") && !mime_type.contains("charset") {
        format!("{mime_type}; charset=utf-8")
    } else {
        mime_type.to_string()
    };

    ContentType::parse(&mime_type).unwrap_or_else(|_| {
        warn!("unrecognised body MIME type {mime_type:?}, sending as text/plain");
        ContentType::TEXT_PLAIN
    })
}

async fn attach_file(path: &Path) -> Result<SinglePart, MailerError> {
    let data = tokio::fs::read(path).await?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let content_type = ContentType::parse(
        mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str(),
    )
    .unwrap_or(ContentType::TEXT_PLAIN);

    Ok(Attachment::new(file_name).body(data, content_type))
}
