#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Email gateway server

use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};

use anyhow::{Context, Result};
use ccg_mailer::{
    domain::communication::emails::{
        BaseTemplate, EmailServiceImpl, RequestValidator, TemplateConfig, ValidationConfig,
    },
    infrastructure::{
        config::{BrandingConfig, EmailPolicyConfig},
        email::smtp::{SMTPConfig, SMTPMailer},
        http::{servers::http::HttpServer, state::AppState, HttpServerConfig, Server},
    },
};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The SMTP relay configuration
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// Sender domains and attachment limits
    #[clap(flatten)]
    pub policy: EmailPolicyConfig,

    /// Base template and branding URLs
    #[clap(flatten)]
    pub branding: BrandingConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load environment: {}", e);

            return Err(e.into());
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let template_config = TemplateConfig::from(args.branding);

    if !template_config.base_template_path.is_file() {
        warn!(
            "base template {} not found, templated sends will fail",
            template_config.base_template_path.display()
        );
    }

    let mailer = SMTPMailer::new(&args.smtp).context("failed to configure the SMTP relay")?;
    let emails = EmailServiceImpl::new(
        Arc::new(mailer),
        Arc::new(BaseTemplate::new(template_config)),
    );
    let validator = RequestValidator::new(&ValidationConfig::from(args.policy));

    info!("relaying through {}:{}", args.smtp.host, args.smtp.port);

    let state = AppState::new((&args.server).into(), validator, emails);

    HttpServer::new(
        SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), args.server.http_port),
        state,
    )
    .await?
    .run()
    .await
}
