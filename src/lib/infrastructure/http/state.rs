//! Application state module

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};

use crate::{
    domain::communication::emails::{EmailService, RequestValidator},
    infrastructure::http::HttpServerConfig,
};

/// Application configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Largest request body accepted, in bytes
    pub max_request_bytes: usize,
}

impl From<&HttpServerConfig> for AppConfig {
    fn from(config: &HttpServerConfig) -> Self {
        Self {
            max_request_bytes: config.max_request_bytes,
        }
    }
}

/// Global application state
#[derive(Clone)]
pub struct AppState<E: EmailService> {
    /// The time the server started
    pub start_time: DateTime<Utc>,

    /// The application configuration
    pub config: AppConfig,

    /// Send request validator
    pub validator: Arc<RequestValidator>,

    /// Email service
    pub emails: Arc<E>,
}

/// Implementation of the application state
impl<E> AppState<E>
where
    E: EmailService,
{
    /// Create a new application state
    pub fn new(config: AppConfig, validator: RequestValidator, emails: E) -> Self {
        Self {
            start_time: Utc::now(),
            config,
            validator: Arc::new(validator),
            emails: Arc::new(emails),
        }
    }
}

impl<E> fmt::Debug for AppState<E>
where
    E: EmailService,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("start_time", &self.start_time)
            .field("config", &self.config)
            .field("validator", &self.validator)
            .field("emails", &"EmailService")
            .finish()
    }
}
