//! Emails: the inbound request shape, its validation, the domain model and
//! the dispatch service.

mod email;
mod encoding;
mod errors;
mod request;
mod service;
mod template;
pub mod validation;

pub use email::{Attachment, Email, MessageBody};
pub use encoding::{decode_base64, decode_base64_text, encode_base64};
pub use errors::{BuildEmailError, DecodeError, SendEmailError, TemplateError, ValidationError};
pub use request::{AttachmentRequest, EmailRequest, MessageBodyRequest, DEFAULT_MIME_TYPE};
pub use service::{EmailService, EmailServiceImpl};
pub use template::{BaseTemplate, LogoUrls, TemplateConfig, Urls};
pub use validation::{RequestValidator, ValidationConfig, ValidationRule};
