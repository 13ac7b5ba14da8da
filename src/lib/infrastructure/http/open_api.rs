//! OpenAPI module

use utoipa::OpenApi;

use crate::infrastructure::http::{
    errors::ErrorResponse,
    handlers::{health, v1::email::send_email},
};

#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "CCG Mailer",
        description = "Internal gateway that validates, templates and relays email over SMTP"
    ),
    paths(send_email::handler, health::handler),
    components(schemas(
        send_email::SendEmailBody,
        send_email::MessageBodyPayload,
        send_email::AttachmentPayload,
        health::HealthResponse,
        ErrorResponse,
    )),
    tags(
        (name = "Email", description = "Outbound email"),
        (name = "System", description = "Service health")
    )
)]
pub struct ApiDocs;
