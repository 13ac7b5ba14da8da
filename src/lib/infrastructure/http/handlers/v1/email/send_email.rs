//! Send email handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::communication::emails::{
        AttachmentRequest, Email, EmailRequest, EmailService, MessageBodyRequest,
    },
    infrastructure::http::{
        errors::{ApiError, ErrorResponse},
        state::AppState,
    },
};

/// Send email request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SendEmailBody {
    /// Sender address, must belong to an allowed domain
    #[schema(example = "gola@gola.xyz")]
    pub from: String,

    /// Recipient addresses, at least one
    #[schema(example = json!(["some@gmail.com"]))]
    pub to: Vec<String>,

    /// Subject line
    #[schema(example = "Hi!")]
    pub subject: String,

    /// Message body
    pub message_body: MessageBodyPayload,

    /// Attachments
    #[serde(default)]
    pub attachments: Option<Vec<AttachmentPayload>>,

    /// Wrap the body in the branded base template
    #[serde(default)]
    pub include_base_template: bool,
}

/// Message body of a [`SendEmailBody`]
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageBodyPayload {
    /// MIME type of the decoded content, `text/plain` when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "text/html")]
    pub mime_type: Option<String>,

    /// Base64 encoded content
    #[serde(default)]
    #[schema(example = "SGVsbG8h")]
    pub base64_encoded_content: String,
}

/// Attachment of a [`SendEmailBody`]
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AttachmentPayload {
    /// File name, with a supported extension
    #[serde(default)]
    #[schema(example = "attachment.pdf")]
    pub file_name: String,

    /// Base64 encoded file content
    #[serde(default)]
    #[schema(example = "QXR0YWNobWVudCB3aXRoIHNvbWUgZGF0YSE=")]
    pub base64_encoded_data: String,
}

impl From<SendEmailBody> for EmailRequest {
    fn from(body: SendEmailBody) -> Self {
        Self {
            from: body.from,
            to: body.to,
            subject: body.subject,
            message_body: MessageBodyRequest {
                mime_type: body.message_body.mime_type,
                base64_encoded_content: body.message_body.base64_encoded_content,
            },
            attachments: body
                .attachments
                .unwrap_or_default()
                .into_iter()
                .map(|attachment| AttachmentRequest {
                    file_name: attachment.file_name,
                    base64_encoded_data: attachment.base64_encoded_data,
                })
                .collect(),
            include_base_template: body.include_base_template,
        }
    }
}

/// Send an email
///
/// Validates the request, decodes the body and attachments, optionally wraps
/// the body in the branded base template and relays the result over SMTP.
#[utoipa::path(
    post,
    operation_id = "send_email",
    tag = "Email",
    path = "/api/ccg/v1/email/send",
    request_body = SendEmailBody,
    responses(
        (status = StatusCode::NO_CONTENT, description = "Email sent"),
        (status = StatusCode::BAD_REQUEST, description = "Request is malformed or invalid", body = ErrorResponse, example = json!({"error_code": "ERR_CCG_SERVICE_PAYLOAD_INVALID", "error_message": "One or more of the request parameters are missing or invalid"})),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Templating or relaying failed", body = ErrorResponse, example = json!({"error_code": "ERR_CCG_SERVICE_INTERNAL_SERVER_ERROR", "error_message": "something went wrong"})),
    )
)]
pub async fn handler<E: EmailService>(
    State(state): State<AppState<E>>,
    body: Result<Json<SendEmailBody>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body?;
    let request = EmailRequest::from(body);

    state.validator.validate(&request)?;

    let email = Email::try_from(request)?;

    state.emails.send_email(email).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, sync::Arc};

    use axum::{body::Bytes, http::StatusCode};
    use axum_test::{TestResponse, TestServer};
    use serde_json::{json, Value};
    use testresult::TestResult;

    use crate::{
        domain::communication::{
            emails::{
                encode_base64, tests::MockEmailService, BaseTemplate, EmailServiceImpl,
                SendEmailError, TemplateConfig,
            },
            mailer::{tests::MockMailer, MailerError},
        },
        infrastructure::http::{
            errors::{ErrorResponse, INTERNAL_SERVER_ERROR_CODE, PAYLOAD_INVALID_CODE},
            servers::http::router,
            state::{
                tests::{test_config, test_state, test_validator, TEST_ATTACHMENT_LIMIT},
                AppState,
            },
        },
    };

    const PATH: &str = "/api/ccg/v1/email/send";

    fn body() -> Value {
        json!({
            "from": "gola@gola.xyz",
            "to": ["some@gmail.com"],
            "subject": "Hi!",
            "message_body": {
                "mime_type": "text/html",
                "base64_encoded_content": "SGVsbG8h"
            },
            "attachments": [{
                "file_name": "attachment.pdf",
                "base64_encoded_data": "QXR0YWNobWVudCB3aXRoIHNvbWUgZGF0YSE="
            }]
        })
    }

    fn rejecting_service() -> MockEmailService {
        let mut emails = MockEmailService::new();
        emails.expect_send_email().times(0);
        emails
    }

    fn accepting_service() -> MockEmailService {
        let mut emails = MockEmailService::new();
        emails.expect_send_email().times(1).returning(|_| Ok(()));
        emails
    }

    async fn post(emails: MockEmailService, body: &Value) -> TestResult<TestResponse> {
        Ok(TestServer::new(router(test_state(Some(emails))))?
            .post(PATH)
            .json(body)
            .await)
    }

    fn assert_payload_invalid(response: &TestResponse) {
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<ErrorResponse>().error_code, PAYLOAD_INVALID_CODE);
    }

    #[tokio::test]
    async fn test_send_email_success() -> TestResult {
        let mut emails = MockEmailService::new();

        emails
            .expect_send_email()
            .times(1)
            .withf(|email| {
                email.from.as_str() == "gola@gola.xyz"
                    && email.to.len() == 1
                    && email.to[0].as_str() == "some@gmail.com"
                    && email.subject == "Hi!"
                    && email.body.mime_type == "text/html"
                    && email.body.content == "Hello!"
                    && email.attachments.len() == 1
                    && email.attachments[0].file_name == "attachment.pdf"
                    && email.attachments[0].data == b"Attachment with some data!"
                    && !email.include_base_template
            })
            .returning(|_| Ok(()));

        let response = post(emails, &body()).await?;

        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
        assert!(response.as_bytes().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_mime_type_defaults_to_text_plain() -> TestResult {
        let mut emails = MockEmailService::new();

        emails
            .expect_send_email()
            .times(1)
            .withf(|email| email.body.mime_type == "text/plain")
            .returning(|_| Ok(()));

        let mut body = body();
        body["message_body"] = json!({ "base64_encoded_content": "SGVsbG8h" });

        let response = post(emails, &body).await?;

        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

        Ok(())
    }

    #[tokio::test]
    async fn test_attachments_may_be_omitted_or_null() -> TestResult {
        for attachments in [None, Some(Value::Null), Some(json!([]))] {
            let mut body = body();

            match attachments {
                Some(value) => body["attachments"] = value,
                None => {
                    if let Some(object) = body.as_object_mut() {
                        object.remove("attachments");
                    }
                }
            }

            let response = post(accepting_service(), &body).await?;

            assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_subject() -> TestResult {
        let mut body = body();
        body["subject"] = json!("");

        assert_payload_invalid(&post(rejecting_service(), &body).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_required_fields() -> TestResult {
        for field in ["from", "to", "subject", "message_body"] {
            let mut body = body();
            if let Some(object) = body.as_object_mut() {
                object.remove(field);
            }

            assert_payload_invalid(&post(rejecting_service(), &body).await?);
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_json() -> TestResult {
        let response = TestServer::new(router(test_state(Some(rejecting_service()))))?
            .post(PATH)
            .bytes(Bytes::from_static(br#"{"from": "gola@gola.xyz", "#))
            .content_type("application/json")
            .await;

        assert_payload_invalid(&response);

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_content_type() -> TestResult {
        let response = TestServer::new(router(test_state(Some(rejecting_service()))))?
            .post(PATH)
            .text(body().to_string())
            .await;

        assert_payload_invalid(&response);

        Ok(())
    }

    #[tokio::test]
    async fn test_sender_domain_not_allowed() -> TestResult {
        let mut body = body();
        body["from"] = json!("gola@gmail.com");

        assert_payload_invalid(&post(rejecting_service(), &body).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_sender_domain_ignores_case() -> TestResult {
        let mut body = body();
        body["from"] = json!("Gola@GOLA.XYZ");

        let response = post(accepting_service(), &body).await?;

        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_recipients() -> TestResult {
        for to in [json!([]), json!(["invalid-email.com"]), json!("some@gmail.com")] {
            let mut body = body();
            body["to"] = to;

            assert_payload_invalid(&post(rejecting_service(), &body).await?);
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_body_content() -> TestResult {
        for content in ["", "ICAg", "not base64", "//79"] {
            let mut body = body();
            body["message_body"]["base64_encoded_content"] = json!(content);

            assert_payload_invalid(&post(rejecting_service(), &body).await?);
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_unsupported_attachment_names() -> TestResult {
        for file_name in ["virus.exe", "attachment", "attachment.", ".pdf"] {
            let mut body = body();
            body["attachments"][0]["file_name"] = json!(file_name);

            assert_payload_invalid(&post(rejecting_service(), &body).await?);
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_attachment_without_data() -> TestResult {
        let mut body = body();
        body["attachments"] = json!([{ "file_name": "attachment.pdf" }]);

        assert_payload_invalid(&post(rejecting_service(), &body).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_attachment_names() -> TestResult {
        let mut body = body();
        body["attachments"] = json!([
            { "file_name": "attachment.pdf", "base64_encoded_data": "QXR0YWNobWVudDEgRGF0YSE=" },
            { "file_name": "attachment.pdf", "base64_encoded_data": "QXR0YWNobWVudDIgRGF0YSE=" }
        ]);

        assert_payload_invalid(&post(rejecting_service(), &body).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_attachment_size_limit_is_inclusive() -> TestResult {
        let filler = encode_base64(&[b'a'; TEST_ATTACHMENT_LIMIT - 4]);

        let mut at_limit = body();
        at_limit["attachments"] = json!([
            { "file_name": "first.txt", "base64_encoded_data": filler },
            { "file_name": "second.txt", "base64_encoded_data": encode_base64(b"abcd") }
        ]);

        let mut over_limit = at_limit.clone();
        over_limit["attachments"][1]["base64_encoded_data"] = json!(encode_base64(b"abcde"));

        assert_eq!(
            post(accepting_service(), &at_limit).await?.status_code(),
            StatusCode::NO_CONTENT
        );
        assert_payload_invalid(&post(rejecting_service(), &over_limit).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_send_failure() -> TestResult {
        let mut emails = MockEmailService::new();

        emails
            .expect_send_email()
            .times(1)
            .returning(|_| Err(SendEmailError::Mailer(MailerError::SendError)));

        let response = post(emails, &body()).await?;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = response.json::<ErrorResponse>();

        assert_eq!(json.error_code, INTERNAL_SERVER_ERROR_CODE);
        assert_eq!(json.error_message, "something went wrong");

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_base_template_never_reaches_the_mailer() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer.expect_send_email().times(0);

        let emails = EmailServiceImpl::new(
            Arc::new(mailer),
            Arc::new(BaseTemplate::new(TemplateConfig {
                base_template_path: PathBuf::from("/nonexistent/base.html"),
                ..Default::default()
            })),
        );

        let state = AppState::new(test_config(), test_validator(), emails);

        let mut body = body();
        body["include_base_template"] = json!(true);

        let response = TestServer::new(router(state))?.post(PATH).json(&body).await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<ErrorResponse>().error_code,
            INTERNAL_SERVER_ERROR_CODE
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_same_payload_gets_the_same_decision() -> TestResult {
        let server = TestServer::new(router(test_state(Some(rejecting_service()))))?;

        let mut body = body();
        body["attachments"][0]["file_name"] = json!("virus.exe");

        for _ in 0..3 {
            assert_payload_invalid(&server.post(PATH).json(&body).await);
        }

        Ok(())
    }
}
