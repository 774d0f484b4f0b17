use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{MissingFieldError, SendRequest, SendResult},
    startup::AppState,
};

pub const SENT_MESSAGE: &str = "Emails sent successfully";
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";
pub const SEND_FAILED_MESSAGE: &str = "Failed to send emails";
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Wire shape of `POST /sendEmail`. Every field is optional here so that an
/// absent one turns into a `MissingFieldError` instead of a decode failure.
#[derive(Deserialize)]
pub struct SendEmailBody {
    useremail: Option<String>,
    password: Option<SecretString>,
    #[serde(rename = "emailList")]
    email_list: Option<Vec<String>>,
    subject: Option<String>,
    content: Option<String>,
}

impl TryFrom<SendEmailBody> for SendRequest {
    type Error = MissingFieldError;

    fn try_from(value: SendEmailBody) -> Result<Self, Self::Error> {
        SendRequest::new(
            value.useremail.ok_or(MissingFieldError("useremail"))?,
            value.password.ok_or(MissingFieldError("password"))?,
            value.email_list.ok_or(MissingFieldError("emailList"))?,
            value.subject.ok_or(MissingFieldError("subject"))?,
            value.content.ok_or(MissingFieldError("content"))?,
        )
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct SendEmailResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendEmailResponse {
    fn new(message: &str, error: Option<String>) -> Self {
        Self {
            message: message.to_owned(),
            error,
        }
    }
}

#[tracing::instrument(name = "Relaying a bulk send request", skip(app_state, body))]
pub async fn send_email(
    State(app_state): State<Arc<AppState>>,
    body: Result<Json<SendEmailBody>, JsonRejection>,
) -> Result<impl IntoResponse, SendEmailError> {
    let Json(body) = body?;
    let request = SendRequest::try_from(body)?;

    match app_state.coordinator.send(&request).await {
        SendResult::Success => Ok((
            StatusCode::OK,
            Json(SendEmailResponse::new(SENT_MESSAGE, None)),
        )),
        SendResult::Failure { reason } => Err(SendEmailError::DeliveryFailed(reason)),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SendEmailError {
    #[error("malformed send request, {0}")]
    InvalidBody(#[from] JsonRejection),
    #[error("rejected send request, {0}")]
    MissingField(#[from] MissingFieldError),
    #[error("couldn't send emails, {0}")]
    DeliveryFailed(String),
}

impl IntoResponse for SendEmailError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self);
        let (status, body) = match self {
            SendEmailError::InvalidBody(rejection) => (
                StatusCode::BAD_REQUEST,
                SendEmailResponse::new(INVALID_BODY_MESSAGE, Some(rejection.body_text())),
            ),
            SendEmailError::MissingField(_) => (
                StatusCode::BAD_REQUEST,
                SendEmailResponse::new(MISSING_FIELDS_MESSAGE, None),
            ),
            SendEmailError::DeliveryFailed(reason) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                SendEmailResponse::new(SEND_FAILED_MESSAGE, Some(reason)),
            ),
        };
        (status, Json(body)).into_response()
    }
}
