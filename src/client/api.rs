use std::time::Duration;

use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::{
    domain::{SendRequest, SendResult},
    routes::SendEmailResponse,
};

#[derive(Serialize)]
struct SendEmailPayload<'a> {
    useremail: &'a str,
    password: &'a str,
    #[serde(rename = "emailList")]
    email_list: &'a [String],
    subject: &'a str,
    content: &'a str,
}

/// Talks to the `/sendEmail` endpoint of a running server.
pub struct ApiClient {
    http_client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let http_client = Client::builder().timeout(timeout).build().unwrap();
        Self {
            http_client,
            base_url,
        }
    }

    /// Posts the batch and waits for the server's verdict. Failure reasons
    /// carry the server's `message`, followed by its `error` detail if any.
    #[tracing::instrument(name = "Submitting a batch", skip(self, request))]
    pub async fn send_emails(&self, request: &SendRequest) -> Result<SendResult, reqwest::Error> {
        let url = format!("{}/sendEmail", self.base_url);
        let payload = SendEmailPayload {
            useremail: request.sender().email(),
            password: request.sender().secret().expose_secret(),
            email_list: request.recipients(),
            subject: request.subject(),
            content: request.body_html(),
        };

        let response = self.http_client.post(&url).json(&payload).send().await?;
        let succeeded = response.status().is_success();
        let body: SendEmailResponse = response.json().await?;

        if succeeded {
            Ok(SendResult::Success)
        } else {
            let reason = match body.error {
                Some(error) => format!("{}: {}", body.message, error),
                None => body.message,
            };
            Ok(SendResult::Failure { reason })
        }
    }
}
