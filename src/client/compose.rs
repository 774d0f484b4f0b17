use secrecy::{ExposeSecret, SecretString};

use super::{
    api::ApiClient,
    field_store::{FieldStore, FormField},
};
use crate::domain::{RecipientInput, SendRequest, SendResult};

pub const DEFAULT_BODY: &str = "<p>Hello World!</p>";
pub const INCOMPLETE_STATUS: &str = "Please fill all fields correctly.";
pub const SENDING_STATUS: &str = "Sending emails...";
pub const SENT_STATUS: &str = "Emails sent successfully!";

/// State of the compose screen. Text fields are cached in `S` as they change;
/// the recipient list lives only as long as the form.
pub struct ComposeForm<S> {
    store: S,
    sender_email: String,
    sender_secret: SecretString,
    subject: String,
    body_html: String,
    recipients: RecipientInput,
    status: Option<String>,
}

impl<S: FieldStore> ComposeForm<S> {
    /// Hydrates the form from whatever `store` remembers.
    pub fn load(store: S) -> Self {
        let read = |field: FormField| store.get(field.key()).filter(|v| !v.is_empty());
        let sender_email = read(FormField::SenderEmail).unwrap_or_default();
        let sender_secret = SecretString::from(read(FormField::SenderSecret).unwrap_or_default());
        let subject = read(FormField::Subject).unwrap_or_default();
        let body_html = read(FormField::Body).unwrap_or_else(|| DEFAULT_BODY.to_owned());

        Self {
            store,
            sender_email,
            sender_secret,
            subject,
            body_html,
            recipients: RecipientInput::new(),
            status: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sender_email(&self) -> &str {
        &self.sender_email
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body_html(&self) -> &str {
        &self.body_html
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn recipients(&self) -> &RecipientInput {
        &self.recipients
    }

    pub fn recipients_mut(&mut self) -> &mut RecipientInput {
        &mut self.recipients
    }

    pub fn set_sender_email(&mut self, value: impl Into<String>) {
        self.sender_email = value.into();
        Self::remember(&mut self.store, FormField::SenderEmail, &self.sender_email);
    }

    pub fn set_sender_secret(&mut self, value: SecretString) {
        self.sender_secret = value;
        Self::remember(
            &mut self.store,
            FormField::SenderSecret,
            self.sender_secret.expose_secret(),
        );
    }

    pub fn set_subject(&mut self, value: impl Into<String>) {
        self.subject = value.into();
        Self::remember(&mut self.store, FormField::Subject, &self.subject);
    }

    /// Editor updates are cached even when they empty the body.
    pub fn set_body_html(&mut self, value: impl Into<String>) {
        self.body_html = value.into();
        self.store.set(FormField::Body.key(), &self.body_html);
    }

    fn remember(store: &mut S, field: FormField, value: &str) {
        if !value.is_empty() {
            store.set(field.key(), value);
        }
    }

    /// Packages the form into a request, or flags the form as incomplete.
    pub fn prepare(&mut self) -> Option<SendRequest> {
        let request = SendRequest::new(
            self.sender_email.clone(),
            self.sender_secret.clone(),
            self.recipients.recipients().values(),
            self.subject.clone(),
            self.body_html.clone(),
        );
        match request {
            Ok(request) => {
                self.status = Some(SENDING_STATUS.to_owned());
                Some(request)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Form is incomplete");
                self.status = Some(INCOMPLETE_STATUS.to_owned());
                None
            }
        }
    }

    /// Folds the server's verdict back into the form.
    pub fn finish(&mut self, outcome: Result<SendResult, reqwest::Error>) {
        let status = match outcome {
            Ok(SendResult::Success) => {
                self.recipients.recipients_mut().clear();
                SENT_STATUS.to_owned()
            }
            Ok(SendResult::Failure { reason }) => format!("Error: {}", reason),
            Err(e) => format!("Error: {}", e),
        };
        self.status = Some(status);
    }

    pub async fn submit(&mut self, api_client: &ApiClient) {
        let Some(request) = self.prepare() else {
            return;
        };
        let outcome = api_client.send_emails(&request).await;
        self.finish(outcome);
    }
}
