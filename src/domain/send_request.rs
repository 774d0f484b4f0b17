use secrecy::{ExposeSecret, SecretString};
use validator::ValidateLength;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("missing required field `{0}`")]
pub struct MissingFieldError(pub &'static str);

fn required(value: &str, field: &'static str) -> Result<(), MissingFieldError> {
    if value.validate_length(Some(1_u64), None, None) {
        Ok(())
    } else {
        Err(MissingFieldError(field))
    }
}

/// Credentials the user authenticates to the mail provider with.
#[derive(Debug, Clone)]
pub struct SenderCredentials {
    email: String,
    secret: SecretString,
}

impl SenderCredentials {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn secret(&self) -> &SecretString {
        &self.secret
    }
}

/// One send action: every field present, at least one recipient.
#[derive(Debug, Clone)]
pub struct SendRequest {
    sender: SenderCredentials,
    recipients: Vec<String>,
    subject: String,
    body_html: String,
}

impl SendRequest {
    pub fn new(
        sender_email: String,
        sender_secret: SecretString,
        recipients: Vec<String>,
        subject: String,
        body_html: String,
    ) -> Result<Self, MissingFieldError> {
        required(&sender_email, "useremail")?;
        required(sender_secret.expose_secret(), "password")?;
        if !recipients.validate_length(Some(1_u64), None, None) {
            return Err(MissingFieldError("emailList"));
        }
        required(&subject, "subject")?;
        required(&body_html, "content")?;

        Ok(Self {
            sender: SenderCredentials {
                email: sender_email,
                secret: sender_secret,
            },
            recipients,
            subject,
            body_html,
        })
    }

    pub fn sender(&self) -> &SenderCredentials {
        &self.sender
    }

    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body_html(&self) -> &str {
        &self.body_html
    }
}

/// Verdict for a whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendResult {
    Success,
    Failure { reason: String },
}
