use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use secrecy::ExposeSecret;

use crate::{
    configuration::{SmtpSettings, SmtpTls},
    domain::SenderCredentials,
};

#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    #[error(transparent)]
    InvalidAddress(#[from] lettre::address::AddressError),
    #[error(transparent)]
    Message(#[from] lettre::error::Error),
    #[error(transparent)]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("{0}")]
    Provider(String),
}

/// A single copy of the batch addressed to one recipient.
#[derive(Debug, Clone, Copy)]
pub struct OutgoingEmail<'a> {
    pub recipient: &'a str,
    pub subject: &'a str,
    pub html_body: &'a str,
}

/// Opens authenticated sessions against the mail provider.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn open_session(
        &self,
        sender: &SenderCredentials,
    ) -> Result<Box<dyn TransportSession>, DeliveryError>;
}

/// An authenticated channel, alive for one batch.
#[async_trait]
pub trait TransportSession: Send {
    async fn send_one(&mut self, email: OutgoingEmail<'_>) -> Result<(), DeliveryError>;
}

pub struct SmtpEmailClient {
    host: String,
    port: u16,
    tls: SmtpTls,
    timeout: Duration,
}

impl SmtpEmailClient {
    pub fn new(host: String, port: u16, tls: SmtpTls, timeout: Duration) -> Self {
        Self {
            host,
            port,
            tls,
            timeout,
        }
    }

    pub fn from_settings(settings: &SmtpSettings) -> Self {
        Self::new(
            settings.host.clone(),
            settings.port,
            settings.tls,
            settings.timeout(),
        )
    }
}

#[async_trait]
impl EmailTransport for SmtpEmailClient {
    #[tracing::instrument(
        name = "Opening an SMTP session",
        skip(self, sender),
        fields(host = %self.host, port = self.port, sender_email = %sender.email())
    )]
    async fn open_session(
        &self,
        sender: &SenderCredentials,
    ) -> Result<Box<dyn TransportSession>, DeliveryError> {
        let from: Mailbox = sender.email().parse()?;
        let credentials = Credentials::new(
            sender.email().to_owned(),
            sender.secret().expose_secret().to_owned(),
        );

        let builder = match self.tls {
            SmtpTls::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)?,
            SmtpTls::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)?,
            SmtpTls::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host),
        };
        let transport = builder
            .port(self.port)
            .credentials(credentials)
            .timeout(Some(self.timeout))
            .build();

        Ok(Box::new(SmtpSession { transport, from }))
    }
}

struct SmtpSession {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

#[async_trait]
impl TransportSession for SmtpSession {
    async fn send_one(&mut self, email: OutgoingEmail<'_>) -> Result<(), DeliveryError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.recipient.parse()?)
            .subject(email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.to_owned())?;

        self.transport.send(message).await?;
        Ok(())
    }
}
