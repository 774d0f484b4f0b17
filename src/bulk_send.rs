use std::sync::Arc;

use crate::{
    domain::{SendRequest, SendResult},
    email_client::{DeliveryError, EmailTransport, OutgoingEmail},
};

/// Relays one batch through a fresh transport session, one recipient at a
/// time, stopping at the first failure.
#[derive(Clone)]
pub struct BulkSendCoordinator {
    transport: Arc<dyn EmailTransport>,
}

impl BulkSendCoordinator {
    pub fn new(transport: Arc<dyn EmailTransport>) -> Self {
        Self { transport }
    }

    #[tracing::instrument(
        name = "Sending a batch of emails",
        skip(self, request),
        fields(
            sender_email = %request.sender().email(),
            recipients = request.recipients().len(),
            delivered = tracing::field::Empty,
        )
    )]
    pub async fn send(&self, request: &SendRequest) -> SendResult {
        match self.deliver_all(request).await {
            Ok(()) => {
                tracing::info!("Batch sent");
                SendResult::Success
            }
            Err(e) => {
                tracing::error!(error = %e, "Batch aborted");
                SendResult::Failure {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn deliver_all(&self, request: &SendRequest) -> Result<(), DeliveryError> {
        let mut session = self.transport.open_session(request.sender()).await?;

        // Earlier recipients stay delivered if a later one fails.
        for (delivered, recipient) in request.recipients().iter().enumerate() {
            tracing::Span::current().record("delivered", delivered);
            session
                .send_one(OutgoingEmail {
                    recipient,
                    subject: request.subject(),
                    html_body: request.body_html(),
                })
                .await?;
        }
        tracing::Span::current().record("delivered", request.recipients().len());
        Ok(())
    }
}
