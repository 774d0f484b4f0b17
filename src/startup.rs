use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    extract::Request,
    response::Response,
    routing::{get, post},
    serve::Serve,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Span, info, info_span};
use uuid::Uuid;

use crate::{
    bulk_send::BulkSendCoordinator,
    configuration::Settings,
    email_client::{EmailTransport, SmtpEmailClient},
    routes::{health_check, send_email},
};

pub struct AppState {
    pub coordinator: BulkSendCoordinator,
}

pub async fn run(
    listener: TcpListener,
    transport: Arc<dyn EmailTransport>,
) -> anyhow::Result<Serve<TcpListener, Router, Router>> {
    // Nothing is shared between requests beyond the transport factory;
    // every batch opens its own session.
    let app_state = Arc::new(AppState {
        coordinator: BulkSendCoordinator::new(transport),
    });
    let app = Router::new()
        .route("/health_check", get(health_check))
        .route("/sendEmail", post(send_email))
        .with_state(app_state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let request_id = Uuid::new_v4();
                    info_span!(
                        "http_request",
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        request_id = ?request_id,
                        status = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response, latency: Duration, span: &Span| {
                    let status = response.status();
                    span.record("status", status.as_u16());
                    info!(parent: span, ?status, ?latency, "Response sent");
                }),
        );

    Ok(axum::serve(listener, app))
}

pub struct Application {
    port: u16,
    server: Serve<TcpListener, Router, Router>,
}

impl Application {
    pub async fn build(configuration: Settings) -> anyhow::Result<Self> {
        let email_client = SmtpEmailClient::from_settings(&configuration.smtp);
        Self::build_with_transport(configuration, Arc::new(email_client)).await
    }

    /// Same as [`Application::build`], relaying through `transport` instead
    /// of the configured SMTP provider.
    pub async fn build_with_transport(
        configuration: Settings,
        transport: Arc<dyn EmailTransport>,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        ))
        .await?;
        let port = listener.local_addr()?.port();
        info!(port, "Listening for send requests");

        let server = run(listener, transport).await?;

        Ok(Self { server, port })
    }

    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        Ok(self.server.await?)
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}
