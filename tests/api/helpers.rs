use std::sync::{Arc, LazyLock, Mutex};

use async_trait::async_trait;
use bulk_mailer::{
    configuration::get_configuration,
    domain::SenderCredentials,
    email_client::{DeliveryError, EmailTransport, OutgoingEmail, TransportSession},
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use serde::Serialize;

// Ensure that the `tracing` stack is only initialised once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    // `TEST_LOG=true cargo test` to see the logs
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

/// One delivery the stub was asked to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Stands in for the SMTP provider. Can be told to fail the n-th delivery
/// (1-based) or to refuse sessions outright.
#[derive(Default)]
pub struct StubTransport {
    pub sessions: Mutex<Vec<String>>,
    pub deliveries: Arc<Mutex<Vec<Delivery>>>,
    fail_on: Mutex<Option<usize>>,
    refuse_sessions: Mutex<bool>,
}

impl StubTransport {
    pub fn fail_on_delivery(&self, n: usize) {
        *self.fail_on.lock().unwrap() = Some(n);
    }

    pub fn refuse_sessions(&self) {
        *self.refuse_sessions.lock().unwrap() = true;
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn recipients(&self) -> Vec<String> {
        self.deliveries
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.to.clone())
            .collect()
    }
}

struct StubSession {
    from: String,
    deliveries: Arc<Mutex<Vec<Delivery>>>,
    fail_on: Option<usize>,
}

#[async_trait]
impl EmailTransport for StubTransport {
    async fn open_session(
        &self,
        sender: &SenderCredentials,
    ) -> Result<Box<dyn TransportSession>, DeliveryError> {
        self.sessions.lock().unwrap().push(sender.email().to_owned());
        if *self.refuse_sessions.lock().unwrap() {
            return Err(DeliveryError::Provider(
                "535 Username and Password not accepted".into(),
            ));
        }
        Ok(Box::new(StubSession {
            from: sender.email().to_owned(),
            deliveries: self.deliveries.clone(),
            fail_on: *self.fail_on.lock().unwrap(),
        }))
    }
}

#[async_trait]
impl TransportSession for StubSession {
    async fn send_one(&mut self, email: OutgoingEmail<'_>) -> Result<(), DeliveryError> {
        let mut deliveries = self.deliveries.lock().unwrap();
        deliveries.push(Delivery {
            from: self.from.clone(),
            to: email.recipient.to_owned(),
            subject: email.subject.to_owned(),
            html_body: email.html_body.to_owned(),
        });
        if Some(deliveries.len()) == self.fail_on {
            return Err(DeliveryError::Provider(format!(
                "550 5.1.1 The email account that you tried to reach does not exist: {}",
                email.recipient
            )));
        }
        Ok(())
    }
}

pub struct TestApp {
    pub address: String,
    pub transport: Arc<StubTransport>,
}

#[derive(Serialize, Default)]
pub struct SendEmailBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub useremail: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
    #[serde(rename = "emailList", skip_serializing_if = "Option::is_none")]
    pub email_list: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<&'a str>,
}

impl<'a> SendEmailBody<'a> {
    pub fn valid(recipients: Vec<&'a str>) -> Self {
        Self {
            useremail: Some("me@gmail.com"),
            password: Some("abcd efgh ijkl mnop"),
            email_list: Some(recipients),
            subject: Some("Quarterly update"),
            content: Some("<p>Hello <strong>everyone</strong></p>"),
        }
    }
}

impl TestApp {
    pub async fn post_send_email<T: Serialize>(&self, body: &T) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/sendEmail", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub async fn spawn_app() -> TestApp {
    LazyLock::force(&TRACING);

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        // Use a random OS port
        c.application.port = 0;
        c
    };

    let transport = Arc::new(StubTransport::default());
    let application = Application::build_with_transport(configuration, transport.clone())
        .await
        .expect("Failed to build application.");
    let application_port = application.port();
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{}", application_port),
        transport,
    }
}
