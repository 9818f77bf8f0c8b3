use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::{Settings, SmtpTls};
use crate::error::TrackerError;

/// Outbound message channel. One call, one message, one destination.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), TrackerError>;
    fn name(&self) -> &str;
}

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(settings: &Settings) -> Result<Self, TrackerError> {
        let host = settings
            .smtp_host
            .as_deref()
            .ok_or_else(|| TrackerError::Config("SMTP_HOST not set".into()))?;
        let from_addr = settings
            .smtp_from
            .as_deref()
            .ok_or_else(|| TrackerError::Config("SMTP_FROM_ADDRESS not set".into()))?;

        let from: Mailbox = from_addr
            .parse()
            .map_err(|e| TrackerError::Config(format!("Invalid from address: {e}")))?;

        let mut builder = match settings.smtp_tls {
            SmtpTls::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host),
            SmtpTls::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host),
            SmtpTls::None => Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(
                host,
            )),
        }
        .map_err(|e| TrackerError::Config(format!("SMTP transport error: {e}")))?;

        builder = builder
            .port(settings.smtp_port)
            .timeout(Some(std::time::Duration::from_secs(
                settings.http_timeout_secs,
            )));

        if let (Some(user), Some(pass)) = (&settings.smtp_username, &settings.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), TrackerError> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| TrackerError::Notify(format!("invalid recipient {to:?}: {e}")))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| TrackerError::Notify(format!("failed to build email: {e}")))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| TrackerError::Notify(format!("failed to send email: {e}")))?;

        Ok(())
    }

    fn name(&self) -> &str {
        "smtp"
    }
}

/// Fallback when SMTP is not configured: logs the message and drops it.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<(), TrackerError> {
        tracing::warn!(%to, %subject, "no notifier configured, dropping message");
        Ok(())
    }

    fn name(&self) -> &str {
        "noop"
    }
}

/// Build the process-wide notifier from settings.
pub fn from_settings(settings: &Settings) -> Arc<dyn Notifier> {
    if settings.smtp_host.is_some() && settings.smtp_from.is_some() {
        match SmtpNotifier::new(settings) {
            Ok(n) => {
                tracing::info!("email notifications enabled (SMTP)");
                return Arc::new(n);
            }
            Err(e) => {
                tracing::warn!("failed to initialize SMTP notifier: {e}");
            }
        }
    }

    tracing::info!("no notification channel configured (set SMTP_HOST and SMTP_FROM_ADDRESS)");
    Arc::new(NoopNotifier)
}
