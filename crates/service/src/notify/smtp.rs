use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, instrument};

use super::{AppointmentNotice, Notifier, NotifyError};

const SUBJECT: &str = "Appointment Confirmation";

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn from_config(cfg: &configs::MailConfig) -> Result<Self, NotifyError> {
        let address: Address = cfg.from_address.parse().map_err(|e: lettre::address::AddressError| NotifyError::Address(e.to_string()))?;
        let from = Mailbox::new(Some(cfg.from_name.clone()), address);

        let mut builder = if cfg.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.smtp_host)
                .map_err(|e| NotifyError::Transport(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&cfg.smtp_host)
        };
        builder = builder.port(cfg.smtp_port);
        if !cfg.username.is_empty() {
            builder = builder.credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()));
        }
        Ok(Self { transport: builder.build(), from })
    }

    fn message(&self, notice: &AppointmentNotice) -> Result<Message, NotifyError> {
        let to: Address = notice
            .recipient_email
            .parse()
            .map_err(|e: lettre::address::AddressError| NotifyError::Address(e.to_string()))?;
        Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(Some(notice.recipient_name.clone()), to))
            .subject(SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(notice.body())
            .map_err(|e| NotifyError::Build(e.to_string()))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    #[instrument(skip(self, notice), fields(appointment_id = notice.appointment_id))]
    async fn appointment_booked(&self, notice: &AppointmentNotice) -> Result<(), NotifyError> {
        let message = self.message(notice)?;
        self.transport.send(message).await.map_err(|e| NotifyError::Transport(e.to_string()))?;
        debug!("appointment_notice_sent");
        Ok(())
    }
}
