//! Booking notifications.
//!
//! Delivery runs on a detached task after the appointment row is committed;
//! a failed send is logged and never reaches the HTTP response.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use thiserror::Error;
use tracing::{info, warn};

use models::appointment::AppointmentStatus;

pub mod smtp;

pub use smtp::SmtpNotifier;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid address: {0}")]
    Address(String),
    #[error("message build failed: {0}")]
    Build(String),
    #[error("transport failed: {0}")]
    Transport(String),
}

/// Everything a confirmation message needs, detached from the DB models.
#[derive(Debug, Clone)]
pub struct AppointmentNotice {
    pub appointment_id: i32,
    pub recipient_name: String,
    pub recipient_email: String,
    pub service_name: String,
    pub appointment_date: DateTime<FixedOffset>,
    pub status: AppointmentStatus,
}

impl AppointmentNotice {
    pub fn body(&self) -> String {
        format!(
            "Dear {},\n\nYour appointment for {} on {} has been booked.\nStatus: {}\n\nThank you for choosing our service!",
            self.recipient_name,
            self.service_name,
            self.appointment_date.format("%Y-%m-%d %H:%M"),
            self.status,
        )
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn appointment_booked(&self, notice: &AppointmentNotice) -> Result<(), NotifyError>;
}

/// Used when mail delivery is disabled.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn appointment_booked(&self, notice: &AppointmentNotice) -> Result<(), NotifyError> {
        info!(
            appointment_id = notice.appointment_id,
            recipient = %notice.recipient_email,
            service = %notice.service_name,
            "appointment_notice"
        );
        Ok(())
    }
}

/// Pick the SMTP notifier when mail is enabled, the log notifier otherwise.
pub fn from_config(cfg: &configs::MailConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    if cfg.enabled {
        Ok(Arc::new(SmtpNotifier::from_config(cfg)?))
    } else {
        Ok(Arc::new(LogNotifier))
    }
}

/// Fire and forget.
pub fn dispatch(notifier: Arc<dyn Notifier>, notice: AppointmentNotice) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = notifier.appointment_booked(&notice).await {
            warn!(appointment_id = notice.appointment_id, error = %e, "appointment_notice_failed");
        }
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records notices, or fails every send when `failing` is set.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<AppointmentNotice>>,
        pub failing: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn appointment_booked(&self, notice: &AppointmentNotice) -> Result<(), NotifyError> {
            if self.failing {
                return Err(NotifyError::Transport("connection refused".into()));
            }
            self.sent.lock().unwrap().push(notice.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingNotifier;
    use super::*;

    fn notice() -> AppointmentNotice {
        AppointmentNotice {
            appointment_id: 7,
            recipient_name: "Ann".into(),
            recipient_email: "ann@example.com".into(),
            service_name: "Oil Change".into(),
            appointment_date: DateTime::parse_from_rfc3339("2030-01-15T09:30:00+00:00").unwrap(),
            status: AppointmentStatus::Pending,
        }
    }

    #[test]
    fn body_mentions_date_service_and_status() {
        let body = notice().body();
        assert!(body.contains("Oil Change"));
        assert!(body.contains("2030-01-15 09:30"));
        assert!(body.contains("Status: pending"));
        assert!(body.ends_with("Thank you for choosing our service!"));
    }

    #[tokio::test]
    async fn dispatch_delivers_and_swallows_failures() {
        let ok = Arc::new(RecordingNotifier::default());
        dispatch(ok.clone(), notice()).await.unwrap();
        assert_eq!(ok.sent.lock().unwrap().len(), 1);

        let broken = Arc::new(RecordingNotifier { failing: true, ..Default::default() });
        assert!(dispatch(broken.clone(), notice()).await.is_ok());
        assert!(broken.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn disabled_mail_falls_back_to_logging() {
        assert!(from_config(&configs::MailConfig::default()).is_ok());
    }
}
