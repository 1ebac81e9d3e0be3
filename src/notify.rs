//! Best-effort confirmation notifications.
//!
//! A submission is acknowledged to the participant after it is persisted.
//! Delivery is fire-and-forget: a failed notification is logged and must
//! never fail the submission that triggered it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppError;

/// What to tell the participant.
#[derive(Debug, Clone)]
pub enum Notification {
    RegistrationConfirmed {
        email: String,
        team_id: String,
        team_name: String,
    },
    ContactReceived {
        email: String,
        ticket_id: String,
    },
}

impl Notification {
    pub fn recipient(&self) -> &str {
        match self {
            Notification::RegistrationConfirmed { email, .. } => email,
            Notification::ContactReceived { email, .. } => email,
        }
    }

    pub fn subject(&self) -> &'static str {
        match self {
            Notification::RegistrationConfirmed { .. } => "Registration Confirmation",
            Notification::ContactReceived { .. } => "Message Received",
        }
    }

    pub fn body(&self) -> String {
        match self {
            Notification::RegistrationConfirmed {
                team_id, team_name, ..
            } => format!(
                "Thank you for registering!\n\n\
                 Team Name: {team_name}\n\
                 Team ID: {team_id}\n\n\
                 Please complete your payment and quote your Team ID \
                 ({team_id}) in the payment note. Your registration is \
                 confirmed once the payment is verified."
            ),
            Notification::ContactReceived { ticket_id, .. } => format!(
                "Thank you for contacting us!\n\n\
                 Your message has been received and assigned Ticket ID: \
                 {ticket_id}\n\n\
                 We will respond to your query within 24-48 hours."
            ),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), AppError>;
}

/// Notifier that records deliveries in the log stream. Stands in wherever
/// no real mail channel is wired up; an SMTP notifier is one impl away.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), AppError> {
        tracing::info!(
            recipient = notification.recipient(),
            subject = notification.subject(),
            "confirmation notification dispatched"
        );
        Ok(())
    }
}

/// Dispatch without awaiting the result. Errors end up in the logs only.
pub fn dispatch(notifier: Arc<dyn Notifier>, notification: Notification) {
    tokio::spawn(async move {
        if let Err(e) = notifier.send(&notification).await {
            tracing::warn!("failed to send confirmation notification: {e}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bodies_carry_the_id() {
        let reg = Notification::RegistrationConfirmed {
            email: "jane@example.com".into(),
            team_id: "NXR123456001".into(),
            team_name: "Rustaceans".into(),
        };
        assert!(reg.body().contains("NXR123456001"));
        assert!(reg.body().contains("Rustaceans"));
        assert_eq!(reg.recipient(), "jane@example.com");

        let contact = Notification::ContactReceived {
            email: "jane@example.com".into(),
            ticket_id: "TKT123456001".into(),
        };
        assert!(contact.body().contains("TKT123456001"));
    }
}
