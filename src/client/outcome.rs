// src/client/outcome.rs

/// Terminal result of one submission attempt. No variant carries internal
/// error detail; whatever the user may see is already in here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server accepted the submission and issued an identifier.
    Success { id: String, message: String },

    /// A local validation gate failed; nothing was sent.
    Invalid { message: String },

    /// Still inside the client-side cooldown; nothing was sent.
    RateLimited { retry_after_secs: u64 },

    /// Honeypot was filled. Silently dropped so automated senders learn
    /// nothing from the reaction.
    BotDetected,

    /// A submission is already in flight on this client.
    Busy,

    /// The bounded wait expired and the request was cancelled.
    Timeout,

    /// Transport-level failure other than a timeout.
    NetworkFailure,

    /// The server answered with an error status; its message has been
    /// re-sanitized.
    ServerRejected { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

/// Transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub text: String,
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Success { .. })
    }

    /// What to show the user, if anything. Bot and duplicate-click
    /// outcomes stay silent.
    pub fn feedback(&self) -> Option<Feedback> {
        let (kind, text) = match self {
            SubmitOutcome::Success { message, .. } => (FeedbackKind::Success, message.clone()),
            SubmitOutcome::Invalid { message } => (FeedbackKind::Error, message.clone()),
            SubmitOutcome::RateLimited { retry_after_secs } => (
                FeedbackKind::Error,
                format!("Please wait {retry_after_secs} seconds before submitting again."),
            ),
            SubmitOutcome::BotDetected | SubmitOutcome::Busy => return None,
            SubmitOutcome::Timeout => (
                FeedbackKind::Error,
                "Request timeout. Please try again.".to_string(),
            ),
            SubmitOutcome::NetworkFailure => (
                FeedbackKind::Error,
                "Failed to send message. Please check your internet connection and try again."
                    .to_string(),
            ),
            SubmitOutcome::ServerRejected { message } => (FeedbackKind::Error, message.clone()),
        };
        Some(Feedback { kind, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_outcomes_have_no_feedback() {
        assert!(SubmitOutcome::BotDetected.feedback().is_none());
        assert!(SubmitOutcome::Busy.feedback().is_none());
    }

    #[test]
    fn test_rate_limited_feedback_names_the_wait() {
        let feedback = SubmitOutcome::RateLimited {
            retry_after_secs: 12,
        }
        .feedback()
        .unwrap();
        assert_eq!(feedback.kind, FeedbackKind::Error);
        assert!(feedback.text.contains("12 seconds"));
    }
}
