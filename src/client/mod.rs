//! Client side of the submission pipeline.
//!
//! [`FormClient`] runs the full gate sequence locally before anything
//! touches the network: honeypot, cooldown, required fields, lengths,
//! formats, deny-list, sanitize-and-encode, then a bounded-wait POST and
//! response interpretation. Every failure becomes a [`SubmitOutcome`]; the
//! submit methods never return an error. Presentation of the resulting
//! [`Feedback`] is the caller's concern.

pub mod forms;
pub mod outcome;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::Utc;
use url::Url;

pub use forms::{ContactForm, RegistrationForm, TeamMembers};
pub use outcome::{Feedback, FeedbackKind, SubmitOutcome};

use crate::models::submission::{ApiResponse, Status, SubmissionKind};
use crate::ratelimit::Cooldown;
use crate::utils::sanitize::{display_safe, encode_input};
use crate::validate;

/// Minimum spacing between submissions.
pub const SUBMISSION_COOLDOWN: Duration = Duration::from_secs(30);

const CONTACT_TIMEOUT: Duration = Duration::from_secs(10);
const REGISTRATION_TIMEOUT: Duration = Duration::from_secs(15);
const UA_MAX_LEN: usize = 200;

const REQUIRED_MSG: &str = "Please fill in all required fields.";
const SUSPICIOUS_MSG: &str =
    "Invalid input detected. Please remove any special characters or code.";
const SUSPICIOUS_TEAM_MSG: &str =
    "Invalid team name. Please remove any special characters or code.";

pub struct FormClient {
    http: reqwest::Client,
    endpoint: Url,
    user_agent: String,
    cooldown: Cooldown,
    in_flight: AtomicBool,
    contact_timeout: Duration,
    registration_timeout: Duration,
}

impl FormClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            user_agent: concat!("formgate-client/", env!("CARGO_PKG_VERSION")).to_string(),
            cooldown: Cooldown::new(SUBMISSION_COOLDOWN),
            in_flight: AtomicBool::new(false),
            contact_timeout: CONTACT_TIMEOUT,
            registration_timeout: REGISTRATION_TIMEOUT,
        }
    }

    /// Identify as the given agent instead of the crate default.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the bounded-wait durations.
    pub fn with_timeouts(mut self, contact: Duration, registration: Duration) -> Self {
        self.contact_timeout = contact;
        self.registration_timeout = registration;
        self
    }

    /// Override the cooldown period.
    pub fn with_cooldown(mut self, period: Duration) -> Self {
        self.cooldown = Cooldown::new(period);
        self
    }

    pub async fn submit_contact(&self, form: &ContactForm) -> SubmitOutcome {
        let Some(_guard) = FlightGuard::acquire(&self.in_flight) else {
            return SubmitOutcome::Busy;
        };

        if !form.website.trim().is_empty() {
            tracing::debug!("honeypot filled, dropping submission");
            return SubmitOutcome::BotDetected;
        }

        let started = Instant::now();
        if let Some(remaining) = self.cooldown.remaining(started) {
            return SubmitOutcome::RateLimited {
                retry_after_secs: remaining.as_secs_f64().ceil() as u64,
            };
        }

        let name = form.name.trim();
        let email = form.email.trim();
        let phone = form.phone.trim();
        let subject = form.subject.trim();
        let message = form.message.trim();

        if name.is_empty() || email.is_empty() || phone.is_empty() || message.is_empty() {
            return invalid(REQUIRED_MSG);
        }
        if let Err(msg) = validate::validate_name(name) {
            return invalid(msg);
        }
        if let Err(msg) = validate::validate_message(message) {
            return invalid(msg);
        }
        if let Err(msg) = validate::validate_email(email) {
            return invalid(msg);
        }
        if let Err(msg) = validate::validate_phone(phone) {
            return invalid(msg);
        }
        if validate::is_suspicious(&format!("{name}{email}{message}")) {
            return invalid(SUSPICIOUS_MSG);
        }

        let fields = vec![
            ("name", encode_input(name)),
            ("email", encode_input(email)),
            ("phone", encode_input(phone)),
            ("subject", encode_input(subject)),
            ("message", encode_input(message)),
        ];
        self.dispatch(fields, self.contact_timeout, SubmissionKind::Contact, started)
            .await
    }

    pub async fn submit_registration(&self, form: &RegistrationForm) -> SubmitOutcome {
        let Some(_guard) = FlightGuard::acquire(&self.in_flight) else {
            return SubmitOutcome::Busy;
        };

        if !form.website.trim().is_empty() {
            tracing::debug!("honeypot filled, dropping submission");
            return SubmitOutcome::BotDetected;
        }

        let started = Instant::now();
        if let Some(remaining) = self.cooldown.remaining(started) {
            return SubmitOutcome::RateLimited {
                retry_after_secs: remaining.as_secs_f64().ceil() as u64,
            };
        }

        let team_name = form.team_name.trim();
        let event_name = form.event_name.trim();
        let college = form.college.trim();
        let department = form.department.trim();
        let year = form.year.trim();
        let phone = form.phone.trim();
        let email = form.email.trim();

        let member_names: Vec<&str> = match &form.members {
            TeamMembers::Solo { name } => vec![name.trim()],
            TeamMembers::Duo {
                leader_name,
                mate_name,
            } => vec![leader_name.trim(), mate_name.trim()],
        };

        let mut required = vec![team_name, event_name, college, department, year, phone, email];
        required.extend(&member_names);
        if required.iter().any(|v| v.is_empty()) {
            return invalid(REQUIRED_MSG);
        }

        if let Err(msg) = validate::validate_name(team_name) {
            return invalid(msg);
        }
        for member in &member_names {
            if let Err(msg) = validate::validate_name(member) {
                return invalid(msg);
            }
        }
        if let Err(msg) = validate::validate_email(email) {
            return invalid(msg);
        }
        if let Err(msg) = validate::validate_phone(phone) {
            return invalid(msg);
        }
        if validate::is_suspicious(team_name) {
            return invalid(SUSPICIOUS_TEAM_MSG);
        }
        if validate::is_suspicious(&format!("{}{college}", member_names.join(""))) {
            return invalid(SUSPICIOUS_MSG);
        }

        let mut fields = vec![
            ("teamName", encode_input(team_name)),
            ("eventName", encode_input(event_name)),
            ("teamSize", form.members.size().as_str().to_string()),
        ];
        match &form.members {
            TeamMembers::Solo { name } => {
                fields.push(("name", encode_input(name.trim())));
            }
            TeamMembers::Duo {
                leader_name,
                mate_name,
            } => {
                fields.push(("leaderName", encode_input(leader_name.trim())));
                fields.push(("mateName", encode_input(mate_name.trim())));
            }
        }
        fields.push(("college", encode_input(college)));
        fields.push(("department", encode_input(department)));
        fields.push(("year", encode_input(year)));
        fields.push(("phone", encode_input(phone)));
        fields.push(("email", encode_input(email)));

        self.dispatch(
            fields,
            self.registration_timeout,
            SubmissionKind::Registration,
            started,
        )
        .await
    }

    /// Serialize, send with a bounded wait, interpret the reply. `started`
    /// is the submit-time clock reading; the cooldown is advanced to it on
    /// confirmed success only.
    async fn dispatch(
        &self,
        mut fields: Vec<(&'static str, String)>,
        wait: Duration,
        kind: SubmissionKind,
        started: Instant,
    ) -> SubmitOutcome {
        fields.push(("timestamp", Utc::now().timestamp_millis().to_string()));
        fields.push(("userAgent", truncate_chars(&self.user_agent, UA_MAX_LEN)));

        let send = self.http.post(self.endpoint.clone()).form(&fields).send();
        let response = match tokio::time::timeout(wait, send).await {
            Err(_) => {
                // Dropping the future cancels the in-flight request.
                tracing::warn!("submission timed out after {wait:?}");
                return SubmitOutcome::Timeout;
            }
            Ok(Err(e)) => {
                tracing::warn!("submission transport failure: {e}");
                return SubmitOutcome::NetworkFailure;
            }
            Ok(Ok(response)) => response,
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "submission rejected at transport level");
            return SubmitOutcome::NetworkFailure;
        }

        let body: ApiResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("unparseable submission response: {e}");
                return SubmitOutcome::NetworkFailure;
            }
        };

        match body.status {
            Status::Success => {
                self.cooldown.mark(started);
                let raw_id = match kind {
                    SubmissionKind::Registration => body.team_id,
                    SubmissionKind::Contact => body.ticket_id,
                }
                .unwrap_or_else(|| "N/A".to_string());
                // Server-echoed strings are never trusted verbatim.
                let id = display_safe(&raw_id);
                let message = match kind {
                    SubmissionKind::Contact => {
                        format!("Message sent successfully! Ticket ID: {id}. Check your email.")
                    }
                    SubmissionKind::Registration => format!(
                        "Registration successful! Your Team ID: {id}. Check your email for details."
                    ),
                };
                SubmitOutcome::Success { id, message }
            }
            Status::Error | Status::Unknown => {
                let fallback = match kind {
                    SubmissionKind::Contact => "Failed to send message. Please try again.",
                    SubmissionKind::Registration => "Registration failed. Please try again.",
                };
                SubmitOutcome::ServerRejected {
                    message: display_safe(body.message.as_deref().unwrap_or(fallback)),
                }
            }
        }
    }
}

fn invalid(message: impl Into<String>) -> SubmitOutcome {
    SubmitOutcome::Invalid {
        message: message.into(),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Single-flight guard: released on every exit path, including panics,
/// so one stuck attempt can never wedge the client.
struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
            .then_some(Self { flag })
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
