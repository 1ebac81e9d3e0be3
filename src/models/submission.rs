// src/models/submission.rs

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::validate;

/// Every key the form contract can carry, as received off the wire.
/// Which keys are present decides the submission kind.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,

    pub team_name: Option<String>,
    pub event_name: Option<String>,
    pub team_size: Option<String>,
    pub leader_name: Option<String>,
    pub mate_name: Option<String>,
    pub college: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,

    /// Client submit-time clock, epoch milliseconds.
    pub timestamp: Option<i64>,
    pub user_agent: Option<String>,

    /// Honeypot. Humans never see the field; any value means a bot filled
    /// the form.
    pub website: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Contact,
    Registration,
}

impl RawSubmission {
    /// Classify by the discriminating key pairs. `None` means the request
    /// matches neither form.
    pub fn classify(&self) -> Option<SubmissionKind> {
        if self.team_name.is_some() && self.event_name.is_some() {
            Some(SubmissionKind::Registration)
        } else if self.subject.is_some() && self.message.is_some() {
            Some(SubmissionKind::Contact)
        } else {
            None
        }
    }

    /// All values joined, for the deny-list sweep.
    pub fn joined_values(&self) -> String {
        [
            &self.name,
            &self.email,
            &self.phone,
            &self.subject,
            &self.message,
            &self.team_name,
            &self.event_name,
            &self.team_size,
            &self.leader_name,
            &self.mate_name,
            &self.college,
            &self.department,
            &self.year,
            &self.user_agent,
            &self.website,
        ]
        .iter()
        .filter_map(|v| v.as_deref())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Solo registrations carry one participant; duo registrations carry a
/// leader and a mate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSize {
    Solo,
    Duo,
}

impl TeamSize {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "1" => Some(TeamSize::Solo),
            "2" => Some(TeamSize::Duo),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TeamSize::Solo => "1",
            TeamSize::Duo => "2",
        }
    }
}

/// A contact submission with all required keys present and trimmed.
#[derive(Debug, Validate)]
pub struct ContactSubmission {
    #[validate(custom(function = name_format))]
    pub name: String,
    #[validate(custom(function = email_format))]
    pub email: String,
    #[validate(custom(function = phone_format))]
    pub phone: String,
    #[validate(length(max = 200))]
    pub subject: String,
    #[validate(custom(function = message_format))]
    pub message: String,
}

impl ContactSubmission {
    /// Pull the contact fields out of the raw key set. Fails on any missing
    /// or blank required field; constraint checks come from `validate()`.
    pub fn from_raw(raw: &RawSubmission) -> Result<Self, &'static str> {
        let name = required(&raw.name)?;
        let email = required(&raw.email)?;
        let phone = required(&raw.phone)?;
        let message = required(&raw.message)?;
        let subject = raw.subject.as_deref().unwrap_or("").trim().to_string();
        Ok(Self {
            name,
            email,
            phone,
            subject,
            message,
        })
    }
}

/// A registration submission with the member fields demanded by its team
/// size.
#[derive(Debug, Validate)]
pub struct RegistrationSubmission {
    #[validate(custom(function = name_format))]
    pub team_name: String,
    #[validate(length(min = 1, max = 100))]
    pub event_name: String,
    pub team_size: TeamSize,
    #[validate(custom(function = name_format))]
    pub leader_name: String,
    /// Present iff `team_size` is `Duo`; length-checked during parsing.
    pub mate_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub college: String,
    #[validate(length(min = 1, max = 100))]
    pub department: String,
    #[validate(length(min = 1, max = 20))]
    pub year: String,
    #[validate(custom(function = phone_format))]
    pub phone: String,
    #[validate(custom(function = email_format))]
    pub email: String,
}

impl RegistrationSubmission {
    pub fn from_raw(raw: &RawSubmission) -> Result<Self, &'static str> {
        let team_size = raw
            .team_size
            .as_deref()
            .and_then(TeamSize::parse)
            .ok_or("Team size must be 1 or 2.")?;

        let (leader_name, mate_name) = match team_size {
            TeamSize::Solo => (required(&raw.name)?, None),
            TeamSize::Duo => {
                let leader = required(&raw.leader_name)?;
                let mate = required(&raw.mate_name)?;
                validate::validate_name(&mate)?;
                (leader, Some(mate))
            }
        };

        Ok(Self {
            team_name: required(&raw.team_name)?,
            event_name: required(&raw.event_name)?,
            team_size,
            leader_name,
            mate_name,
            college: required(&raw.college)?,
            department: required(&raw.department)?,
            year: required(&raw.year)?,
            phone: required(&raw.phone)?,
            email: required(&raw.email)?,
        })
    }
}

fn required(value: &Option<String>) -> Result<String, &'static str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err("Please fill in all required fields."),
    }
}

fn name_format(name: &str) -> Result<(), ValidationError> {
    validate::validate_name(name).map_err(|_| ValidationError::new("invalid_name"))
}

fn email_format(email: &str) -> Result<(), ValidationError> {
    validate::validate_email(email).map_err(|_| ValidationError::new("invalid_email"))
}

fn phone_format(phone: &str) -> Result<(), ValidationError> {
    validate::validate_phone(phone).map_err(|_| ValidationError::new("invalid_phone"))
}

fn message_format(message: &str) -> Result<(), ValidationError> {
    validate::validate_message(message).map_err(|_| ValidationError::new("invalid_message"))
}

/// Response status. `Unknown` absorbs anything a misbehaving or
/// compromised backend might send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
    #[serde(other)]
    Unknown,
}

/// The wire-level result shape, both directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    pub fn registration_success(team_id: String) -> Self {
        Self {
            status: Status::Success,
            team_id: Some(team_id),
            ticket_id: None,
            message: Some("Registration successful".to_string()),
        }
    }

    pub fn contact_success(ticket_id: String) -> Self {
        Self {
            status: Status::Success,
            team_id: None,
            ticket_id: Some(ticket_id),
            message: Some("Message sent successfully".to_string()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            team_id: None,
            ticket_id: None,
            message: Some(message.into()),
        }
    }
}
