// src/client/forms.rs

use crate::models::submission::TeamSize;

/// Contact form as gathered from the page.
///
/// `website` mirrors the hidden honeypot field and stays empty for human
/// traffic.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub website: String,
}

/// Member fields differ by team size; the size itself is derived from the
/// variant, so the two can never disagree.
#[derive(Debug, Clone)]
pub enum TeamMembers {
    Solo { name: String },
    Duo { leader_name: String, mate_name: String },
}

impl TeamMembers {
    pub fn size(&self) -> TeamSize {
        match self {
            TeamMembers::Solo { .. } => TeamSize::Solo,
            TeamMembers::Duo { .. } => TeamSize::Duo,
        }
    }
}

/// Registration form as gathered from the page.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub team_name: String,
    pub event_name: String,
    pub members: TeamMembers,
    pub college: String,
    pub department: String,
    pub year: String,
    pub phone: String,
    pub email: String,
    pub website: String,
}
