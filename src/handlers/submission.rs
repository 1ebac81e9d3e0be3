// src/handlers/submission.rs

use std::time::Instant;

use axum::{Form, Json, extract::State};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppError,
    models::submission::{
        ApiResponse, ContactSubmission, RawSubmission, RegistrationSubmission, SubmissionKind,
    },
    notify::{self, Notification},
    state::AppState,
    store::{CONTACT_HEADER, CONTACT_TABLE, REGISTRATION_HEADER, REGISTRATIONS_TABLE},
    utils::{fingerprint::fingerprint, id, sanitize::store_clean},
    validate,
};

/// Reject stale submissions: the client stamps the form at submit time, so
/// anything older than this is a replay or a parked page.
const STALE_AFTER_MS: i64 = 5 * 60 * 1000;

/// Tolerated forward clock skew.
const FUTURE_SKEW_MS: i64 = 60 * 1000;

/// Stored user-agent length cap.
const UA_MAX_LEN: usize = 200;

/// One message for every security-gate rejection. The caller must not be
/// able to tell which gate fired.
const REJECTION_MSG: &str = "Invalid request";

pub async fn info() -> &'static str {
    "formgate API - POST requests only"
}

/// Accepts both form kinds on one endpoint and answers with one of the two
/// result shapes. Always 200: transport status is not part of the contract.
pub async fn submit(
    State(state): State<AppState>,
    Form(raw): Form<RawSubmission>,
) -> Json<ApiResponse> {
    Json(process(&state, raw).await)
}

async fn process(state: &AppState, raw: RawSubmission) -> ApiResponse {
    // Gate 1: honeypot.
    if raw.website.as_deref().is_some_and(|w| !w.is_empty()) {
        tracing::warn!("honeypot field filled, rejecting as bot traffic");
        return ApiResponse::error(REJECTION_MSG);
    }

    // Gate 2: timestamp sanity.
    let now_ms = Utc::now().timestamp_millis();
    match raw.timestamp {
        Some(ts) if ts >= now_ms - STALE_AFTER_MS && ts <= now_ms + FUTURE_SKEW_MS => {}
        other => {
            tracing::warn!(timestamp = ?other, "submission timestamp outside accepted window");
            return ApiResponse::error(REJECTION_MSG);
        }
    }

    // Gate 3: per-fingerprint rate limit. The user-agent is a weak,
    // spoofable key; it bounds polite abuse, nothing more.
    let user_agent = truncate_ua(raw.user_agent.as_deref().unwrap_or("Unknown"));
    let key = fingerprint(&user_agent);
    if !state.limiter.check_and_record(&key, Instant::now()) {
        tracing::warn!(fingerprint = %key, "submission rate limit reached");
        return ApiResponse::error(REJECTION_MSG);
    }

    // Gate 4: field validation, independent of whatever the client checked.
    if let Err(reason) = validate_present_fields(&raw) {
        tracing::debug!(reason, "field validation failed");
        return ApiResponse::error(REJECTION_MSG);
    }

    // Gate 5: deny-list sweep across everything submitted.
    if validate::is_suspicious_strict(&raw.joined_values()) {
        tracing::warn!("suspicious pattern in submission values");
        return ApiResponse::error(REJECTION_MSG);
    }

    match raw.classify() {
        Some(SubmissionKind::Registration) => handle_registration(state, &raw, &user_agent).await,
        Some(SubmissionKind::Contact) => handle_contact(state, &raw, &user_agent).await,
        None => ApiResponse::error("Unknown form type"),
    }
}

async fn handle_registration(state: &AppState, raw: &RawSubmission, ua: &str) -> ApiResponse {
    let submission = match RegistrationSubmission::from_raw(raw) {
        Ok(s) => s,
        Err(msg) => return ApiResponse::error(msg),
    };
    if let Err(e) = submission.validate() {
        tracing::debug!("registration constraints failed: {e}");
        return ApiResponse::error("Please check your details and try again.");
    }

    match persist_registration(state, &submission, ua).await {
        Ok(team_id) => {
            notify::dispatch(
                state.notifier.clone(),
                Notification::RegistrationConfirmed {
                    email: submission.email.clone(),
                    team_id: team_id.clone(),
                    team_name: submission.team_name.clone(),
                },
            );
            ApiResponse::registration_success(team_id)
        }
        Err(e) => {
            tracing::error!("failed to persist registration: {e}");
            ApiResponse::error("Registration failed. Please try again.")
        }
    }
}

async fn handle_contact(state: &AppState, raw: &RawSubmission, ua: &str) -> ApiResponse {
    let submission = match ContactSubmission::from_raw(raw) {
        Ok(s) => s,
        Err(msg) => return ApiResponse::error(msg),
    };
    if let Err(e) = submission.validate() {
        tracing::debug!("contact constraints failed: {e}");
        return ApiResponse::error("Please check your details and try again.");
    }

    match persist_contact(state, &submission, ua).await {
        Ok(ticket_id) => {
            notify::dispatch(
                state.notifier.clone(),
                Notification::ContactReceived {
                    email: submission.email.clone(),
                    ticket_id: ticket_id.clone(),
                },
            );
            ApiResponse::contact_success(ticket_id)
        }
        Err(e) => {
            tracing::error!("failed to persist contact message: {e}");
            ApiResponse::error("Failed to send message. Please try again.")
        }
    }
}

async fn persist_registration(
    state: &AppState,
    submission: &RegistrationSubmission,
    ua: &str,
) -> Result<String, AppError> {
    state
        .store
        .ensure_table(REGISTRATIONS_TABLE, REGISTRATION_HEADER)
        .await?;

    let team_id = id::generate_team_id();
    let row = vec![
        Utc::now().to_rfc3339(),
        team_id.clone(),
        store_clean(&submission.team_name),
        store_clean(&submission.event_name),
        submission.team_size.as_str().to_string(),
        store_clean(&submission.leader_name),
        store_clean(submission.mate_name.as_deref().unwrap_or("")),
        store_clean(&submission.college),
        store_clean(&submission.department),
        store_clean(&submission.year),
        store_clean(&submission.phone),
        store_clean(&submission.email),
        "Pending".to_string(),
        ua.to_string(),
    ];
    state.store.append(REGISTRATIONS_TABLE, &row).await?;
    Ok(team_id)
}

async fn persist_contact(
    state: &AppState,
    submission: &ContactSubmission,
    ua: &str,
) -> Result<String, AppError> {
    state.store.ensure_table(CONTACT_TABLE, CONTACT_HEADER).await?;

    let ticket_id = id::generate_ticket_id();
    let row = vec![
        Utc::now().to_rfc3339(),
        ticket_id.clone(),
        store_clean(&submission.name),
        store_clean(&submission.email),
        store_clean(&submission.phone),
        store_clean(&submission.subject),
        store_clean(&submission.message),
        "New".to_string(),
        ua.to_string(),
    ];
    state.store.append(CONTACT_TABLE, &row).await?;
    Ok(ticket_id)
}

/// Generic rules applied to whichever of the shared fields showed up,
/// before the kind is even known.
fn validate_present_fields(raw: &RawSubmission) -> Result<(), &'static str> {
    if let Some(email) = raw.email.as_deref() {
        validate::validate_email(email.trim())?;
    }
    if let Some(phone) = raw.phone.as_deref() {
        validate::validate_phone(phone.trim())?;
    }
    if let Some(name) = raw.name.as_deref() {
        validate::validate_name(name.trim())?;
    }
    Ok(())
}

fn truncate_ua(ua: &str) -> String {
    match ua.char_indices().nth(UA_MAX_LEN) {
        Some((idx, _)) => ua[..idx].to_string(),
        None => ua.to_string(),
    }
}
