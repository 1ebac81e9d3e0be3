// tests/client_tests.rs
//
// End-to-end runs of the submission client against a real server instance.

use std::sync::Arc;
use std::time::Duration;

use formgate::{
    client::{ContactForm, FormClient, RegistrationForm, SubmitOutcome, TeamMembers},
    config::Config,
    notify::LogNotifier,
    ratelimit::RateLimiter,
    routes,
    state::AppState,
    store::{CONTACT_TABLE, MemoryStore, REGISTRATIONS_TABLE},
};
use regex::Regex;
use url::Url;

async fn spawn_app() -> (String, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        rust_log: "error".to_string(),
        allowed_origins: vec!["*".to_string()],
        rate_limit_max: 5,
        rate_limit_window_secs: 3600,
        notification_sender: None,
    };

    let state = AppState {
        store: store.clone(),
        limiter: Arc::new(RateLimiter::new(
            config.rate_limit_max,
            Duration::from_secs(config.rate_limit_window_secs),
        )),
        notifier: Arc::new(LogNotifier),
        config,
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://127.0.0.1:{port}/api/submissions"), store)
}

fn client_for(endpoint: &str) -> FormClient {
    FormClient::new(Url::parse(endpoint).unwrap())
        .with_user_agent(format!("e2e-agent/{}", uuid::Uuid::new_v4()))
}

fn contact_form() -> ContactForm {
    ContactForm {
        name: "Jane Doe".into(),
        email: "jane@example.com".into(),
        phone: "9876543210".into(),
        subject: "General enquiry".into(),
        message: "A question about the venue.".into(),
        website: String::new(),
    }
}

fn duo_form() -> RegistrationForm {
    RegistrationForm {
        team_name: "Rustaceans".into(),
        event_name: "Hackathon".into(),
        members: TeamMembers::Duo {
            leader_name: "Jane Doe".into(),
            mate_name: "John Roe".into(),
        },
        college: "Kings Engineering College".into(),
        department: "CSE".into(),
        year: "3".into(),
        phone: "9876543210".into(),
        email: "jane@example.com".into(),
        website: String::new(),
    }
}

#[tokio::test]
async fn contact_end_to_end() {
    let (endpoint, store) = spawn_app().await;
    let client = client_for(&endpoint);

    let outcome = client.submit_contact(&contact_form()).await;

    let SubmitOutcome::Success { id, message } = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert!(Regex::new(r"^TKT\d{6}\d{3}$").unwrap().is_match(&id));
    assert!(message.contains(&id));
    assert_eq!(store.rows(CONTACT_TABLE).await.len(), 1);
}

#[tokio::test]
async fn registration_end_to_end() {
    let (endpoint, store) = spawn_app().await;
    let client = client_for(&endpoint);

    let outcome = client.submit_registration(&duo_form()).await;

    let SubmitOutcome::Success { id, .. } = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert!(Regex::new(r"^NXR\d{6}\d{3}$").unwrap().is_match(&id));

    let rows = store.rows(REGISTRATIONS_TABLE).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][6], "John Roe");
}

#[tokio::test]
async fn second_submission_within_cooldown_stays_local() {
    let (endpoint, store) = spawn_app().await;
    let client = client_for(&endpoint);

    assert!(client.submit_contact(&contact_form()).await.is_success());

    let outcome = client.submit_contact(&contact_form()).await;
    let SubmitOutcome::RateLimited { retry_after_secs } = outcome else {
        panic!("expected local rate limit, got {outcome:?}");
    };
    assert!(retry_after_secs > 0);

    // The rejected attempt never reached the server.
    assert_eq!(store.rows(CONTACT_TABLE).await.len(), 1);
}

#[tokio::test]
async fn failed_submission_does_not_start_the_cooldown() {
    let (endpoint, store) = spawn_app().await;
    let client = client_for(&endpoint);

    let mut form = contact_form();
    form.phone = "12345".into();
    assert!(matches!(
        client.submit_contact(&form).await,
        SubmitOutcome::Invalid { .. }
    ));

    // The cooldown only starts on confirmed success, so a corrected retry
    // goes straight through.
    assert!(client.submit_contact(&contact_form()).await.is_success());
    assert_eq!(store.rows(CONTACT_TABLE).await.len(), 1);
}

#[tokio::test]
async fn honeypot_submission_never_reaches_the_server() {
    let (endpoint, store) = spawn_app().await;
    let client = client_for(&endpoint);

    let mut form = contact_form();
    form.website = "http://spam.example".into();

    assert_eq!(client.submit_contact(&form).await, SubmitOutcome::BotDetected);
    assert_eq!(store.rows(CONTACT_TABLE).await.len(), 0);
}

#[tokio::test]
async fn duo_missing_mate_never_reaches_the_server() {
    let (endpoint, store) = spawn_app().await;
    let client = client_for(&endpoint);

    let mut form = duo_form();
    form.members = TeamMembers::Duo {
        leader_name: "Jane Doe".into(),
        mate_name: String::new(),
    };

    assert!(matches!(
        client.submit_registration(&form).await,
        SubmitOutcome::Invalid { .. }
    ));
    assert_eq!(store.rows(REGISTRATIONS_TABLE).await.len(), 0);
}

#[tokio::test]
async fn server_side_rejection_maps_to_server_rejected() {
    let (endpoint, store) = spawn_app().await;
    let client = client_for(&endpoint);

    // `eval(` passes the client deny-list and survives entity-encoding
    // untouched, but trips the server's wider one: the server validates
    // independently.
    let mut form = contact_form();
    form.message = "please eval(this) for me, thanks".into();

    let outcome = client.submit_contact(&form).await;
    let SubmitOutcome::ServerRejected { message } = outcome else {
        panic!("expected server rejection, got {outcome:?}");
    };
    assert_eq!(message, "Invalid request");
    assert_eq!(store.rows(CONTACT_TABLE).await.len(), 0);
}

#[tokio::test]
async fn unresponsive_server_times_out_distinctly() {
    // A listener that accepts connections and never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            if let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        }
    });

    let client = FormClient::new(
        Url::parse(&format!("http://{addr}/api/submissions")).unwrap(),
    )
    .with_timeouts(Duration::from_millis(200), Duration::from_millis(200));

    assert_eq!(
        client.submit_contact(&contact_form()).await,
        SubmitOutcome::Timeout
    );
}
