#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use rand::{rngs::StdRng, SeedableRng};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use puzzlemailer_api::{
    config::{Config, SmtpSettings, StoreBackend},
    create_router,
    error::MailError,
    models::puzzle::{Difficulty, Puzzle},
    services::{
        catalog::PuzzleCatalog,
        email_service::MailTransport,
        formatter::DEFAULT_LINK_BASE,
        puzzle_service::PuzzleMailerService,
        store::{MemoryStore, StateStore},
        AppState,
    },
};

/// Captures outgoing mail instead of talking to an SMTP server.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SentEmail>>,
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub subject: String,
    pub body: String,
}

#[async_trait]
impl MailTransport for RecordingMailer {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, subject: &str, body: &str) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(SentEmail {
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (axum::http::StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }
}

pub fn test_config() -> Config {
    Config {
        bind_addr: "127.0.0.1:0".to_string(),
        puzzle_file: "puzzles.json".to_string(),
        link_base_url: DEFAULT_LINK_BASE.to_string(),
        smtp: SmtpSettings {
            server: "smtp.example.com".to_string(),
            port: 465,
            login: "sender@example.com".to_string(),
            password: "app-password".to_string(),
            from_email: "sender@example.com".to_string(),
            from_name: "PuzzleMailer".to_string(),
            use_tls: true,
        },
        recipients: vec!["one@example.com".to_string(), "two@example.com".to_string()],
        email_send_disabled: true,
        store_backend: StoreBackend::Memory,
        redis_uri: "redis://127.0.0.1:6379/0".to_string(),
        store_key_prefix: "puzzlemailer-test:".to_string(),
        metrics_auth: None,
    }
}

pub fn puzzle(id: &str, title: &str, difficulty: Difficulty) -> Puzzle {
    Puzzle {
        id: id.to_string(),
        title: title.to_string(),
        difficulty,
        question: format!("{} question", title),
        hint: None,
        answer: None,
        solution: None,
    }
}

/// Two easy, one medium and one hard puzzle: enough for exactly two days.
pub fn sample_puzzles() -> Vec<Puzzle> {
    let mut easy = puzzle("101", "Bag of Marbles", Difficulty::Easy);
    easy.hint = Some("Count the complements".to_string());
    easy.answer = Some("3/5".to_string());

    let mut hard = puzzle("301", "Hundred Prisoners", Difficulty::Hard);
    hard.answer = Some("Follow the cycles".to_string());
    hard.solution = Some("Each prisoner follows the permutation cycle".to_string());

    vec![
        easy,
        puzzle("102", "Broken Stick", Difficulty::Easy),
        puzzle("201", "Birthday Pairs", Difficulty::Medium),
        hard,
    ]
}

pub fn create_test_app_with(config: Config, puzzles: Vec<Puzzle>, seed: u64) -> TestApp {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::default());
    let catalog = Arc::new(PuzzleCatalog::from_puzzles(puzzles).unwrap());

    let store_handle: Arc<dyn StateStore> = store.clone();
    let service = PuzzleMailerService::with_rng(
        catalog,
        store_handle.clone(),
        mailer.clone(),
        config.link_base_url.clone(),
        StdRng::seed_from_u64(seed),
    );

    let app_state = Arc::new(AppState::from_parts(config, store_handle, service));

    TestApp {
        router: create_router(app_state),
        store,
        mailer,
    }
}

pub fn create_test_app() -> TestApp {
    create_test_app_with(test_config(), sample_puzzles(), 42)
}
