use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};

use crate::error::ServiceError;
use crate::metrics::EMAILS_SENT_TOTAL;
use crate::models::email::{EmailLogEntry, SendMode, SendReport};
use crate::models::puzzle::Puzzle;
use crate::models::selection::SelectionCounter;
use crate::services::catalog::PuzzleCatalog;
use crate::services::email_service::MailTransport;
use crate::services::formatter::format_output;
use crate::services::selector::select_diverse;
use crate::services::store::{
    self, StateStore, COUNTER_KEY, EMAIL_LOGS_KEY, TODAY_PUZZLES_KEY,
};

/// Selects, formats and mails the daily puzzles.
pub struct PuzzleMailerService {
    catalog: Arc<PuzzleCatalog>,
    store: Arc<dyn StateStore>,
    mailer: Arc<dyn MailTransport>,
    rng: Mutex<StdRng>,
    link_base: String,
}

impl PuzzleMailerService {
    pub fn new(
        catalog: Arc<PuzzleCatalog>,
        store: Arc<dyn StateStore>,
        mailer: Arc<dyn MailTransport>,
        link_base: String,
    ) -> Self {
        Self::with_rng(catalog, store, mailer, link_base, StdRng::from_os_rng())
    }

    /// Same as [`PuzzleMailerService::new`] with a caller-supplied generator,
    /// so draws can be made reproducible.
    pub fn with_rng(
        catalog: Arc<PuzzleCatalog>,
        store: Arc<dyn StateStore>,
        mailer: Arc<dyn MailTransport>,
        link_base: String,
        rng: StdRng,
    ) -> Self {
        Self {
            catalog,
            store,
            mailer,
            rng: Mutex::new(rng),
            link_base,
        }
    }

    pub async fn handle_send(&self, mode: SendMode) -> Result<SendReport, ServiceError> {
        tracing::info!("Handling {} send", mode);

        let puzzles = match mode {
            SendMode::Question => self.select_today().await?,
            SendMode::Hint | SendMode::Solution => self.load_today().await?,
        };

        let subject = mode.subject();
        let body = format_output(&puzzles, mode, &self.link_base);

        if let Err(e) = self.mailer.send(subject, &body).await {
            EMAILS_SENT_TOTAL
                .with_label_values(&[mode.as_str(), "error"])
                .inc();
            tracing::error!("Failed to send {} email via {}: {}", mode, self.mailer.name(), e);
            return Err(e.into());
        }
        EMAILS_SENT_TOTAL
            .with_label_values(&[mode.as_str(), "success"])
            .inc();

        self.log_sent_email(subject, &body).await?;

        Ok(SendReport {
            mode,
            subject: subject.to_string(),
            puzzle_ids: puzzles.into_iter().map(|p| p.id).collect(),
        })
    }

    async fn select_today(&self) -> Result<Vec<Puzzle>, ServiceError> {
        let mut counter: SelectionCounter =
            store::get_or(self.store.as_ref(), COUNTER_KEY, SelectionCounter::default()).await?;

        let selected = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            select_diverse(self.catalog.puzzles(), &mut counter, &mut *rng)?
        };

        store::set_json(self.store.as_ref(), COUNTER_KEY, &counter).await?;
        store::set_json(self.store.as_ref(), TODAY_PUZZLES_KEY, &selected[..]).await?;

        tracing::info!(
            "Selected puzzles {} ({}) and {} ({}); alternator now {}",
            selected[0].id,
            selected[0].difficulty,
            selected[1].id,
            selected[1].difficulty,
            counter.alternator
        );

        Ok(selected.into())
    }

    async fn load_today(&self) -> Result<Vec<Puzzle>, ServiceError> {
        let puzzles: Option<Vec<Puzzle>> =
            store::get_json(self.store.as_ref(), TODAY_PUZZLES_KEY).await?;

        match puzzles {
            Some(puzzles) if !puzzles.is_empty() => Ok(puzzles),
            _ => Err(ServiceError::MissingTodayPuzzles),
        }
    }

    async fn log_sent_email(&self, subject: &str, body: &str) -> Result<(), ServiceError> {
        let mut logs: Vec<EmailLogEntry> =
            store::get_or(self.store.as_ref(), EMAIL_LOGS_KEY, Vec::new()).await?;
        logs.push(EmailLogEntry {
            timestamp: Utc::now(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        store::set_json(self.store.as_ref(), EMAIL_LOGS_KEY, &logs).await?;
        Ok(())
    }
}
