use redis::aio::ConnectionManager;
use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::services::catalog::PuzzleCatalog;
use crate::services::email_service::{MailTransport, SmtpMailer};
use crate::services::puzzle_service::PuzzleMailerService;
use crate::services::store::{MemoryStore, RedisStore, StateStore};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn StateStore>,
    pub mailer_service: PuzzleMailerService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let catalog = Arc::new(PuzzleCatalog::load(&config.puzzle_file)?);
        let (easy, medium, hard) = catalog.count_by_difficulty();
        tracing::info!(
            "Puzzle catalog ready: {} easy, {} medium, {} hard",
            easy,
            medium,
            hard
        );

        let store: Arc<dyn StateStore> = match config.store_backend {
            StoreBackend::Redis => Arc::new(RedisStore::new(
                connect_redis(&config.redis_uri).await?,
                config.store_key_prefix.clone(),
            )),
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory state store; selection state is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        let mailer: Arc<dyn MailTransport> = Arc::new(SmtpMailer::new(
            &config.smtp,
            &config.recipients,
            config.email_send_disabled,
        )?);
        tracing::info!(
            "Mailer configured for {} recipients via {}:{}",
            config.recipients.len(),
            config.smtp.server,
            config.smtp.port
        );

        let mailer_service = PuzzleMailerService::new(
            catalog,
            store.clone(),
            mailer,
            config.link_base_url.clone(),
        );

        Ok(Self {
            config,
            store,
            mailer_service,
        })
    }

    /// Assembles state from ready-made collaborators.
    pub fn from_parts(
        config: Config,
        store: Arc<dyn StateStore>,
        mailer_service: PuzzleMailerService,
    ) -> Self {
        Self {
            config,
            store,
            mailer_service,
        }
    }
}

async fn connect_redis(redis_uri: &str) -> anyhow::Result<ConnectionManager> {
    let redis_client = redis::Client::open(redis_uri)?;

    tracing::info!("Attempting to connect to Redis...");

    // Create ConnectionManager with longer timeout
    let redis = tokio::time::timeout(
        std::time::Duration::from_secs(30),
        ConnectionManager::new(redis_client),
    )
    .await
    .map_err(|_| anyhow::anyhow!("Redis connection timeout after 30s"))??;

    tracing::info!("Redis ConnectionManager created, testing with PING...");

    let mut conn = redis.clone();
    tokio::time::timeout(
        std::time::Duration::from_secs(5),
        redis::cmd("PING").query_async::<String>(&mut conn),
    )
    .await
    .map_err(|_| anyhow::anyhow!("Redis PING timeout after 5s"))??;

    tracing::info!("Redis connection established successfully");

    Ok(redis)
}

pub mod catalog;
pub mod email_service;
pub mod formatter;
pub mod puzzle_service;
pub mod selector;
pub mod store;
