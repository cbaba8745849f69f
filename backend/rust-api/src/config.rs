use serde::Deserialize;
use std::env;

use crate::services::formatter::DEFAULT_LINK_BASE;

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub login: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
    #[serde(default)]
    pub use_tls: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Redis,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    pub puzzle_file: String,
    pub link_base_url: String,
    pub smtp: SmtpSettings,
    pub recipients: Vec<String>,
    pub email_send_disabled: bool,
    pub store_backend: StoreBackend,
    pub redis_uri: String,
    pub store_key_prefix: String,
    /// `user:password` for Basic auth on /metrics; unset leaves it open.
    pub metrics_auth: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let bind_addr = setting_or_env(&settings, "server.bind_addr", "BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string());

        let puzzle_file = setting_or_env(&settings, "puzzles.file", "PUZZLE_FILE")
            .unwrap_or_else(|| "puzzles.json".to_string());

        let link_base_url = settings
            .get_string("puzzles.link_base_url")
            .unwrap_or_else(|_| DEFAULT_LINK_BASE.to_string());

        let login = setting_or_env(&settings, "smtp.login", "GMAIL_ADDRESS")
            .ok_or_else(|| config::ConfigError::NotFound("smtp.login (GMAIL_ADDRESS)".into()))?;

        let password = setting_or_env(&settings, "smtp.password", "APP_PASSWORD")
            .ok_or_else(|| config::ConfigError::NotFound("smtp.password (APP_PASSWORD)".into()))?;

        let port = match setting_or_env(&settings, "smtp.port", "SMTP_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                config::ConfigError::Message(format!("Invalid SMTP port: {}", raw))
            })?,
            None => 465,
        };

        let smtp = SmtpSettings {
            server: setting_or_env(&settings, "smtp.server", "SMTP_SERVER")
                .unwrap_or_else(|| "smtp.gmail.com".to_string()),
            port,
            from_email: settings
                .get_string("smtp.from_email")
                .unwrap_or_else(|_| login.clone()),
            from_name: settings
                .get_string("smtp.from_name")
                .unwrap_or_else(|_| "PuzzleMailer".to_string()),
            use_tls: settings.get_bool("smtp.use_tls").unwrap_or(true),
            login,
            password,
        };

        let recipients = setting_or_env(&settings, "mail.recipients", "RECIPIENTS")
            .map(|raw| parse_recipients(&raw))
            .unwrap_or_default();
        if recipients.is_empty() {
            return Err(config::ConfigError::NotFound(
                "mail.recipients (RECIPIENTS)".into(),
            ));
        }

        let email_send_disabled =
            setting_or_env(&settings, "mail.send_disabled", "EMAIL_SEND_DISABLED")
                .map(|value| parse_flag(&value))
                .unwrap_or(false);

        let store_backend = match setting_or_env(&settings, "store.backend", "STORE_BACKEND")
            .as_deref()
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            None | Some("redis") => StoreBackend::Redis,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(config::ConfigError::Message(format!(
                    "Unknown store backend: {}",
                    other
                )))
            }
        };

        let redis_uri = setting_or_env(&settings, "store.redis_uri", "REDIS_URI")
            .unwrap_or_else(|| "redis://127.0.0.1:6379/0".to_string());

        let store_key_prefix = settings
            .get_string("store.key_prefix")
            .unwrap_or_else(|_| "puzzlemailer:".to_string());

        let metrics_auth = setting_or_env(&settings, "metrics.auth", "METRICS_AUTH");

        Ok(Config {
            bind_addr,
            puzzle_file,
            link_base_url,
            smtp,
            recipients,
            email_send_disabled,
            store_backend,
            redis_uri,
            store_key_prefix,
            metrics_auth,
        })
    }
}

fn setting_or_env(settings: &config::Config, key: &str, env_key: &str) -> Option<String> {
    settings
        .get_string(key)
        .ok()
        .or_else(|| env::var(env_key).ok())
        .filter(|value| !value.trim().is_empty())
}

/// Splits a comma-separated recipient list, dropping blanks.
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
