// --- File: crates/citaflow_config/src/lib.rs ---
pub mod models;

pub use models::*;

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;

static DOTENV: OnceCell<()> = OnceCell::new();

/// Loads `.env` once per process; later calls are no-ops.
pub fn ensure_dotenv_loaded() {
    DOTENV.get_or_init(|| {
        let _ = dotenv::dotenv();
    });
}

/// Loads the application configuration.
///
/// Sources, later ones overriding earlier ones:
/// 1. `config/default.{toml,yaml,json}` (optional)
/// 2. `config/{RUN_MODE}.*` (optional)
/// 3. Environment variables with the `CITAFLOW__` prefix and `__` separator,
///    e.g. `CITAFLOW__GCAL__CALENDAR_ID`.
/// 4. Legacy flat environment names used by existing deployments
///    (`CALENDAR_ID`, `SHEET_ID`, `EMAIL_USER`, ...), applied last so a
///    `.env` written for the old backend keeps working unchanged.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "default".to_string());

    let config: AppConfig = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        .add_source(Environment::with_prefix("CITAFLOW").separator("__"))
        .build()?
        .try_deserialize()?;

    Ok(apply_legacy_env(config))
}

/// Fills still-missing values from the flat env names the pre-existing
/// deployments use.
pub fn apply_legacy_env(config: AppConfig) -> AppConfig {
    apply_legacy_env_from(|name| std::env::var(name).ok(), config)
}

fn apply_legacy_env_from<F>(lookup: F, mut config: AppConfig) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    fn fill<F: Fn(&str) -> Option<String>>(slot: &mut Option<String>, lookup: &F, name: &str) {
        if slot.is_none() {
            *slot = lookup(name);
        }
    }

    fill(&mut config.gcal.calendar_id, &lookup, "CALENDAR_ID");
    fill(&mut config.sheets.sheet_id, &lookup, "SHEET_ID");
    fill(
        &mut config.booking.owner_email,
        &lookup,
        "CALENDAR_OWNER_EMAIL",
    );
    fill(&mut config.smtp.user, &lookup, "EMAIL_USER");
    fill(&mut config.smtp.pass, &lookup, "EMAIL_PASS");
    fill(&mut config.google_auth.key_path, &lookup, "GOOGLE_KEY_PATH");
    fill(
        &mut config.google_auth.credentials_json,
        &lookup,
        "GOOGLE_SERVICE_ACCOUNT_JSON",
    );

    // The OAuth trio only counts when at least one var is present.
    if config.google_auth.oauth.is_none() {
        let client_id = lookup("OAUTH_CLIENT_ID");
        let client_secret = lookup("OAUTH_CLIENT_SECRET");
        let refresh_token = lookup("OAUTH_REFRESH_TOKEN");
        if client_id.is_some() || client_secret.is_some() || refresh_token.is_some() {
            config.google_auth.oauth = Some(OAuthRefreshConfig {
                client_id,
                client_secret,
                refresh_token,
            });
        }
    }

    if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
        config.server.port = port;
    }

    config
}
