// --- File: crates/citaflow_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// --- Google credential provider ---
// Exactly one of the three variants should be populated; selection happens
// once at startup (see citaflow_google::auth).
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GoogleAuthConfig {
    /// Path to a service-account key file (credentials.json deployments).
    pub key_path: Option<String>,
    /// Full service-account key JSON supplied via environment.
    /// Secret, loaded from env var: GOOGLE_SERVICE_ACCOUNT_JSON
    pub credentials_json: Option<String>,
    pub oauth: Option<OAuthRefreshConfig>,
}

/// OAuth client + long-lived refresh token, the desktop-app credential style.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OAuthRefreshConfig {
    pub client_id: Option<String>,
    // Secrets loaded from env vars:
    // OAUTH_CLIENT_SECRET, OAUTH_REFRESH_TOKEN
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
}

// --- Google Calendar Config ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GcalConfig {
    pub calendar_id: Option<String>,
}

// --- Google Sheets ledger Config ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SheetsConfig {
    pub sheet_id: Option<String>,
    /// A1 range the booking ledger appends to.
    #[serde(default = "default_ledger_range")]
    pub range: String,
}

fn default_ledger_range() -> String {
    "Reservas!A:H".to_string()
}

// --- SMTP Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,
    pub user: Option<String>,
    // Secret loaded from env var: EMAIL_PASS
    pub pass: Option<String>,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            user: None,
            pass: None,
        }
    }
}

// --- Booking Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingConfig {
    /// Calendar owner, added as attendee so the invitation reaches them.
    pub owner_email: Option<String>,
    /// Case-insensitive substring that marks a calendar event as an
    /// appointment for availability purposes.
    #[serde(default = "default_keyword")]
    pub appointment_keyword: String,
    /// Civil time zone all slots are interpreted in.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_services")]
    pub services: Vec<ServiceDefinition>,
}

fn default_keyword() -> String {
    "cita".to_string()
}

fn default_time_zone() -> String {
    "Europe/Madrid".to_string()
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            owner_email: None,
            appointment_keyword: default_keyword(),
            time_zone: default_time_zone(),
            services: default_services(),
        }
    }
}

/// One entry of the static service catalog.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServiceDefinition {
    pub id: String,
    pub name: String,
    pub duration_minutes: i64,
    /// Price in euro cents.
    pub price_cents: i64,
    pub label: String,
}

fn default_services() -> Vec<ServiceDefinition> {
    vec![
        ServiceDefinition {
            id: "consulta".to_string(),
            name: "Consulta Nutricional".to_string(),
            duration_minutes: 60,
            price_cents: 5000,
            label: "🥗".to_string(),
        },
        ServiceDefinition {
            id: "seguimiento".to_string(),
            name: "Seguimiento".to_string(),
            duration_minutes: 30,
            price_cents: 3000,
            label: "📊".to_string(),
        },
        ServiceDefinition {
            id: "plan".to_string(),
            name: "Plan Personalizado".to_string(),
            duration_minutes: 60,
            price_cents: 8000,
            label: "📋".to_string(),
        },
    ]
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub google_auth: GoogleAuthConfig,
    #[serde(default)]
    pub gcal: GcalConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub booking: BookingConfig,
}
