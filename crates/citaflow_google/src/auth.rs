// File: crates/citaflow_google/src/auth.rs
//! Google credential provider.
//!
//! Three credential acquisition strategies exist across deployments: a
//! service-account key file next to the binary, the same key supplied inline
//! through the environment, and an OAuth client with a long-lived refresh
//! token obtained by the one-time authorization flow. All three collapse here
//! into a single authenticator which is cloned into the Calendar and Sheets
//! hubs.

use citaflow_config::GoogleAuthConfig;
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{
        authenticator::Authenticator, authorized_user::AuthorizedUserSecret,
        parse_service_account_key, read_service_account_key, AuthorizedUserAuthenticator,
        ServiceAccountAuthenticator,
    },
    CalendarHub,
};
use google_sheets4::Sheets;
use std::{error::Error, path::Path};

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type CalendarHubType = CalendarHub<Connector>;
pub type SheetsHubType = Sheets<Connector>;

/// How the process authenticates against the Google APIs, decided once at
/// startup from configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum GoogleCredentials {
    /// Path to a service-account key file (credentials.json).
    ServiceAccountFile(String),
    /// Service-account key JSON supplied via the environment.
    ServiceAccountJson(String),
    /// OAuth client id/secret plus a long-lived refresh token.
    AuthorizedUser {
        client_id: String,
        client_secret: String,
        refresh_token: String,
    },
}

impl GoogleCredentials {
    /// Selects the credential strategy from configuration. A key file wins
    /// over inline JSON, which wins over the refresh-token trio.
    pub fn from_config(config: &GoogleAuthConfig) -> Option<Self> {
        if let Some(path) = &config.key_path {
            return Some(Self::ServiceAccountFile(path.clone()));
        }
        if let Some(json) = &config.credentials_json {
            return Some(Self::ServiceAccountJson(json.clone()));
        }
        if let Some(oauth) = &config.oauth {
            if let (Some(id), Some(secret), Some(token)) = (
                oauth.client_id.clone(),
                oauth.client_secret.clone(),
                oauth.refresh_token.clone(),
            ) {
                return Some(Self::AuthorizedUser {
                    client_id: id,
                    client_secret: secret,
                    refresh_token: token,
                });
            }
        }
        None
    }
}

async fn build_authenticator(
    credentials: GoogleCredentials,
) -> Result<Authenticator<Connector>, Box<dyn Error + Send + Sync>> {
    match credentials {
        GoogleCredentials::ServiceAccountFile(path) => {
            let sa_key = read_service_account_key(Path::new(&path)).await?;
            Ok(ServiceAccountAuthenticator::builder(sa_key).build().await?)
        }
        GoogleCredentials::ServiceAccountJson(json) => {
            let sa_key = parse_service_account_key(json.as_bytes())?;
            Ok(ServiceAccountAuthenticator::builder(sa_key).build().await?)
        }
        GoogleCredentials::AuthorizedUser {
            client_id,
            client_secret,
            refresh_token,
        } => {
            let secret: AuthorizedUserSecret = serde_json::from_value(serde_json::json!({
                "type": "authorized_user",
                "client_id": client_id,
                "client_secret": client_secret,
                "refresh_token": refresh_token,
            }))?;
            Ok(AuthorizedUserAuthenticator::builder(secret).build().await?)
        }
    }
}

/// The process-wide Google client handles, built once at startup and shared
/// read-only across requests.
pub struct GoogleHubs {
    pub calendar: CalendarHubType,
    pub sheets: SheetsHubType,
}

pub async fn create_google_hubs(
    config: &GoogleAuthConfig,
) -> Result<GoogleHubs, Box<dyn Error + Send + Sync>> {
    let credentials = GoogleCredentials::from_config(config)
        .ok_or("No Google credentials configured (key file, inline key or OAuth refresh token)")?;

    tracing::info!("Authenticating against Google APIs");
    let auth = build_authenticator(credentials).await?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();

    // Create client without specifying body type
    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    let calendar = CalendarHub::new(client.clone(), auth.clone());
    let sheets = Sheets::new(client, auth);

    Ok(GoogleHubs { calendar, sheets })
}

#[cfg(test)]
mod tests {
    use super::*;
    use citaflow_config::OAuthRefreshConfig;

    #[test]
    fn key_file_wins_over_other_strategies() {
        let config = GoogleAuthConfig {
            key_path: Some("credentials.json".to_string()),
            credentials_json: Some("{}".to_string()),
            oauth: None,
        };
        assert_eq!(
            GoogleCredentials::from_config(&config),
            Some(GoogleCredentials::ServiceAccountFile(
                "credentials.json".to_string()
            ))
        );
    }

    #[test]
    fn oauth_needs_all_three_values() {
        let config = GoogleAuthConfig {
            key_path: None,
            credentials_json: None,
            oauth: Some(OAuthRefreshConfig {
                client_id: Some("id".to_string()),
                client_secret: None,
                refresh_token: Some("token".to_string()),
            }),
        };
        assert_eq!(GoogleCredentials::from_config(&config), None);
    }

    #[test]
    fn no_configuration_means_no_credentials() {
        assert_eq!(
            GoogleCredentials::from_config(&GoogleAuthConfig::default()),
            None
        );
    }
}
