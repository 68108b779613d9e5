// ThinQ cloud HTTP client
//
// Wraps `reqwest::Client` with ThinQ-specific URL construction, session
// header injection, and envelope unwrapping. The OAuth login flow lives
// with the embedder; this client only consumes an installed [`Session`].

use std::sync::{Arc, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{
    Dashboard, DashboardDevice, DeviceData, FilterStatus, FilterStatusData, RESULT_OK,
    ThinqResponse,
};
use crate::transport::TransportConfig;

/// Default ThinQ service endpoint (global backend).
pub const DEFAULT_BASE_URL: &str = "https://aic-service.lgthinq.com:46030/v1/";

/// Command kind accepted by the device control endpoint.
///
/// `Operation` toggles the appliance's power relay; `Set` writes any other
/// status field. The wire format is the bare string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Set,
    Operation,
}

impl CommandKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Set => "Set",
            Self::Operation => "Operation",
        }
    }
}

/// An authenticated ThinQ session.
///
/// Produced by the embedder's auth flow (or loaded from config) and
/// installed on the client with [`ThinqClient::set_session`].
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: SecretString,
    /// ISO country code sent with every request (e.g. `"US"`).
    pub country: String,
    /// IETF language tag sent with every request (e.g. `"en-US"`).
    pub language: String,
}

/// Async client for the ThinQ appliance cloud.
///
/// Cheaply cloneable; the session is shared between clones so a
/// re-authentication in one place is visible everywhere.
#[derive(Clone)]
pub struct ThinqClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<RwLock<Option<Session>>>,
}

impl ThinqClient {
    /// Create a client against the given service base URL.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url,
            session: Arc::new(RwLock::new(None)),
        })
    }

    /// Create a client against the default global backend.
    pub fn with_defaults() -> Result<Self, Error> {
        let base_url = Url::parse(DEFAULT_BASE_URL)?;
        Self::new(base_url, &TransportConfig::default())
    }

    /// The configured service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Session management ───────────────────────────────────────────

    /// Install an authenticated session. Replaces any previous session.
    pub fn set_session(&self, session: Session) {
        *self.session.write().expect("session lock poisoned") = Some(session);
    }

    /// Drop the current session. Subsequent calls fail with
    /// [`Error::NotLoggedIn`] until a new session is installed.
    pub fn clear_session(&self) {
        *self.session.write().expect("session lock poisoned") = None;
    }

    /// Whether a session is currently installed.
    ///
    /// The sync engine checks this before every scheduled cycle and skips
    /// the cycle silently when it returns `false`.
    pub fn is_logged_in(&self) -> bool {
        self.session.read().expect("session lock poisoned").is_some()
    }

    /// Snapshot the current session, or fail with [`Error::NotLoggedIn`].
    fn require_session(&self) -> Result<Session, Error> {
        self.session
            .read()
            .expect("session lock poisoned")
            .clone()
            .ok_or(Error::NotLoggedIn)
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a service path, e.g. `service/devices/{id}`.
    fn service_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// List every appliance registered to the account.
    ///
    /// `GET service/application/dashboard`
    pub async fn list_devices(&self) -> Result<Vec<DashboardDevice>, Error> {
        let url = self.service_url("service/application/dashboard")?;
        debug!("listing devices");
        let dashboard: Dashboard = self.get(url).await?;
        Ok(dashboard.item)
    }

    /// Fetch the full status snapshot for one device.
    ///
    /// `GET service/devices/{deviceId}`
    pub async fn get_device(&self, device_id: &str) -> Result<DeviceData, Error> {
        let url = self.service_url(&format!("service/devices/{device_id}"))?;
        debug!(device = device_id, "fetching device status");
        self.get(url).await
    }

    /// Fetch the filter wear counters for one device.
    ///
    /// `GET service/devices/{deviceId}/filter`
    ///
    /// Returns `None` when the backend omits the counters (some models
    /// never report them).
    pub async fn get_filter_status(&self, device_id: &str) -> Result<Option<FilterStatus>, Error> {
        let url = self.service_url(&format!("service/devices/{device_id}/filter"))?;
        debug!(device = device_id, "fetching filter status");
        let data: FilterStatusData = self.get(url).await?;
        Ok(data.status())
    }

    /// Write one status field on the device.
    ///
    /// `POST service/devices/{deviceId}/control-sync` with
    /// `{ ctrlKey: "basicCtrl", command, dataKey, dataValue }`.
    ///
    /// The appliance chimes audibly on every accepted command -- callers
    /// are expected to suppress redundant writes.
    pub async fn send_command(
        &self,
        device_id: &str,
        command: CommandKind,
        data_key: &str,
        data_value: serde_json::Value,
    ) -> Result<(), Error> {
        let url = self.service_url(&format!("service/devices/{device_id}/control-sync"))?;
        debug!(
            device = device_id,
            command = command.as_str(),
            key = data_key,
            value = %data_value,
            "sending command"
        );
        let body = json!({
            "ctrlKey": "basicCtrl",
            "command": command.as_str(),
            "dataKey": data_key,
            "dataValue": data_value,
        });
        let _: serde_json::Value = self.post(url, &body).await?;
        Ok(())
    }

    /// Re-arm server-side status monitoring for the device.
    ///
    /// `POST service/devices/{deviceId}/control-sync` with
    /// `{ ctrlKey: "allEventEnable", ... }`. The backend silently stops
    /// refreshing a device's snapshot unless this is re-sent periodically.
    pub async fn send_all_event_enable(&self, device_id: &str) -> Result<(), Error> {
        let url = self.service_url(&format!("service/devices/{device_id}/control-sync"))?;
        debug!(device = device_id, "re-arming event monitoring");
        let body = json!({
            "ctrlKey": "allEventEnable",
            "command": "Set",
            "dataKey": "airState.mon.timeout",
            "dataValue": "70",
        });
        let _: serde_json::Value = self.post(url, &body).await?;
        Ok(())
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request with session headers and unwrap the envelope.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let session = self.require_session()?;
        let resp = self
            .apply_session(self.http.get(url), &session)
            .send()
            .await?;
        Self::parse_envelope(resp).await
    }

    /// Send a POST request with JSON body and unwrap the envelope.
    async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl serde::Serialize + Sync),
    ) -> Result<T, Error> {
        let session = self.require_session()?;
        let resp = self
            .apply_session(self.http.post(url).json(body), &session)
            .send()
            .await?;
        Self::parse_envelope(resp).await
    }

    /// Attach the session headers the backend expects on every call.
    fn apply_session(
        &self,
        builder: reqwest::RequestBuilder,
        session: &Session,
    ) -> reqwest::RequestBuilder {
        builder
            .header("x-thinq-token", session.access_token.expose_secret())
            .header("x-country-code", &session.country)
            .header("x-language-code", &session.language)
    }

    /// Parse the `{ resultCode, result }` envelope, returning `result` on
    /// success or an [`Error::Api`] for vendor-side failures.
    async fn parse_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: format!("token rejected (HTTP {})", status.as_u16()),
            });
        }

        // Read the body before status handling so vendor error envelopes
        // returned with non-2xx statuses still surface their result code.
        let body = resp.text().await?;

        let envelope: ThinqResponse<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        if envelope.result_code != RESULT_OK {
            return Err(Error::Api {
                code: envelope.result_code,
                message: format!("request failed (HTTP {})", status.as_u16()),
            });
        }

        envelope.result.ok_or_else(|| Error::Deserialization {
            message: "envelope missing `result` payload".into(),
            body,
        })
    }
}
