use crate::prelude::*;
use crate::navilink::session::{SERVER_HOST, SERVER_PORT};

use serde::Deserialize;

/// Cloud REST endpoint fronting the gateway directory.
pub const DEFAULT_BASE_URL: &str = "https://uscv2.naviensmartcontrol.com";

/// The service went through two incompatible generations. The dialect picks
/// both the REST endpoints here and which outbound command framing a caller
/// should use against the gateway.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProtocolDialect {
    Legacy,
    Current,
}

/// One cloud-registered gateway. Immutable once fetched; the `GID` doubles as
/// the display identifier and, unhexlified, as the 8-byte device id in every
/// binary frame.
#[derive(Clone, Debug, Deserialize)]
pub struct GatewayDescriptor {
    #[serde(rename = "GID")]
    pub gid: String,
    #[serde(rename = "NickName")]
    pub nickname: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "ConnectionTime")]
    pub connection_time: String,
    #[serde(rename = "ServerIP")]
    pub server_ip: String,
    #[serde(rename = "ServerPort")]
    pub server_port: String,
}

impl GatewayDescriptor {
    /// Binary API endpoint for this gateway, falling back to the fixed
    /// vendor server when the record leaves it blank.
    pub fn endpoint(&self) -> (String, u16) {
        let host = if self.server_ip.is_empty() {
            SERVER_HOST.to_string()
        } else {
            self.server_ip.clone()
        };
        let port = self.server_port.parse().unwrap_or(SERVER_PORT);
        (host, port)
    }
}

/// Login envelope. The gateway list is not in `data` directly: `data` is a
/// JSON-encoded *string* that needs a second parse pass.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
    dialect: ProtocolDialect,
}

impl DirectoryClient {
    pub fn new(dialect: ProtocolDialect) -> Self {
        Self::with_base_url(dialect, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(dialect: ProtocolDialect, base_url: impl Into<String>) -> Self {
        // No User-Agent header: the vendor service sees the stock library
        // agent and misbehaves, so the app suppresses it. reqwest sends none
        // unless asked to.
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            dialect,
        }
    }

    /// Authenticate and enumerate the account's gateways.
    pub async fn login(
        &self,
        user_id: &str,
        password: &str,
    ) -> Result<Vec<GatewayDescriptor>, AuthError> {
        match self.dialect {
            ProtocolDialect::Current => self.request_device_list(user_id, password).await,
            ProtocolDialect::Legacy => self.legacy_gateway_list(user_id, password).await,
        }
    }

    async fn request_device_list(
        &self,
        user_id: &str,
        password: &str,
    ) -> Result<Vec<GatewayDescriptor>, AuthError> {
        let response = self
            .http
            .post(format!("{}/api/requestDeviceList", self.base_url))
            .form(&[("userID", user_id), ("password", password)])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        if status != 200 {
            return Err(classify_failure(status, &body));
        }

        parse_gateway_envelope(&body)
    }

    /// Older accounts authenticate in two steps: the login check returns an
    /// opaque encoded user id, which keys the gateway list request.
    async fn legacy_gateway_list(
        &self,
        user_id: &str,
        password: &str,
    ) -> Result<Vec<GatewayDescriptor>, AuthError> {
        let response = self
            .http
            .post(format!("{}/mobile_login_check.asp", self.base_url))
            .form(&[("userID", user_id), ("password", password)])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        if status != 200 {
            return Err(classify_failure(status, &body));
        }

        let encoded_id = body.trim();
        if encoded_id.is_empty() {
            return Err(AuthError::BadEnvelope(
                "login check returned an empty user id".to_string(),
            ));
        }

        let response = self
            .http
            .post(format!("{}/mobile_gateway_list.asp", self.base_url))
            .form(&[("userID", encoded_id)])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        if status != 200 {
            return Err(classify_failure(status, &body));
        }

        parse_gateway_envelope(&body)
    }
}

/// Map a failed login onto the vendor's error vocabulary so callers can
/// branch (prompt for new credentials vs retry later).
fn classify_failure(status: u16, body: &str) -> AuthError {
    let msg = serde_json::from_str::<Envelope>(body)
        .ok()
        .and_then(|envelope| envelope.msg)
        .unwrap_or_else(|| body.trim().to_string());

    match msg.as_str() {
        "DB_ERROR" => AuthError::InvalidCredentials,
        "ID_IN_USE" => AuthError::IdInUse,
        "SERVER_MAINTENANCE" => AuthError::UnderMaintenance,
        "LOW_VERSION" => AuthError::VersionTooOld,
        "TRY_LATER" => AuthError::TryLater,
        _ => AuthError::Service { status, msg },
    }
}

fn parse_gateway_envelope(body: &str) -> Result<Vec<GatewayDescriptor>, AuthError> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| AuthError::BadEnvelope(e.to_string()))?;

    let data = envelope
        .data
        .ok_or_else(|| AuthError::BadEnvelope("no data field in login response".to_string()))?;

    serde_json::from_str(&data)
        .map_err(|e| AuthError::BadEnvelope(format!("nested gateway list: {e}")))
}
