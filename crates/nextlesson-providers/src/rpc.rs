//! JSON-RPC timetable source.
//!
//! The authenticated source: a short-lived anonymous session against the
//! school's `jsonrpc.do` endpoint. Sessions are cheap and server-side
//! state is untrusted, so callers log in, do their work, and log out
//! again within a single operation; logout failures are ignored.

use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

use nextlesson_core::ElementType;

use crate::config::UntisConfig;
use crate::error::{SourceError, SourceResult};
use crate::raw::RawPeriod;

/// Client identifier sent with the authenticate call.
const RPC_CLIENT_ID: &str = "nextlesson";

/// Request timeout for RPC calls.
const RPC_TIMEOUT: Duration = Duration::from_secs(15);

/// One element as returned by `getKlassen` / `getTeachers`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RpcElement {
    /// Element id.
    pub id: i64,
    /// Short code.
    pub name: Option<String>,
    /// Long name.
    #[serde(alias = "longName")]
    pub longname: Option<String>,
}

impl RpcElement {
    /// The element's display label: short code first, long name as backup.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.longname.as_deref())
            .unwrap_or_default()
    }
}

/// Client for the JSON-RPC endpoint of one school.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
}

impl RpcClient {
    /// Creates a client for the given deployment.
    pub fn new(config: &UntisConfig) -> SourceResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(RPC_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            url: config.rpc_url(),
        })
    }

    /// Opens an anonymous session.
    pub async fn login(&self) -> SourceResult<RpcSession<'_>> {
        let result = self
            .call(
                None,
                "authenticate",
                json!({
                    "user": "#anonymous#",
                    "password": "",
                    "client": RPC_CLIENT_ID,
                }),
            )
            .await?;

        let session_id = result
            .get("sessionId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                SourceError::InvalidResponse("authenticate result has no sessionId".to_string())
            })?
            .to_string();

        debug!("opened anonymous rpc session");
        Ok(RpcSession {
            client: self,
            session_id,
        })
    }

    /// One JSON-RPC round trip. Attaches the session cookie when present
    /// and unwraps the envelope into its `result` value.
    async fn call(
        &self,
        session_id: Option<&str>,
        method: &str,
        params: Value,
    ) -> SourceResult<Value> {
        let body = json!({
            "id": RPC_CLIENT_ID,
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
        });

        let mut request = self.http.post(&self.url).json(&body);
        if let Some(id) = session_id {
            request = request.header("Cookie", format!("JSESSIONID={id}"));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        unwrap_envelope(&text)
    }
}

/// An open anonymous session. Dropping it without [`logout`] leaves the
/// session to expire server-side; callers are expected to log out on
/// every exit path.
///
/// [`logout`]: RpcSession::logout
#[derive(Debug)]
pub struct RpcSession<'a> {
    client: &'a RpcClient,
    session_id: String,
}

impl RpcSession<'_> {
    /// All classes of the current school year.
    pub async fn classes(&self) -> SourceResult<Vec<RpcElement>> {
        self.elements("getKlassen").await
    }

    /// All teachers. Many deployments deny this to anonymous sessions.
    pub async fn teachers(&self) -> SourceResult<Vec<RpcElement>> {
        self.elements("getTeachers").await
    }

    /// Today's timetable for one element.
    pub async fn timetable(&self, kind: ElementType, id: i64) -> SourceResult<Vec<RawPeriod>> {
        let result = self
            .call("getTimetable", json!({"id": id, "type": kind.code()}))
            .await?;
        serde_json::from_value(result)
            .map_err(|e| SourceError::InvalidResponse(format!("getTimetable: {e}")))
    }

    /// Closes the session. Best effort: a failed logout is logged and
    /// swallowed, never surfaced.
    pub async fn logout(self) {
        if let Err(err) = self.call("logout", json!({})).await {
            warn!(error = %err, "rpc logout failed");
        }
    }

    async fn elements(&self, method: &str) -> SourceResult<Vec<RpcElement>> {
        let result = self.call(method, json!({})).await?;
        serde_json::from_value(result)
            .map_err(|e| SourceError::InvalidResponse(format!("{method}: {e}")))
    }

    async fn call(&self, method: &str, params: Value) -> SourceResult<Value> {
        self.client
            .call(Some(&self.session_id), method, params)
            .await
    }
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    result: Option<Value>,
    error: Option<RpcFault>,
}

#[derive(Debug, Deserialize)]
struct RpcFault {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Parses a response body and unwraps the JSON-RPC envelope. A fault
/// beats a result; a body with neither is malformed.
fn unwrap_envelope(text: &str) -> SourceResult<Value> {
    let envelope: RpcEnvelope = serde_json::from_str(text)
        .map_err(|e| SourceError::InvalidResponse(format!("rpc envelope: {e}")))?;

    if let Some(fault) = envelope.error {
        return Err(SourceError::Rpc {
            code: fault.code,
            message: fault.message,
        });
    }
    envelope
        .result
        .ok_or_else(|| SourceError::InvalidResponse("rpc envelope has no result".to_string()))
}
