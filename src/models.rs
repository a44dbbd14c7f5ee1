// Typed records for the panel payloads this client consumes.
//
// The panel wraps single objects as `{"object": ..., "attributes": {...}}`
// and lists as `{"object": "list", "data": [<single objects>]}`. The
// `parse_*` functions unwrap those envelopes and report any missing or
// mistyped field as `PanelError::MalformedResponse`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PanelError;

#[derive(Deserialize)]
struct Envelope<T> {
    attributes: T,
}

#[derive(Deserialize)]
struct ListEnvelope<T> {
    data: Vec<Envelope<T>>,
}

fn parse_object<T: DeserializeOwned>(context: &'static str, payload: Value) -> Result<T, PanelError> {
    serde_json::from_value::<Envelope<T>>(payload)
        .map(|envelope| envelope.attributes)
        .map_err(|e| PanelError::malformed(context, e))
}

/// `GET /account`
pub fn parse_account(payload: Value) -> Result<Account, PanelError> {
    parse_object("account", payload)
}

/// `GET /` (server list)
pub fn parse_server_list(payload: Value) -> Result<Vec<Server>, PanelError> {
    serde_json::from_value::<ListEnvelope<Server>>(payload)
        .map(|list| list.data.into_iter().map(|e| e.attributes).collect())
        .map_err(|e| PanelError::malformed("server list", e))
}

/// `GET /servers/{id}`
pub fn parse_server(payload: Value) -> Result<Server, PanelError> {
    parse_object("server", payload)
}

/// `GET /servers/{id}/resources`
pub fn parse_resources(payload: Value) -> Result<ResourceSnapshot, PanelError> {
    parse_object("resources", payload)
}

/// The account the API key belongs to.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Account {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Account {
    /// "First Last" when the panel has either part, otherwise `None`.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|p| !p.trim().is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// A server summary as listed by the panel. `name` is not unique;
/// `identifier` is.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Server {
    pub identifier: String,
    pub name: String,
    #[serde(rename = "server_owner")]
    pub is_owned_by_caller: bool,
    #[serde(default)]
    pub is_suspended: bool,
    #[serde(default)]
    pub limits: Limits,
}

/// Resource limits. The panel uses `0` (or omits the field) for unlimited.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Limits {
    #[serde(default)]
    pub cpu: Option<u64>,
    #[serde(default)]
    pub memory: Option<u64>,
    #[serde(default)]
    pub disk: Option<u64>,
}

impl Limits {
    pub fn cpu_percent(&self) -> Option<u64> {
        nonzero(self.cpu)
    }

    pub fn memory_mb(&self) -> Option<u64> {
        nonzero(self.memory)
    }

    pub fn disk_mb(&self) -> Option<u64> {
        nonzero(self.disk)
    }
}

fn nonzero(value: Option<u64>) -> Option<u64> {
    value.filter(|v| *v > 0)
}

/// Live usage of one server.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ResourceSnapshot {
    pub current_state: ServerState,
    pub resources: ResourceUsage,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ResourceUsage {
    pub cpu_absolute: f64,
    pub memory_bytes: u64,
    pub disk_bytes: u64,
    pub network_rx_bytes: u64,
    pub network_tx_bytes: u64,
}

/// Power state reported in `current_state`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ServerState {
    Running,
    Starting,
    Stopping,
    Stopped,
    Offline,
    Other(String),
}

impl From<String> for ServerState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "running" => ServerState::Running,
            "starting" => ServerState::Starting,
            "stopping" => ServerState::Stopping,
            "stopped" => ServerState::Stopped,
            "offline" => ServerState::Offline,
            _ => ServerState::Other(raw),
        }
    }
}

impl ServerState {
    pub fn is_up(&self) -> bool {
        matches!(self, ServerState::Running | ServerState::Starting)
    }

    pub fn is_down(&self) -> bool {
        matches!(
            self,
            ServerState::Stopped | ServerState::Offline | ServerState::Stopping
        )
    }

    /// Capitalised label for reports, e.g. "Running".
    pub fn label(&self) -> String {
        let raw = match self {
            ServerState::Running => "running",
            ServerState::Starting => "starting",
            ServerState::Stopping => "stopping",
            ServerState::Stopped => "stopped",
            ServerState::Offline => "offline",
            ServerState::Other(raw) => raw.as_str(),
        };
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => "Unknown".to_string(),
        }
    }
}

/// Signal body for `POST /servers/{id}/power`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerSignal {
    Start,
    Stop,
    Restart,
    Kill,
}
