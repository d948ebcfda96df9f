//! Session bootstrap from the persisted store written by the login flow.

use std::collections::BTreeMap;
use std::path::Path;

use asistencia_common::constants::session_keys;
use asistencia_common::{AttendanceError, Session};

/// Key/value session store persisted as a flat JSON object
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    entries: BTreeMap<String, String>,
}

impl SessionStore {
    /// Load the store from disk.
    ///
    /// A missing or unreadable file yields an empty store; the caller then
    /// sees `SessionMissing` and sends the user back to login.
    pub fn load(path: &Path) -> Self {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = ?path, "No session store found");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "Failed to read session store");
                return Self::default();
            }
        };

        match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&data) {
            Ok(raw) => Self::from_entries(
                raw.into_iter()
                    .filter_map(|(key, value)| scalar_to_string(value).map(|v| (key, v))),
            ),
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "Session store is not a JSON object");
                Self::default()
            }
        }
    }

    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Non-empty value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Build the session. `RECORD`, `ID` and `NAME` are required.
    pub fn session(&self) -> Result<Session, AttendanceError> {
        let record_id = self
            .get(session_keys::RECORD)
            .and_then(|r| r.parse::<i64>().ok())
            .ok_or(AttendanceError::SessionMissing(session_keys::RECORD))?;
        let identity_number = self
            .get(session_keys::ID)
            .ok_or(AttendanceError::SessionMissing(session_keys::ID))?;
        let given_names = self
            .get(session_keys::NAME)
            .ok_or(AttendanceError::SessionMissing(session_keys::NAME))?;

        Ok(Session {
            record_id,
            identity_number: identity_number.to_string(),
            given_names: given_names.to_string(),
            family_names: self.get(session_keys::LASTNAME).unwrap_or_default().to_string(),
            username: self.get(session_keys::USER).unwrap_or_default().to_string(),
        })
    }

    /// Forget the session (logout). A missing store is not an error.
    pub fn clear(path: &Path) -> std::io::Result<()> {
        match std::fs::remove_file(path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

fn scalar_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
