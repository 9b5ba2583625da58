//! Wire types of the toll-gate backend.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /auth/login`.
#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Body returned by `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Collection envelope: `{"data": {"rows": {"rows": [...]}}}`.
///
/// Any missing or `null` level is read as an empty collection. Rows are kept
/// as raw JSON until [`ListEnvelope::into_rows`] so one malformed row does
/// not sink the whole collection.
#[derive(Debug, Deserialize)]
pub(crate) struct ListEnvelope {
    data: Option<ListData>,
}

#[derive(Debug, Deserialize)]
struct ListData {
    rows: Option<RowSet>,
}

#[derive(Debug, Deserialize)]
struct RowSet {
    #[serde(default)]
    rows: Option<Vec<Value>>,
}

impl ListEnvelope {
    /// Decode the rows, skipping (and logging) any that do not fit `T`.
    pub fn into_rows<T: DeserializeOwned>(self) -> Vec<T> {
        self.data
            .and_then(|data| data.rows)
            .and_then(|set| set.rows)
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| {
                serde_json::from_value(row)
                    .inspect_err(|e| tracing::warn!(index, error = %e, "Skipping malformed row"))
                    .ok()
            })
            .collect()
    }
}

/// Error body shape used by the backend (`{"message": "..."}`).
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}
