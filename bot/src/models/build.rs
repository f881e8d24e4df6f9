//! Jenkins build models

use std::fmt;

use serde::Deserialize;

/// Placeholder rendered for fields Jenkins did not report
pub const UNKNOWN: &str = "unknown";

/// Outcome of a single build trigger request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTriggerResult {
    /// Jenkins accepted the build (HTTP 201)
    pub succeeded: bool,

    /// HTTP status returned by Jenkins, `None` when no response was received
    pub status_code: Option<u16>,

    /// Upstream response body, or the transport error text
    pub raw_body: String,
}

impl BuildTriggerResult {
    pub fn from_response(status_code: u16, raw_body: String) -> Self {
        Self {
            succeeded: status_code == 201,
            status_code: Some(status_code),
            raw_body,
        }
    }

    pub fn network_error(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            status_code: None,
            raw_body: message.into(),
        }
    }

    /// Text describing why the trigger failed, `None` when it succeeded
    pub fn failure_message(&self) -> Option<String> {
        if self.succeeded {
            return None;
        }
        Some(match self.status_code {
            Some(code) => format!("Failed to trigger build: {} - {}", code, self.raw_body),
            None => format!("Error: {}", self.raw_body),
        })
    }
}

/// Latest build as reported by `lastBuild/api/json`
///
/// Every field is optional: a job that never ran, or a build still in
/// progress (`"result": null`), omits some of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BuildStatus {
    /// Build number
    #[serde(default)]
    pub number: Option<u64>,

    /// Build result, e.g. `SUCCESS` or `FAILURE`
    #[serde(default)]
    pub result: Option<String>,

    /// Build start time in epoch milliseconds, passed through unconverted
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl BuildStatus {
    pub fn number_display(&self) -> Field<'_, u64> {
        Field(self.number.as_ref())
    }

    pub fn result_display(&self) -> Field<'_, String> {
        Field(self.result.as_ref())
    }

    pub fn timestamp_display(&self) -> Field<'_, i64> {
        Field(self.timestamp.as_ref())
    }
}

/// Displays an optional field, falling back to [`UNKNOWN`]
pub struct Field<'a, T>(Option<&'a T>);

impl<T: fmt::Display> fmt::Display for Field<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => fmt::Display::fmt(value, f),
            None => f.write_str(UNKNOWN),
        }
    }
}
