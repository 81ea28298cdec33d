//! Solve request body.

use serde::{Deserialize, Serialize};
use slidetrack_common::SlidetrackError;

/// Errors raised while validating a request body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("field `total_time` must be a positive number of milliseconds")]
    ZeroTimeBudget,

    #[error("malformed request body: {message}")]
    Malformed { message: String },
}

impl From<RequestError> for SlidetrackError {
    fn from(err: RequestError) -> Self {
        SlidetrackError::request_from(err)
    }
}

/// A slider challenge: two base64-encoded images plus a drag time budget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRequest {
    /// Background image with the gap, base64 (optionally a data URL).
    #[serde(rename = "bgbase64image", default)]
    pub background_b64: Option<String>,

    /// Slider piece image, base64 (optionally a data URL).
    #[serde(rename = "sliderbase64image", default)]
    pub slider_b64: Option<String>,

    /// Requested drag duration (ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<u64>,
}

/// A request whose required fields are known to be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedRequest<'a> {
    pub background_b64: &'a str,
    pub slider_b64: &'a str,
    pub total_time_ms: u64,
}

impl SolveRequest {
    pub fn new(background_b64: impl Into<String>, slider_b64: impl Into<String>) -> Self {
        Self {
            background_b64: Some(background_b64.into()),
            slider_b64: Some(slider_b64.into()),
            total_time: None,
        }
    }

    pub fn with_total_time(mut self, total_time_ms: u64) -> Self {
        self.total_time = Some(total_time_ms);
        self
    }

    /// Parse a JSON request body.
    pub fn from_json(body: &str) -> Result<Self, RequestError> {
        serde_json::from_str(body).map_err(|e| RequestError::Malformed {
            message: e.to_string(),
        })
    }

    /// Check required fields, filling the time budget from `default_total_time_ms`.
    pub fn validate(&self, default_total_time_ms: u64) -> Result<ValidatedRequest<'_>, RequestError> {
        let background_b64 = non_empty(self.background_b64.as_deref(), "bgbase64image")?;
        let slider_b64 = non_empty(self.slider_b64.as_deref(), "sliderbase64image")?;
        let total_time_ms = self.total_time.unwrap_or(default_total_time_ms);
        if total_time_ms == 0 {
            return Err(RequestError::ZeroTimeBudget);
        }
        Ok(ValidatedRequest {
            background_b64,
            slider_b64,
            total_time_ms,
        })
    }
}

fn non_empty<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, RequestError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(RequestError::MissingField { field }),
    }
}
