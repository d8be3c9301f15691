use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Type-specific filter configuration that this crate carries but never interprets.
pub type ConfigMap = serde_json::Map<String, serde_json::Value>;

/// Settings for talking to the slug suggestion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub slug_endpoint: String,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    pub user_agent: String,
}

/// Plain filter definition record: `{ name, filterType, ... }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub filter_type: String,
    #[serde(flatten)]
    pub config: ConfigMap,
}

impl FilterRecord {
    pub fn new(name: impl Into<String>, filter_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filter_type: filter_type.into(),
            config: ConfigMap::new(),
        }
    }
}

/// Plain applied-filter record: the filter it refers to plus whatever the filter type needs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilterRecord {
    #[serde(default)]
    pub filter: Option<FilterRecord>,
    #[serde(flatten)]
    pub config: ConfigMap,
}

/// Boundary representation of a column. Every field is optional on input;
/// `Column::unwrap` always fills them in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub applied_filters: Vec<AppliedFilterRecord>,
}

/// Response body of the slug suggestion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlugOptionsResponse {
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    Closed,
    New,
    Editing,
}

impl SessionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionMode::Closed => "closed",
            SessionMode::New => "new",
            SessionMode::Editing => "editing",
        }
    }
}

/// Completions of slug suggestion requests, delivered back to the session owner.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SlugOptionsLoaded {
        request_id: u64,
        options: Vec<String>,
    },
    SlugOptionsFailed {
        request_id: u64,
        message: String,
    },
}

impl SessionEvent {
    pub fn request_id(&self) -> u64 {
        match self {
            SessionEvent::SlugOptionsLoaded { request_id, .. }
            | SessionEvent::SlugOptionsFailed { request_id, .. } => *request_id,
        }
    }
}

/// Snapshot of a session for CLI/JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub mode: SessionMode,
    pub column: Option<ColumnRecord>,
    pub old_column: Option<ColumnRecord>,
    pub slug_options: Vec<String>,
    pub is_column_valid: bool,
    pub is_save_disabled: bool,
}
