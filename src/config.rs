//! Client configuration
//!
//! Everything is plain data with defaults matching the served interface.
//! Host applications deserialize this from whatever source they own; the
//! core never reads the environment.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Highest value simulated progress may ever show. 100 is reserved for a
/// settled upload.
const MAX_SIMULATED_PERCENT: u8 = 99;

/// Endpoints and timings for one client session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the indexing/answering service (e.g. `http://127.0.0.1:5000`)
    pub base_url: String,
    pub documents_path: String,
    pub upload_path: String,
    pub ask_path: String,
    /// Prefix under which `[图片:name]` references are served
    pub image_path: String,
    /// Multipart field carrying the PDF
    pub upload_field: String,
    pub progress: ProgressConfig,
    /// How long the settled progress bar stays visible
    pub status_display_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            documents_path: "/documents".to_string(),
            upload_path: "/upload".to_string(),
            ask_path: "/ask".to_string(),
            image_path: "/images/".to_string(),
            upload_field: "file".to_string(),
            progress: ProgressConfig::default(),
            status_display_ms: 3000,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Absolute URL for one of the configured paths
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Absolute URL of an image referenced from an answer. The name is used
    /// verbatim.
    pub fn image_url(&self, name: &str) -> String {
        format!("{}{name}", self.endpoint(&self.image_path))
    }

    pub fn status_display(&self) -> Duration {
        Duration::from_millis(self.status_display_ms)
    }
}

/// Cosmetic progress simulation shown while an upload is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    pub tick_ms: u64,
    pub step: u8,
    pub ceiling: u8,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick_ms: 300,
            step: 5,
            ceiling: 90,
        }
    }
}

impl ProgressConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    /// Next simulated value. Never decreases and never exceeds the ceiling.
    pub fn advance(&self, current: u8) -> u8 {
        let ceiling = self.ceiling.min(MAX_SIMULATED_PERCENT);
        current.saturating_add(self.step).min(ceiling).max(current)
    }
}
