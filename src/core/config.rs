/*!
 * Heap Configuration
 * Environment-driven settings for the heap and the driver binary
 */

use super::limits::{DEFAULT_HEAP_SIZE, ENV_HEAP_SIZE, ENV_JSON_OUTPUT, ENV_TRACE_JSON};
use super::types::Size;
use crate::memory::{HeapError, HeapResult};
use serde::{Deserialize, Serialize};

/// Heap configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeapConfig {
    /// Arena size in bytes
    pub size: Size,
    /// Emit traces as JSON
    pub trace_json: bool,
    /// Render reports as JSON
    pub json_output: bool,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_HEAP_SIZE,
            trace_json: false,
            json_output: false,
        }
    }
}

impl HeapConfig {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    /// Load configuration from the process environment
    ///
    /// Environment variables:
    /// - TINYHEAP_SIZE: arena size in bytes (default: 1024)
    /// - TINYHEAP_TRACE_JSON: JSON trace output (default: false)
    /// - TINYHEAP_JSON: JSON report output (default: false)
    pub fn from_env() -> HeapResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> HeapResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_HEAP_SIZE) {
            config.size = raw.trim().parse().map_err(|_| {
                HeapError::Config(format!("{} must be a non-negative integer, got {:?}", ENV_HEAP_SIZE, raw))
            })?;
        }
        if let Some(raw) = lookup(ENV_TRACE_JSON) {
            config.trace_json = parse_flag(ENV_TRACE_JSON, &raw)?;
        }
        if let Some(raw) = lookup(ENV_JSON_OUTPUT) {
            config.json_output = parse_flag(ENV_JSON_OUTPUT, &raw)?;
        }

        Ok(config)
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }
}

fn parse_flag(key: &str, raw: &str) -> HeapResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(HeapError::Config(format!(
            "{} must be a boolean flag, got {:?}",
            key, other
        ))),
    }
}
