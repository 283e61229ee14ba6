/*!
 * Limits and Constants
 *
 * Centralized location for heap defaults and reporting thresholds.
 */

// =============================================================================
// HEAP DEFAULTS
// =============================================================================

/// Default simulated arena size (1KB)
/// Used when no size is configured through the environment
pub const DEFAULT_HEAP_SIZE: usize = 1024;

// =============================================================================
// MEMORY PRESSURE THRESHOLDS
// =============================================================================

/// Usage ratio at which pressure is reported as medium (60%)
pub const MEMORY_PRESSURE_MEDIUM: f64 = 0.60;

/// Usage ratio at which pressure is reported as high (80%)
/// Allocations crossing this ratio are logged at warn level
pub const MEMORY_PRESSURE_HIGH: f64 = 0.80;

/// Usage ratio at which pressure is reported as critical (95%)
pub const MEMORY_PRESSURE_CRITICAL: f64 = 0.95;

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Heap size override
pub const ENV_HEAP_SIZE: &str = "TINYHEAP_SIZE";

/// Enable JSON trace output ("1" or "true")
pub const ENV_TRACE_JSON: &str = "TINYHEAP_TRACE_JSON";

/// Emit reports as JSON instead of text ("1" or "true")
pub const ENV_JSON_OUTPUT: &str = "TINYHEAP_JSON";
