/*!
 * Core Types
 * Common types used across the crate
 */

/// Address type for simulated memory offsets
pub type Address = usize;

/// Size type for block lengths and byte counters
pub type Size = usize;

/// Signed byte count accepted from callers of `allocate`
///
/// Kept signed so a negative request can be rejected as an invalid argument
/// instead of wrapping into a huge unsigned value.
pub type ByteCount = isize;
