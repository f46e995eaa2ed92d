//! Process-wide tracing/logging setup.

/// Tracing configuration (filters, formatting).
pub mod tracing;

/// Initialize logging with the default `info` filter.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::DEFAULT_FILTER);
}
