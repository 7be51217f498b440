//! Sinks receiving the rendered value stream.

/// Sink trait, rendered values and the in-memory recording sink.
pub mod sink;
