//! Tick scheduling and the playback runtime.

/// Tick sources: virtual and wall-clock timers.
pub mod clock;
/// Runtime driving trees against a sink.
pub mod runtime;
