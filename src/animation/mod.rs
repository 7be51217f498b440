//! Transitions, easing and the frame-precomputing runnable.

/// Easing curves.
pub mod ease;
/// Sampled frames and their rendering.
pub mod frame;
/// Executable leaf built from a transition.
pub mod runnable;
/// Declarative transition description.
pub mod transition;
