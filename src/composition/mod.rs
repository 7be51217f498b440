//! Sequence/parallel trees and the builders that produce them.

/// `sequence`/`parallel` builders.
pub mod dsl;
/// Tree nodes and their playback state machine.
pub mod node;
