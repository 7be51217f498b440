//! Raw input parsing, unit resolution and color handling.

/// Canonical color and color-string grammars.
pub mod color;
/// Layout metrics collaborator for relative units.
pub mod context;
/// Raw value parsing and unit reconciliation.
pub mod parse;
/// CSS length units.
pub mod unit;
