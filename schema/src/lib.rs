// Creature Arena Schema - Shared record definitions
// This crate holds the plain records read from the metadata files (RON) and the
// element enum the damage table is keyed on. The engine crate turns these into
// its linked, validated catalog.

pub use element::*;
pub use records::*;

pub mod element;
pub mod records;
