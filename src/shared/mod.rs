//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Editor-Optionen, die Import, Editing und Export gemeinsam nutzen.

pub mod options;

pub use options::EditorOptions;
