//! Application-Layer: Editier-Sitzung, Historie, Persistenz und Use-Cases.

pub mod history;
pub mod persistence;
/// Editier-Sitzung
///
/// Hält das aktuelle Netzwerk und führt Edit-Operationen mit Undo/Redo aus.
pub mod session;
pub mod use_cases;

pub use history::{EditHistory, UndoStack};
pub use persistence::{load_state_json, save_state_json, ImportMeta, STATE_FORMAT_VERSION};
pub use session::EditorSession;
