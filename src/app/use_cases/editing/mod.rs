//! Use-Case-Funktionen für Topologie-Editing.
//!
//! Alle Operationen sind reine Funktionen `(&Network, Parameter) → EditOutcome`:
//! das Eingabe-Netzwerk bleibt unverändert, unveränderte Mappings werden geteilt.
//!
//! Aufgeteilt nach Operation:
//! - `move_node`: Node verschieben (inkl. Durchgangs-Stützpunkte)
//! - `merge`: Nodes verschmelzen, Snap-Merge
//! - `split_link`: Link an einem Punkt teilen
//! - `create_link`: Link frei zeichnen
//! - `delete_link`: gezeichneten Link löschen
//! - `snap`: Snap-Ziel (Node oder Link) bestimmen
//! - `drop_node`: Ablegen nach Drag (Merge / Split+Merge / Verschieben)

mod create_link;
mod delete_link;
mod drop_node;
mod merge;
mod move_node;
mod outcome;
mod snap;
mod split_link;

#[cfg(test)]
mod test_support;

pub use create_link::create_link;
pub use delete_link::delete_link;
pub use drop_node::drop_node;
pub use merge::{find_merge_candidate, merge_nodes, snap_merge};
pub use move_node::move_node;
pub use outcome::{ChangeSet, EditOutcome, EditSettings};
pub use snap::{find_snap_target, SnapTarget};
pub use split_link::split_link;
