//! Ergebnis einer Editier-Operation: neues Netzwerk plus Änderungsbeschreibung.

use crate::core::Network;
use crate::shared::EditorOptions;

/// Welche IDs eine Operation hinzugefügt, entfernt oder verändert hat
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub added_nodes: Vec<String>,
    pub removed_nodes: Vec<String>,
    pub updated_nodes: Vec<String>,
    pub added_links: Vec<String>,
    pub removed_links: Vec<String>,
    pub updated_links: Vec<String>,
    pub removed_buildings: Vec<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added_nodes.is_empty()
            && self.removed_nodes.is_empty()
            && self.updated_nodes.is_empty()
            && self.added_links.is_empty()
            && self.removed_links.is_empty()
            && self.updated_links.is_empty()
            && self.removed_buildings.is_empty()
    }

    /// Hängt eine Folge-Änderung an (z.B. Split gefolgt von Merge).
    ///
    /// Eine in `self` hinzugefügte und in `later` entfernte ID taucht danach in
    /// keiner der beiden Listen mehr auf.
    pub fn absorb(&mut self, later: ChangeSet) {
        absorb_ids(
            &mut self.added_nodes,
            &mut self.removed_nodes,
            &mut self.updated_nodes,
            later.added_nodes,
            later.removed_nodes,
            later.updated_nodes,
        );
        absorb_ids(
            &mut self.added_links,
            &mut self.removed_links,
            &mut self.updated_links,
            later.added_links,
            later.removed_links,
            later.updated_links,
        );
        for id in later.removed_buildings {
            push_unique(&mut self.removed_buildings, id);
        }
    }
}

fn absorb_ids(
    added: &mut Vec<String>,
    removed: &mut Vec<String>,
    updated: &mut Vec<String>,
    later_added: Vec<String>,
    later_removed: Vec<String>,
    later_updated: Vec<String>,
) {
    for id in later_removed {
        updated.retain(|u| *u != id);
        if let Some(pos) = added.iter().position(|a| *a == id) {
            added.remove(pos);
        } else {
            push_unique(removed, id);
        }
    }
    for id in later_added {
        push_unique(added, id);
    }
    for id in later_updated {
        if !added.contains(&id) {
            push_unique(updated, id);
        }
    }
}

pub(crate) fn push_unique(list: &mut Vec<String>, id: String) {
    if !list.contains(&id) {
        list.push(id);
    }
}

/// Neues Netzwerk plus Beschreibung der Änderung
#[derive(Debug, Clone)]
pub struct EditOutcome {
    pub network: Network,
    pub changes: ChangeSet,
}

/// Parameter, die alle Editier-Operationen teilen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditSettings {
    /// Snap-Radius in Metern
    pub snap_threshold: f64,
    /// Toleranz für Durchgangs-Stützpunkte
    pub pass_through_epsilon: f64,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self::from(&EditorOptions::default())
    }
}

impl From<&EditorOptions> for EditSettings {
    fn from(options: &EditorOptions) -> Self {
        Self {
            snap_threshold: options.snap_threshold_m,
            pass_through_epsilon: options.pass_through_epsilon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_absorb_cancels_added_then_removed() {
        let mut first = ChangeSet {
            added_nodes: ids(&["user_node_1"]),
            added_links: ids(&["user_link_1", "user_link_2"]),
            removed_links: ids(&["link_7"]),
            ..ChangeSet::default()
        };
        let second = ChangeSet {
            removed_nodes: ids(&["node_3"]),
            updated_nodes: ids(&["user_node_1"]),
            updated_links: ids(&["user_link_1", "link_9"]),
            ..ChangeSet::default()
        };

        first.absorb(second);

        assert_eq!(first.added_nodes, ids(&["user_node_1"]));
        assert_eq!(first.removed_nodes, ids(&["node_3"]));
        assert!(first.updated_nodes.is_empty());
        assert_eq!(first.updated_links, ids(&["link_9"]));
        assert_eq!(first.removed_links, ids(&["link_7"]));
    }

    #[test]
    fn test_absorb_drops_transient_ids() {
        let mut first = ChangeSet {
            added_nodes: ids(&["user_node_1"]),
            ..ChangeSet::default()
        };
        first.absorb(ChangeSet {
            removed_nodes: ids(&["user_node_1"]),
            ..ChangeSet::default()
        });

        assert!(first.is_empty());
    }
}
