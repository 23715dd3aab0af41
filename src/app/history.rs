//! Undo/Redo über vollständige Network-Snapshots.
//!
//! Ein Snapshot ist ein `Network`-Klon und damit O(1): die Mappings liegen hinter
//! `Arc`, die erste Mutation im Use-Case kopiert nur das betroffene Mapping
//! (COW-Semantik). Spätere Änderungen am Live-Netzwerk erreichen gespeicherte
//! Snapshots daher nie.

use std::collections::VecDeque;

use crate::core::Network;
use crate::shared::options::UNDO_CAPACITY;

/// Begrenzter LIFO-Stack von Network-Snapshots.
///
/// Bei Überschreiten der Kapazität wird der älteste Eintrag verworfen.
#[derive(Debug, Clone)]
pub struct UndoStack {
    entries: VecDeque<Network>,
    capacity: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(UNDO_CAPACITY)
    }
}

impl UndoStack {
    /// Erstellt einen leeren Stack mit maximaler Tiefe (mindestens 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Legt einen Snapshot ab.
    pub fn push(&mut self, network: &Network) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(network.clone());
    }

    /// Entnimmt den jüngsten Snapshot; `None` bei leerem Stack.
    pub fn undo(&mut self) -> Option<Network> {
        self.entries.pop_back()
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Undo/Redo-Manager aus zwei symmetrischen [`UndoStack`]s.
///
/// Undo legt den aktuellen Stand auf den Redo-Stack, Redo umgekehrt.
/// Jede neue Aufzeichnung leert den Redo-Stack.
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    undo_stack: UndoStack,
    redo_stack: UndoStack,
}

impl EditHistory {
    /// Erstellt einen neuen History-Manager mit maximaler Tiefe.
    pub fn new_with_capacity(max_depth: usize) -> Self {
        Self {
            undo_stack: UndoStack::new(max_depth),
            redo_stack: UndoStack::new(max_depth),
        }
    }

    /// Zeichnet den Stand VOR einer Mutation auf.
    pub fn record(&mut self, before: &Network) {
        self.undo_stack.push(before);
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.redo_stack.can_undo()
    }

    /// Entnimmt den letzten Undo-Stand und legt `current` auf den Redo-Stack.
    pub fn undo_with_current(&mut self, current: &Network) -> Option<Network> {
        let previous = self.undo_stack.undo()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Entnimmt den letzten Redo-Stand und legt `current` auf den Undo-Stack.
    pub fn redo_with_current(&mut self, current: &Network) -> Option<Network> {
        let next = self.redo_stack.undo()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
