//! Editier-Sitzung: aktuelles Netzwerk, Undo/Redo, Optionen und Dateizugriffe.
//!
//! Die Sitzung ist die einzige Stelle mit veränderlichem Zustand; alle
//! Edit-Operationen selbst sind reine Funktionen aus `use_cases::editing`.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use glam::DVec2;

use super::history::EditHistory;
use super::persistence::{load_state_json, save_state_json, ImportMeta};
use super::use_cases::editing::{self, ChangeSet, EditOutcome, EditSettings};
use crate::core::{LinkTags, Network};
use crate::import::{import_overpass_json, ImportReport};
use crate::shared::EditorOptions;
use crate::xml::write_network_xml;

/// Zustand einer Editier-Sitzung
#[derive(Debug, Default)]
pub struct EditorSession {
    network: Option<Network>,
    history: EditHistory,
    options: EditorOptions,
    import_meta: Option<ImportMeta>,
    /// Letzte Statusmeldung für die Oberfläche
    pub status_message: Option<String>,
}

impl EditorSession {
    pub fn new(options: EditorOptions) -> Self {
        Self {
            history: EditHistory::new_with_capacity(options.undo_capacity),
            options,
            ..Self::default()
        }
    }

    pub fn network(&self) -> Option<&Network> {
        self.network.as_ref()
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn import_meta(&self) -> Option<&ImportMeta> {
        self.import_meta.as_ref()
    }

    /// Edit-Parameter aus den aktuellen Optionen
    pub fn settings(&self) -> EditSettings {
        EditSettings::from(&self.options)
    }

    /// Ersetzt das Netzwerk und verwirft die Historie.
    pub fn load_network(&mut self, network: Network, meta: Option<ImportMeta>) {
        log::info!(
            "Netzwerk geladen: {} Nodes, {} Links ({})",
            network.node_count(),
            network.link_count(),
            network.crs()
        );
        self.network = Some(network);
        self.import_meta = meta;
        self.history.clear();
        self.status_message = None;
    }

    /// Importiert eine Overpass-Antwort und lädt das Ergebnis.
    pub fn import_overpass(&mut self, json: &str, meta: Option<ImportMeta>) -> Result<ImportReport> {
        let (network, report) = import_overpass_json(json)?;
        if report.dropped_elements > 0 || report.dropped_references > 0 {
            self.status_message = Some(format!(
                "Import: {} Elemente und {} Referenzen verworfen",
                report.dropped_elements, report.dropped_references
            ));
        }
        let status = self.status_message.take();
        self.load_network(network, meta);
        self.status_message = status;
        Ok(report)
    }

    /// Führt eine Edit-Operation aus und zeichnet den vorherigen Stand auf.
    ///
    /// Schlägt die Operation fehl, bleibt der Zustand unverändert.
    pub fn apply<F>(&mut self, op: F) -> Result<ChangeSet>
    where
        F: FnOnce(&Network, &EditSettings) -> Result<EditOutcome>,
    {
        let settings = self.settings();
        let current = self
            .network
            .as_ref()
            .ok_or_else(|| anyhow!("Kein Netzwerk geladen"))?;

        let outcome = op(current, &settings)?;
        Ok(self.commit(outcome))
    }

    /// Wie [`apply`](Self::apply), aber die Operation darf „nichts zu tun" melden.
    pub fn try_apply<F>(&mut self, op: F) -> Result<Option<ChangeSet>>
    where
        F: FnOnce(&Network, &EditSettings) -> Result<Option<EditOutcome>>,
    {
        let settings = self.settings();
        let current = self
            .network
            .as_ref()
            .ok_or_else(|| anyhow!("Kein Netzwerk geladen"))?;

        Ok(op(current, &settings)?.map(|outcome| self.commit(outcome)))
    }

    fn commit(&mut self, outcome: EditOutcome) -> ChangeSet {
        if let Some(previous) = self.network.replace(outcome.network) {
            self.history.record(&previous);
        }
        log::debug!("Edit angewendet: {:?}", outcome.changes);
        outcome.changes
    }

    // ── Bequemlichkeits-Wrapper ──

    pub fn move_node(&mut self, node_id: &str, position: DVec2) -> Result<ChangeSet> {
        self.apply(|network, settings| editing::move_node(network, node_id, position, settings))
    }

    pub fn drop_node(&mut self, node_id: &str, position: DVec2) -> Result<ChangeSet> {
        self.apply(|network, settings| editing::drop_node(network, node_id, position, settings))
    }

    pub fn merge_nodes(&mut self, dragged_id: &str, target_id: &str) -> Result<ChangeSet> {
        self.apply(|network, settings| {
            editing::merge_nodes(network, dragged_id, target_id, settings)
        })
    }

    pub fn snap_merge(&mut self, node_id: &str, position: DVec2) -> Result<Option<ChangeSet>> {
        self.try_apply(|network, settings| editing::snap_merge(network, node_id, position, settings))
    }

    pub fn split_link(&mut self, link_id: &str, click: Option<DVec2>) -> Result<ChangeSet> {
        self.apply(|network, _| editing::split_link(network, link_id, click))
    }

    pub fn create_link(&mut self, points: &[DVec2], tags: LinkTags) -> Result<ChangeSet> {
        self.apply(|network, settings| editing::create_link(network, points, tags, settings))
    }

    pub fn delete_link(&mut self, link_id: &str) -> Result<ChangeSet> {
        self.apply(|network, _| editing::delete_link(network, link_id))
    }

    // ── Undo / Redo ──

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Stellt den vorherigen Stand wieder her. `false`, wenn nichts rückgängig zu machen ist.
    pub fn undo(&mut self) -> bool {
        let Some(current) = self.network.as_ref() else {
            return false;
        };
        match self.history.undo_with_current(current) {
            Some(previous) => {
                self.network = Some(previous);
                log::debug!("Undo ausgeführt");
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let Some(current) = self.network.as_ref() else {
            return false;
        };
        match self.history.redo_with_current(current) {
            Some(next) => {
                self.network = Some(next);
                log::debug!("Redo ausgeführt");
                true
            }
            None => false,
        }
    }

    // ── Export / Persistenz ──

    /// Erzeugt das Simulations-Netzwerk als XML.
    pub fn export_network_xml(&mut self) -> Result<String> {
        let Some(network) = self.network.as_ref() else {
            let msg = "Kein Netzwerk geladen, Export nicht möglich";
            log::warn!("{}", msg);
            self.status_message = Some(msg.to_string());
            return Err(anyhow!(msg));
        };
        write_network_xml(network, &self.options)
    }

    /// Schreibt das XML in eine Datei.
    pub fn export_to_file(&mut self, path: &Path) -> Result<()> {
        let xml = self.export_network_xml()?;
        std::fs::write(path, xml)
            .with_context(|| format!("Export nach {} fehlgeschlagen", path.display()))?;
        log::info!("Netzwerk exportiert nach: {}", path.display());
        self.status_message = Some(format!("Exportiert: {}", path.display()));
        Ok(())
    }

    /// Serialisiert den aktuellen Zustand als JSON.
    pub fn save_state(&self) -> Result<String> {
        let network = self
            .network
            .as_ref()
            .ok_or_else(|| anyhow!("Kein Netzwerk geladen"))?;
        save_state_json(network, self.import_meta.as_ref())
    }

    /// Stellt einen gespeicherten Zustand wieder her (Historie wird verworfen).
    pub fn restore_state(&mut self, json: &str) -> Result<()> {
        let (network, meta) = load_state_json(json)?;
        self.load_network(network, meta);
        Ok(())
    }

    pub fn save_state_to_file(&self, path: &Path) -> Result<()> {
        let json = self.save_state()?;
        std::fs::write(path, json)
            .with_context(|| format!("Zustand konnte nicht gespeichert werden: {}", path.display()))?;
        log::info!("Editier-Zustand gespeichert: {}", path.display());
        Ok(())
    }

    pub fn restore_state_from_file(&mut self, path: &Path) -> Result<()> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Zustand konnte nicht gelesen werden: {}", path.display()))?;
        self.restore_state(&json)
    }
}
