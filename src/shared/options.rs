//! Zentrale Konfiguration für den OSM Network Editor.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Editing ─────────────────────────────────────────────────────────

/// Snap-Radius in Metern: ein abgelegter Node verschmilzt mit Nodes innerhalb dieses Radius.
pub const SNAP_THRESHOLD_M: f64 = 10.0;
/// Toleranz für Durchgangs-Stützpunkte beim Verschieben eines Nodes.
pub const PASS_THROUGH_EPSILON: f64 = 1e-6;

// ── History ─────────────────────────────────────────────────────────

/// Maximale Anzahl Undo-Schritte.
pub const UNDO_CAPACITY: usize = 50;

// ── Export ──────────────────────────────────────────────────────────

/// Kapazität je Fahrstreifen in Fahrzeugen pro `capacity_period`.
pub const CAPACITY_PER_LANE: f64 = 600.0;
/// Freifluss-Geschwindigkeit ohne `maxspeed`-Tag (km/h).
pub const DEFAULT_SPEED_KMH: u32 = 50;
/// Ersatzlänge für Links ohne verwertbare Geometrie (Meter).
pub const MIN_LINK_LENGTH_M: f64 = 100.0;
/// Bezugszeitraum der Kapazität (`capPeriod`).
pub const CAPACITY_PERIOD: &str = "01:00:00";
/// Erlaubter Verkehrsmodus der exportierten Links.
pub const DEFAULT_MODE: &str = "car";

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `osm_network_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorOptions {
    // ── Editing ─────────────────────────────────────────────────
    /// Snap-Radius in Metern (Merge, Split-Ziel, Start beim Zeichnen)
    pub snap_threshold_m: f64,
    /// Toleranz für Durchgangs-Stützpunkte in Projektionseinheiten
    pub pass_through_epsilon: f64,

    // ── History ─────────────────────────────────────────────────
    /// Maximale Tiefe des Undo-Stacks
    pub undo_capacity: usize,

    // ── Export ──────────────────────────────────────────────────
    /// Kapazität je Fahrstreifen
    pub capacity_per_lane: f64,
    /// Standard-Geschwindigkeit ohne Tag (km/h)
    pub default_speed_kmh: u32,
    /// Ersatzlänge bei Geometrie mit weniger als 2 Punkten
    pub min_link_length_m: f64,
    /// Bezugszeitraum der Kapazität (`HH:MM:SS`)
    pub capacity_period: String,
    /// Zweirichtungs-Links zusätzlich als Gegenrichtung `<id>_r` exportieren
    pub emit_reverse_links: bool,
    /// Verkehrsmodus (`modes`-Attribut)
    pub default_mode: String,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            snap_threshold_m: SNAP_THRESHOLD_M,
            pass_through_epsilon: PASS_THROUGH_EPSILON,

            undo_capacity: UNDO_CAPACITY,

            capacity_per_lane: CAPACITY_PER_LANE,
            default_speed_kmh: DEFAULT_SPEED_KMH,
            min_link_length_m: MIN_LINK_LENGTH_M,
            capacity_period: CAPACITY_PERIOD.to_string(),
            emit_reverse_links: true,
            default_mode: DEFAULT_MODE.to_string(),
        }
    }
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("osm_network_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("osm_network_editor.toml")
    }

    /// Freifluss-Geschwindigkeit in m/s für eine optionale Tempo-Angabe in km/h
    pub fn freespeed_mps(&self, max_speed_kmh: Option<u32>) -> f64 {
        f64::from(max_speed_kmh.unwrap_or(self.default_speed_kmh)) / 3.6
    }

    /// Kapazität für eine optionale Fahrstreifen-Anzahl (mindestens 1 Streifen)
    pub fn capacity(&self, lanes: Option<u32>) -> f64 {
        f64::from(lanes.unwrap_or(1).max(1)) * self.capacity_per_lane
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let opts: EditorOptions = toml::from_str("snap_threshold_m = 3.0\n").expect("TOML erwartet");

        assert_eq!(opts.snap_threshold_m, 3.0);
        assert_eq!(opts.undo_capacity, UNDO_CAPACITY);
        assert_eq!(opts.default_mode, "car");
        assert!(opts.emit_reverse_links);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("Temp-Verzeichnis erwartet");
        let path = dir.path().join("options.toml");

        let opts = EditorOptions {
            snap_threshold_m: 50.0,
            emit_reverse_links: false,
            ..EditorOptions::default()
        };
        opts.save_to_file(&path).expect("Speichern erwartet");

        assert_eq!(EditorOptions::load_from_file(&path), opts);
    }

    #[test]
    fn test_broken_or_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("Temp-Verzeichnis erwartet");
        let path = dir.path().join("kaputt.toml");
        std::fs::write(&path, "snap_threshold_m = \"zehn\"").expect("Schreiben erwartet");

        assert_eq!(EditorOptions::load_from_file(&path), EditorOptions::default());
        assert_eq!(
            EditorOptions::load_from_file(&dir.path().join("fehlt.toml")),
            EditorOptions::default()
        );
    }

    #[test]
    fn test_freespeed_and_capacity() {
        let opts = EditorOptions::default();

        assert!((opts.freespeed_mps(Some(50)) - 13.888_888).abs() < 1e-5);
        assert!((opts.freespeed_mps(None) - 13.888_888).abs() < 1e-5);
        assert_eq!(opts.capacity(Some(2)), 1200.0);
        assert_eq!(opts.capacity(None), 600.0);
        assert_eq!(opts.capacity(Some(0)), 600.0);
    }
}
