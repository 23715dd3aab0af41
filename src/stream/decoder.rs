//! Zeilen-Decoder für Server-Sent-Events.
//!
//! Chunks können an beliebiger Stelle enden (auch mitten in einem UTF-8-Zeichen);
//! unvollständige Zeilen bleiben im Puffer bis zum nächsten `\n`.

use std::io::Read;

use anyhow::{bail, Context, Result};

use super::events::SimulationEvent;

const DATA_PREFIX: &str = "data:";
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Prüft den HTTP-Status der Stream-Antwort (nur 2xx ist gültig).
pub fn check_status(status: u16) -> Result<()> {
    if !(200..300).contains(&status) {
        bail!("Event-Stream abgelehnt: HTTP-Status {}", status);
    }
    Ok(())
}

/// Inkrementeller Decoder: Bytes rein, Events raus
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    skipped: usize,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoder für eine Antwort mit HTTP-Status; Nicht-2xx ist ein harter Fehler.
    pub fn for_response(status: u16) -> Result<Self> {
        check_status(status)?;
        Ok(Self::new())
    }

    /// Verarbeitet einen Chunk und liefert alle darin abgeschlossenen Events.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SimulationEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = self.decode_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Verarbeitet eine letzte Zeile ohne abschließendes `\n`.
    pub fn finish(mut self) -> Vec<SimulationEvent> {
        let rest = std::mem::take(&mut self.buffer);
        self.decode_line(&rest).into_iter().collect()
    }

    /// Anzahl verworfener `data:`-Zeilen mit ungültigem JSON
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn decode_line(&mut self, raw: &[u8]) -> Option<SimulationEvent> {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim_end_matches(['\n', '\r']);

        // Leerzeilen trennen Events, ':' leitet Kommentare ein
        if line.trim().is_empty() || line.starts_with(':') {
            return None;
        }
        let payload = line.strip_prefix(DATA_PREFIX)?.trim();
        if payload.is_empty() {
            return None;
        }

        match serde_json::from_str::<SimulationEvent>(payload) {
            Ok(event) => Some(event),
            Err(e) => {
                log::warn!("Ungültige Event-Zeile verworfen: {} ({})", payload, e);
                self.skipped += 1;
                None
            }
        }
    }
}

/// Liest einen vollständigen Stream aus einem `Read` (z.B. Datei oder Socket).
pub fn decode_stream<R: Read>(mut reader: R) -> Result<Vec<SimulationEvent>> {
    let mut decoder = SseDecoder::new();
    let mut events = Vec::new();
    let mut chunk = vec![0u8; READ_CHUNK_SIZE];

    loop {
        let read = reader
            .read(&mut chunk)
            .context("Event-Stream konnte nicht gelesen werden")?;
        if read == 0 {
            break;
        }
        events.extend(decoder.push(&chunk[..read]));
    }

    let skipped = decoder.skipped();
    events.extend(decoder.finish());
    log::debug!(
        "Event-Stream gelesen: {} Events, {} verworfen",
        events.len(),
        skipped
    );
    Ok(events)
}
