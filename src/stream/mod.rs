//! Decoder für den Simulations-Event-Stream (Server-Sent-Events).
//!
//! Der HTTP-Transport liegt außerhalb der Bibliothek; hier wird nur der
//! Byte-Strom in [`SimulationEvent`]s zerlegt.

pub mod decoder;
pub mod events;

pub use decoder::{check_status, decode_stream, SseDecoder};
pub use events::SimulationEvent;
