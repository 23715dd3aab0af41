//! Simulations-Events aus dem Event-Stream.

use serde::{Deserialize, Serialize};

/// Ein einzelnes Simulations-Event (`type` bestimmt die Variante).
///
/// Unbekannte Typen werden als [`SimulationEvent::Unknown`] gelesen statt zu scheitern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimulationEvent {
    #[serde(rename = "entered link")]
    LinkEnter {
        time: f64,
        link: String,
        vehicle: String,
    },
    #[serde(rename = "left link")]
    LinkLeave {
        time: f64,
        link: String,
        vehicle: String,
    },
    #[serde(rename = "vehicle enters traffic")]
    VehicleEntersTraffic {
        time: f64,
        link: String,
        vehicle: String,
        #[serde(default)]
        person: Option<String>,
    },
    #[serde(rename = "vehicle leaves traffic")]
    VehicleLeavesTraffic {
        time: f64,
        link: String,
        vehicle: String,
        #[serde(default)]
        person: Option<String>,
    },
    #[serde(rename = "departure")]
    Departure {
        time: f64,
        person: String,
        link: String,
        #[serde(rename = "legMode", default)]
        leg_mode: Option<String>,
    },
    #[serde(rename = "arrival")]
    Arrival {
        time: f64,
        person: String,
        link: String,
        #[serde(rename = "legMode", default)]
        leg_mode: Option<String>,
    },
    #[serde(rename = "actstart")]
    ActivityStart {
        time: f64,
        person: String,
        #[serde(default)]
        link: Option<String>,
        #[serde(rename = "actType", default)]
        act_type: Option<String>,
    },
    #[serde(rename = "actend")]
    ActivityEnd {
        time: f64,
        person: String,
        #[serde(default)]
        link: Option<String>,
        #[serde(rename = "actType", default)]
        act_type: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

impl SimulationEvent {
    /// Simulationszeit in Sekunden (fehlt bei unbekannten Events)
    pub fn time(&self) -> Option<f64> {
        match self {
            Self::LinkEnter { time, .. }
            | Self::LinkLeave { time, .. }
            | Self::VehicleEntersTraffic { time, .. }
            | Self::VehicleLeavesTraffic { time, .. }
            | Self::Departure { time, .. }
            | Self::Arrival { time, .. }
            | Self::ActivityStart { time, .. }
            | Self::ActivityEnd { time, .. } => Some(*time),
            Self::Unknown => None,
        }
    }

    /// Betroffener Link, falls das Event einen hat
    pub fn link(&self) -> Option<&str> {
        match self {
            Self::LinkEnter { link, .. }
            | Self::LinkLeave { link, .. }
            | Self::VehicleEntersTraffic { link, .. }
            | Self::VehicleLeavesTraffic { link, .. }
            | Self::Departure { link, .. }
            | Self::Arrival { link, .. } => Some(link),
            Self::ActivityStart { link, .. } | Self::ActivityEnd { link, .. } => link.as_deref(),
            Self::Unknown => None,
        }
    }
}
