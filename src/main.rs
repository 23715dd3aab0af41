//! OSM Network Editor.
//!
//! Kommandozeilen-Frontend: Overpass-Abfrage erzeugen, Overpass-Antwort in ein
//! Simulations-Netzwerk umwandeln und Event-Streams auswerten.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use osm_network_editor::geo::GeoPoint;
use osm_network_editor::import::build_overpass_query;
use osm_network_editor::stream::decode_stream;
use osm_network_editor::{EditorOptions, EditorSession, ImportMeta};

#[derive(Parser)]
#[command(name = "osm-network-editor")]
#[command(about = "OSM-Straßendaten in Simulations-Netzwerke umwandeln", version)]
struct Args {
    /// Optionen-Datei (TOML); Standard: neben der Programmdatei
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Overpass-Abfrage für ein Gebiet ausgeben
    Query {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Radius in Metern
        #[arg(long, default_value = "1000")]
        radius: f64,
    },
    /// Overpass-Antwort importieren und als network_v2-XML exportieren
    Convert {
        /// Overpass-Antwort (JSON)
        input: PathBuf,
        /// Ziel-Datei für das Netzwerk
        #[arg(short = 'o', long)]
        out: PathBuf,
        /// Editier-Zustand zusätzlich als JSON speichern
        #[arg(long)]
        state: Option<PathBuf>,
        /// Mittelpunkt der Abfrage (Metadaten), z.B. "52.37,9.73"
        #[arg(long)]
        center: Option<String>,
        #[arg(long, default_value = "1000")]
        radius: f64,
    },
    /// Gespeicherten Editier-Zustand als network_v2-XML exportieren
    Export {
        state: PathBuf,
        #[arg(short = 'o', long)]
        out: PathBuf,
    },
    /// Event-Stream-Mitschnitt lesen und Events zählen
    Events { input: PathBuf },
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config_path = args.config.unwrap_or_else(EditorOptions::config_path);
    let options = EditorOptions::load_from_file(&config_path);

    match args.command {
        Command::Query { lat, lon, radius } => {
            println!("{}", build_overpass_query(GeoPoint::new(lat, lon), radius));
        }
        Command::Convert {
            input,
            out,
            state,
            center,
            radius,
        } => {
            let json = std::fs::read_to_string(&input)
                .with_context(|| format!("Eingabe nicht lesbar: {}", input.display()))?;
            let meta = center
                .as_deref()
                .map(parse_center)
                .transpose()?
                .map(|c| ImportMeta::now(c, radius));

            let mut session = EditorSession::new(options);
            let report = session.import_overpass(&json, meta)?;
            log::info!(
                "Import: {} Links, {} Nodes, {} Linien, {} Gebäude ({})",
                report.links,
                report.nodes,
                report.routes,
                report.buildings,
                report.crs
            );
            if let Some(msg) = session.status_message.as_deref() {
                log::warn!("{}", msg);
            }

            session.export_to_file(&out)?;
            if let Some(state) = state {
                session.save_state_to_file(&state)?;
            }
        }
        Command::Export { state, out } => {
            let mut session = EditorSession::new(options);
            session.restore_state_from_file(&state)?;
            session.export_to_file(&out)?;
        }
        Command::Events { input } => {
            let file = std::fs::File::open(&input)
                .with_context(|| format!("Eingabe nicht lesbar: {}", input.display()))?;
            let events = decode_stream(std::io::BufReader::new(file))?;
            println!("{} Events", events.len());
        }
    }
    Ok(())
}

fn parse_center(text: &str) -> Result<GeoPoint> {
    let (lat, lon) = text
        .split_once(',')
        .with_context(|| format!("Ungueltiger Mittelpunkt '{}' (erwartet: lat,lon)", text))?;
    let lat = lat
        .trim()
        .parse()
        .with_context(|| format!("Ungueltige Breite in '{}'", text))?;
    let lon = lon
        .trim()
        .parse()
        .with_context(|| format!("Ungueltige Länge in '{}'", text))?;
    Ok(GeoPoint::new(lat, lon))
}
