//! Writer für MATSim-Netzwerke (`network_v2`).

use std::fmt::Write;

use anyhow::Result;
use quick_xml::escape::escape;

use crate::core::{Link, Network};
use crate::shared::EditorOptions;

/// DOCTYPE-Zeile des Zielformats
pub const NETWORK_V2_DOCTYPE: &str =
    "<!DOCTYPE network SYSTEM \"http://www.matsim.org/files/dtd/network_v2.dtd\">";

/// Suffix der exportierten Gegenrichtung eines Zweirichtungs-Links
pub const REVERSE_LINK_SUFFIX: &str = "_r";

/// Schreibt ein Netzwerk als MATSim `network_v2` XML.
///
/// Koordinaten bleiben im projizierten System des Netzwerks; der CRS-Bezeichner
/// steht als Netzwerk-Attribut `coordinateReferenceSystem` im Dokument.
pub fn write_network_xml(network: &Network, options: &EditorOptions) -> Result<String> {
    let crs = network.crs();
    let mut output = String::new();
    output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    output.push_str(NETWORK_V2_DOCTYPE);
    output.push('\n');
    output.push_str("<network>\n");

    output.push_str("    <attributes>\n");
    writeln!(
        output,
        "        <attribute name=\"coordinateReferenceSystem\" class=\"java.lang.String\">{}</attribute>",
        crs
    )?;
    output.push_str("    </attributes>\n");

    // Geographischer Fallback: Grad brauchen mehr Nachkommastellen als Meter
    let decimals = if crs.is_geographic() { 7 } else { 3 };

    output.push_str("    <nodes>\n");
    for node in network.nodes().values() {
        writeln!(
            output,
            "        <node id=\"{}\" x=\"{:.*}\" y=\"{:.*}\"/>",
            escape(node.id.as_str()),
            decimals,
            node.position.x,
            decimals,
            node.position.y
        )?;
    }
    output.push_str("    </nodes>\n");

    writeln!(
        output,
        "    <links capperiod=\"{}\" effectivecellsize=\"7.5\" effectivelanewidth=\"3.75\">",
        escape(options.capacity_period.as_str())
    )?;
    let mut reverse_links = 0usize;
    for link in network.links().values() {
        write_link(&mut output, network, link, options, false)?;
        if options.emit_reverse_links && !link.tags.oneway {
            write_link(&mut output, network, link, options, true)?;
            reverse_links += 1;
        }
    }
    output.push_str("    </links>\n");
    output.push_str("</network>\n");

    log::info!(
        "Netzwerk exportiert ({}): {} Nodes, {} Links (+{} Gegenrichtung)",
        crs,
        network.node_count(),
        network.link_count(),
        reverse_links
    );

    Ok(output)
}

/// Geschätzte Länge eines Links in Metern (Ersatzlänge bei zu kurzer Geometrie)
pub fn link_length(network: &Network, link: &Link, options: &EditorOptions) -> f64 {
    if link.geometry.len() < 2 {
        return options.min_link_length_m;
    }
    link.length(network.crs())
}

fn write_link(
    output: &mut String,
    network: &Network,
    link: &Link,
    options: &EditorOptions,
    reverse: bool,
) -> Result<()> {
    let (id, from, to) = if reverse {
        (
            format!("{}{}", link.id, REVERSE_LINK_SUFFIX),
            &link.to,
            &link.from,
        )
    } else {
        (link.id.clone(), &link.from, &link.to)
    };
    let lanes = link.tags.lanes.unwrap_or(1).max(1);

    writeln!(
        output,
        "        <link id=\"{}\" from=\"{}\" to=\"{}\" length=\"{:.2}\" freespeed=\"{:.2}\" capacity=\"{:.1}\" permlanes=\"{}\" oneway=\"1\" modes=\"{}\">",
        escape(id.as_str()),
        escape(from.as_str()),
        escape(to.as_str()),
        link_length(network, link, options),
        options.freespeed_mps(link.tags.max_speed_kmh),
        options.capacity(link.tags.lanes),
        lanes,
        escape(options.default_mode.as_str())
    )?;

    output.push_str("            <attributes>\n");
    write_string_attribute(output, "osm:way:highway", &link.tags.road_class)?;
    if let Some(name) = &link.tags.name {
        write_string_attribute(output, "osm:way:name", name)?;
    }
    if let Some(origin_id) = link.origin_id {
        write_string_attribute(output, "osm:way:id", &origin_id.to_string())?;
    }
    output.push_str("            </attributes>\n");
    output.push_str("        </link>\n");
    Ok(())
}

fn write_string_attribute(output: &mut String, name: &str, value: &str) -> Result<()> {
    writeln!(
        output,
        "                <attribute name=\"{}\" class=\"java.lang.String\">{}</attribute>",
        escape(name),
        escape(value)
    )?;
    Ok(())
}
