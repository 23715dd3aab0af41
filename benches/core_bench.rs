use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec2;
use osm_network_editor::app::use_cases::editing::{find_snap_target, EditSettings};
use osm_network_editor::geo::Crs;
use osm_network_editor::{
    import_overpass_json, write_network_xml, EditorOptions, Link, LinkTags, Network, Node,
};
use std::hint::black_box;

fn bench_import(c: &mut Criterion) {
    let json = include_str!("../tests/fixtures/small_town.json");

    c.bench_function("import_small_town", |b| {
        b.iter(|| {
            let (network, _) = import_overpass_json(black_box(json)).expect("Import fehlgeschlagen");
            black_box(network.link_count())
        })
    });
}

/// Gitter-Netzwerk mit `side × side` Nodes und horizontalen/vertikalen Links
fn build_grid_network(side: usize) -> Network {
    let mut network = Network::new(Crs::etrs89_utm(32));
    let spacing = 100.0;
    let id = |col: usize, row: usize| format!("node_{}", row * side + col);

    for row in 0..side {
        for col in 0..side {
            let position = DVec2::new(col as f64 * spacing, row as f64 * spacing);
            network.insert_node(Node::new(id(col, row), None, position, 0));
        }
    }

    let mut link_index = 0usize;
    for row in 0..side {
        for col in 0..side {
            let from = DVec2::new(col as f64 * spacing, row as f64 * spacing);
            let mut neighbours = Vec::with_capacity(2);
            if col + 1 < side {
                neighbours.push((id(col + 1, row), from + DVec2::new(spacing, 0.0)));
            }
            if row + 1 < side {
                neighbours.push((id(col, row + 1), from + DVec2::new(0.0, spacing)));
            }
            for (to_id, to) in neighbours {
                link_index += 1;
                network.insert_link(Link::new(
                    format!("link_{}", link_index),
                    id(col, row),
                    to_id,
                    vec![from, (from + to) * 0.5, to],
                    LinkTags::new("residential"),
                ));
            }
        }
    }

    let all_ids: Vec<String> = network.nodes().keys().cloned().collect();
    network.recount_degrees(all_ids.iter().map(String::as_str));
    network
}

fn build_query_points(count: usize, extent: f64) -> Vec<DVec2> {
    (0..count)
        .map(|i| {
            let x = ((i * 37) % 1000) as f64 / 1000.0 * extent + 0.37;
            let y = ((i * 71) % 1000) as f64 / 1000.0 * extent + 0.63;
            DVec2::new(x, y)
        })
        .collect()
}

fn bench_snap_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("snap_search");
    let settings = EditSettings::default();

    for &side in &[20usize, 60usize] {
        let network = build_grid_network(side);
        // Index vorab aufbauen, gemessen wird nur die Suche
        black_box(network.spatial_index());
        let query_points = build_query_points(256, (side - 1) as f64 * 100.0);

        group.bench_with_input(
            BenchmarkId::new("find_snap_target", side * side),
            &network,
            |b, network| {
                b.iter(|| {
                    let mut hits = 0usize;
                    for point in &query_points {
                        if find_snap_target(network, black_box(*point), None, settings.snap_threshold)
                            .is_some()
                        {
                            hits += 1;
                        }
                    }
                    black_box(hits)
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("nearest_node", side * side),
            &network,
            |b, network| {
                b.iter(|| {
                    let mut hits = 0usize;
                    for point in &query_points {
                        if network.nearest_node(black_box(*point)).is_some() {
                            hits += 1;
                        }
                    }
                    black_box(hits)
                })
            },
        );
    }

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let network = build_grid_network(60);
    let options = EditorOptions::default();

    c.bench_function("export_network_v2_grid_3600", |b| {
        b.iter(|| {
            let xml = write_network_xml(black_box(&network), &options).expect("Export fehlgeschlagen");
            black_box(xml.len())
        })
    });
}

criterion_group!(core_benches, bench_import, bench_snap_search, bench_export);
criterion_main!(core_benches);
