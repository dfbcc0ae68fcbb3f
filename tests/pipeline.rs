//! End-to-end tests: source tree -> records -> cache/CSV -> network view

use std::fs;
use std::path::Path;

use dependency_network::{
    CompiledConfig, FixedDisplay, Language, TableSource, ViewOptions, Viewport,
    create_network_view, load_or_build, load_records, parse_records, prepare_graph,
    scan_directory, write_csv, write_records,
};

fn write(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_scan_then_render() {
    let src = tempfile::tempdir().unwrap();
    write(
        src.path(),
        "finance/billing.py",
        "zeta.log(1)\ntax.calc(2)\nledger.post(3)\n",
    );
    write(src.path(), "finance/ledger.py", "audit.log(1)\n");
    write(src.path(), "core/tax.py", "ledger.balance()\n");

    let out = tempfile::tempdir().unwrap();
    let records_path = out.path().join("data.json");

    let records = scan_directory(src.path(), Language::Python, &CompiledConfig::empty()).unwrap();
    write_records(&records_path, &records).unwrap();

    let loaded = load_records(&records_path).unwrap();
    assert_eq!(loaded, records);

    let view_path = out.path().join("view.html");
    let options = ViewOptions {
        threshold: 1,
        dynamic_node_size: true,
        dynamic_edge_size: false,
    };
    let (graph, render) = create_network_view(
        &loaded,
        &options,
        FixedDisplay(Viewport::new(1280, 720)),
        &view_path,
    )
    .unwrap();

    // Only billing has references at position >= 1
    assert!(graph.edges.iter().all(|e| e.source == "billing"));
    assert_eq!(graph.edges.len(), 2);
    let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["tax", "billing"]);

    // References are sorted, so billing lists ledger, tax, zeta.
    // "zeta" has no record, so billing -> zeta is skipped in the view
    assert_eq!(render.edges, 1);
    assert_eq!(render.rejected.len(), 1);
    assert_eq!(render.rejected[0].edge.target, "zeta");
    assert_eq!(render.rejected[0].edge.weight, 2);

    let html = fs::read_to_string(&view_path).unwrap();
    assert!(html.contains("width: 1024px"));
    assert!(html.contains("height: 576px"));
}

#[test]
fn test_cache_and_csv() {
    let out = tempfile::tempdir().unwrap();
    let cache_path = out.path().join(".da_df_cache");
    let csv_path = out.path().join("output_data.csv");

    let records = parse_records(
        r#"[
            {"PackageName": "a", "DirectoryName": "d1", "NumberOfLines": 100, "References": ["b", "c"]},
            {"PackageName": "b", "DirectoryName": "d2", "NumberOfLines": 5, "References": {"a": 4}}
        ]"#,
    )
    .unwrap();

    let (table, source) = load_or_build(&records, &cache_path, false).unwrap();
    assert_eq!(source, TableSource::Records);

    write_csv(&csv_path, &table).unwrap();
    assert_eq!(fs::read_to_string(&csv_path).unwrap(), "a,b\nb,a\nc,\n");

    let (cached, source) = load_or_build(&records, &cache_path, false).unwrap();
    assert_eq!(source, TableSource::Cache);
    assert_eq!(cached, table);
}

#[test]
fn test_build_is_deterministic() {
    let records = parse_records(
        r#"[
            {"PackageName": "a", "DirectoryName": "d1", "NumberOfLines": 10, "References": ["b", "c", "d"]},
            {"PackageName": "b", "DirectoryName": "d1", "NumberOfLines": 20, "References": ["c"]},
            {"PackageName": "c", "DirectoryName": "d2", "NumberOfLines": 0, "References": ["a", "b"]}
        ]"#,
    )
    .unwrap();
    let options = ViewOptions {
        threshold: 0,
        dynamic_node_size: true,
        dynamic_edge_size: true,
    };

    let first = prepare_graph(&records, &options);
    let second = prepare_graph(&records, &options);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
