use std::fs;
use std::path::PathBuf;

use meshviz_cli::{MeshvizOptions, run_main, transform};
use meshviz_error::ErrorKind;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("testdata")
        .join(name)
}

fn bookinfo_options() -> MeshvizOptions {
    let mut opts = MeshvizOptions::new("istio-system");
    opts.input = Some(testdata("bookinfo.json").display().to_string());
    opts.updated = Some(1_500_000_000);
    opts.pretty = true;
    opts
}

#[test]
fn namespace_graph_matches_golden() {
    let actual = run_main(&bookinfo_options()).expect("bookinfo run");
    let expected = fs::read_to_string(testdata("bookinfo.expected")).expect("read golden");
    assert_eq!(expected.trim_end(), actual);
}

#[test]
fn compact_and_pretty_agree() {
    let pretty = run_main(&bookinfo_options()).expect("pretty run");
    let mut opts = bookinfo_options();
    opts.pretty = false;
    let compact = run_main(&opts).expect("compact run");

    assert!(!compact.contains('\n'));
    let a: serde_json::Value = serde_json::from_str(&pretty).unwrap();
    let b: serde_json::Value = serde_json::from_str(&compact).unwrap();
    assert_eq!(a, b);
}

#[test]
fn repeated_runs_are_identical() {
    let first = run_main(&bookinfo_options()).expect("first run");
    let second = run_main(&bookinfo_options()).expect("second run");
    assert_eq!(first, second);
}

#[test]
fn missing_field_fails_without_output() {
    let text = r#"[{"name": "unknown", "version": "unknown",
        "metadata": {"rate": 0, "rate_2xx": 0, "rate_3xx": 0, "rate_4xx": 0, "rate_5xx": 0,
                     "link_prom_graph": "l"},
        "children": [{"name": "details", "version": "v1",
                      "metadata": {"rate": 1, "rate_2xx": 1, "rate_3xx": 0, "rate_4xx": 0,
                                   "rate_5xx": 0}}]}]"#;
    let err = transform(&MeshvizOptions::new("bookinfo"), text).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingMetadataField);
    assert_eq!(err.context_value("entity"), Some("details (v1)"));
    assert_eq!(err.context_value("key"), Some("link_prom_graph"));
}

#[test]
fn missing_input_file_reports_path() {
    let dir = tempdir().expect("tempdir");
    let mut opts = MeshvizOptions::new("bookinfo");
    opts.input = Some(dir.path().join("absent.json").display().to_string());

    let err = run_main(&opts).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileNotFound);
    assert!(err.context_value("path").unwrap().ends_with("absent.json"));
}

#[test]
fn depth_limit_from_options() {
    let mut opts = bookinfo_options();
    opts.max_depth = 1;
    let err = run_main(&opts).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DepthExceeded);
}

#[test]
fn output_written_to_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("graph.json");
    let document = run_main(&bookinfo_options()).expect("run");

    meshviz_cli::write_output(Some(&path.display().to_string()), &document).expect("write");
    assert_eq!(fs::read_to_string(&path).unwrap(), document);
}

fn chain_topology(depth: usize) -> String {
    let meta = r#""metadata": {"rate": 2, "rate_2xx": 1, "rate_3xx": 0, "rate_4xx": 1,
        "rate_5xx": 0, "link_prom_graph": "http://prom/graph"}"#;
    let mut json = format!(r#"[{{"name": "unknown", "version": "unknown", {meta}"#);
    for i in 0..depth {
        json.push_str(&format!(
            r#", "children": [{{"name": "svc{i}.ns", "version": "v1", {meta}"#
        ));
    }
    json.push_str(&"}]".repeat(depth));
    json.push_str("}]");
    json
}

#[test]
fn deep_chain_within_default_depth() {
    let mut opts = MeshvizOptions::new("bookinfo");
    opts.updated = Some(1_500_000_000);

    for depth in [63, 100, 256] {
        let document = transform(&opts, &chain_topology(depth)).expect("deep chain");
        let value: serde_json::Value = serde_json::from_str(&document).unwrap();
        let region = &value["nodes"][1];
        assert_eq!(region["nodes"].as_array().unwrap().len(), depth + 1);
        assert_eq!(region["connections"].as_array().unwrap().len(), depth);
        assert_eq!(region["maxVolume"], serde_json::json!((2 * depth) as f64));
    }
}

#[test]
fn deep_chain_past_max_depth() {
    let opts = MeshvizOptions::new("bookinfo");
    let err = transform(&opts, &chain_topology(300)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DepthExceeded);
    assert_eq!(err.context_value("entity"), Some("svc256.ns (v1)"));
    assert_eq!(err.context_value("max_depth"), Some("256"));

    let mut opts = MeshvizOptions::new("bookinfo");
    opts.max_depth = 1_000;
    assert!(transform(&opts, &chain_topology(300)).is_ok());
}
