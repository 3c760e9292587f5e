//! Core processing pipeline: read → validate topology → walk and assemble → serialize.

use std::io::Read;
use std::time::Instant;

use tracing::info;

use meshviz_error::Result;
use meshviz_topology::Topology;
use meshviz_vizceral::{VizceralOptions, build_config};

use crate::MeshvizOptions;

/// Read the topology text from a file, or from stdin when `path` is `None`.
pub fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| meshviz_error::Error::from(e).with_context("path", path)),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Run the transform over topology JSON text.
///
/// 1. Parse and validate the topology
/// 2. Walk it and assemble the document
/// 3. Serialize
pub fn transform(opts: &MeshvizOptions, text: &str) -> Result<String> {
    let parse_start = Instant::now();
    let topology = Topology::from_json(text)?;
    info!(
        entities = topology.len(),
        "Topology parsing: {:.3}s",
        parse_start.elapsed().as_secs_f64()
    );

    let build_start = Instant::now();
    let options = VizceralOptions::new(opts.namespace.clone())
        .with_updated(opts.updated)
        .with_max_depth(opts.max_depth);
    let document = build_config(&topology, &options)?;
    info!(
        "Document building: {:.3}s",
        build_start.elapsed().as_secs_f64()
    );

    if opts.pretty {
        document.to_json_pretty()
    } else {
        document.to_json()
    }
}

/// Write the document to a file, or to stdout when `path` is `None`.
pub fn write_output(path: Option<&str>, output: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, output)
                .map_err(|e| meshviz_error::Error::from(e).with_context("path", path))?;
            info!(path, "output written");
        }
        None => println!("{output}"),
    }
    Ok(())
}
