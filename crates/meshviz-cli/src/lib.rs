//! meshviz command-line interface.
//!
pub mod config;
pub mod pipeline;

use meshviz_error::Result;
use meshviz_vizceral::DEFAULT_MAX_DEPTH;

pub use config::FileConfig;
pub use pipeline::{read_input, transform, write_output};

/// Options for running meshviz.
#[derive(Debug, Clone)]
pub struct MeshvizOptions {
    /// Topology JSON file; stdin when `None`.
    pub input: Option<String>,
    /// Destination file; stdout when `None`.
    pub output: Option<String>,
    pub namespace: String,
    /// Frozen `updated` timestamp; the clock is read when `None`.
    pub updated: Option<i64>,
    pub max_depth: usize,
    pub pretty: bool,
}

impl MeshvizOptions {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            input: None,
            output: None,
            namespace: namespace.into(),
            updated: None,
            max_depth: DEFAULT_MAX_DEPTH,
            pretty: false,
        }
    }
}

/// Main entry point: read the topology, transform it and return the document.
pub fn run_main(opts: &MeshvizOptions) -> Result<String> {
    let text = read_input(opts.input.as_deref())?;
    transform(opts, &text)
}
