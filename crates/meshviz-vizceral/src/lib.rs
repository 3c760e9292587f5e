//! Vizceral rendering of a service dependency topology.
//!
//! The topology is walked once into a deduplicated list of service nodes and
//! a list of caller → callee edges annotated with health ratios, then wrapped
//! into the `global → region → service` nesting the Vizceral client expects,
//! with a synthetic `INTERNET` region feeding the namespace region.
//!
//! # Module Structure
//!
//! - [`identity`]: identity keys and display labels
//! - [`metrics`]: per-edge health ratios and volume
//! - [`walk`]: the depth-first traversal
//! - [`assemble`]: the nested document around the walk result
//! - [`types`]: serde document types

pub mod assemble;
pub mod identity;
pub mod metrics;
pub mod types;
pub mod walk;

use tracing::debug;

use meshviz_error::Result;
use meshviz_topology::TopologyView;

pub use assemble::{GLOBAL_NAME, VizceralOptions, assemble, unix_now};
pub use identity::{INTERNET, NodeIdentity, is_sentinel};
pub use metrics::{EPSILON, health_ratios, volume};
pub use types::{Connection, Document, Metrics, Node, Notice, Renderer};
pub use walk::{DEFAULT_MAX_DEPTH, PROMETHEUS_NOTICE_TITLE, TreeWalker, WalkResult};

// ============================================================================
// Public API
// ============================================================================

/// Transform a topology into a Vizceral document.
///
/// Either the whole document is produced or an error is returned; there is
/// no partial output.
pub fn build_config<T: TopologyView>(topology: &T, options: &VizceralOptions) -> Result<Document> {
    options.validate()?;
    let walked = TreeWalker::new(topology)
        .with_max_depth(options.max_depth)
        .walk()
        .map_err(|e| e.with_context("namespace", options.namespace.clone()))?;
    let updated = options.resolve_updated()?;

    debug!(
        namespace = %options.namespace,
        nodes = walked.nodes.len(),
        connections = walked.connections.len(),
        max_volume = walked.volume,
        "assembling vizceral document"
    );
    Ok(assemble(&options.namespace, walked, updated))
}

/// Transform and serialize in one step.
pub fn render_json<T: TopologyView>(
    topology: &T,
    options: &VizceralOptions,
    pretty: bool,
) -> Result<String> {
    let document = build_config(topology, options)?;
    if pretty {
        document.to_json_pretty()
    } else {
        document.to_json()
    }
}
