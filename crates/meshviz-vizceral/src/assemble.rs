//! Wrap walked nodes and edges into the nested Vizceral document.

use std::time::{SystemTime, UNIX_EPOCH};

use meshviz_error::{Error, Result};

use crate::identity::INTERNET;
use crate::types::{Connection, Document, Metrics, Node, Renderer};
use crate::walk::{DEFAULT_MAX_DEPTH, WalkResult};

/// Name of the top-level `global` node.
pub const GLOBAL_NAME: &str = "edge";

/// Options for a single transform.
#[derive(Debug, Clone)]
pub struct VizceralOptions {
    /// Name of the region holding the observed services.
    pub namespace: String,
    /// Unix seconds for the region's `updated` field. `None` reads the clock.
    pub updated: Option<i64>,
    pub max_depth: usize,
}

impl VizceralOptions {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            updated: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_updated(mut self, updated: Option<i64>) -> Self {
        self.updated = updated;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            return Err(Error::invalid_argument("namespace must not be empty")
                .with_operation("vizceral::options"));
        }
        Ok(())
    }

    pub(crate) fn resolve_updated(&self) -> Result<i64> {
        match self.updated {
            Some(updated) => Ok(updated),
            None => unix_now(),
        }
    }
}

pub fn unix_now() -> Result<i64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::unexpected("system clock is before the unix epoch").set_source(e))?;
    i64::try_from(elapsed.as_secs())
        .map_err(|e| Error::unexpected("unix time does not fit in i64").set_source(e))
}

/// Build the document around a walk result.
///
/// All boundary traffic is reported as normal: the split of root-level
/// traffic by response class is not computed.
pub fn assemble(namespace: &str, walked: WalkResult, updated: i64) -> Document {
    let max_volume = walked.volume;

    let namespace_region = Node {
        updated,
        max_volume,
        nodes: walked.nodes,
        connections: walked.connections,
        ..Node::region(namespace)
    };

    let boundary_edge = Connection::new(
        INTERNET,
        namespace,
        Metrics {
            normal: max_volume,
            warning: 0.0,
            danger: 0.0,
        },
    );

    Document {
        root: Node {
            nodes: vec![Node::region(INTERNET), namespace_region],
            connections: vec![boundary_edge],
            ..Node::new(Renderer::Global, GLOBAL_NAME)
        },
    }
}
