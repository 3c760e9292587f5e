//! Depth-first traversal of the dependency tree into flat nodes and edges.
//!
//! Each call returns the result for its own subtree; the caller merges child
//! results in child order. One key set is shared by the whole walk, so a node
//! is kept only at its first preorder visit and lists keep first-appearance
//! order.

use std::collections::HashSet;

use tracing::{debug, trace};

use meshviz_error::{Error, Result};
use meshviz_topology::{TopologyView, with_stack};

use crate::identity::NodeIdentity;
use crate::metrics::{health_ratios, volume};
use crate::types::{Connection, Node, Notice, Renderer};

pub const DEFAULT_MAX_DEPTH: usize = 256;

pub const PROMETHEUS_NOTICE_TITLE: &str = "Prometheus Graph";

/// Flat output of a traversal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalkResult {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
    /// Sum of edge volumes; entities without a parent contribute nothing.
    pub volume: f64,
}

impl WalkResult {
    fn merge(&mut self, other: WalkResult) {
        self.nodes.extend(other.nodes);
        self.connections.extend(other.connections);
        self.volume += other.volume;
    }
}

/// One entry of the current root-to-entity path.
struct Frame<'a, Id> {
    id: Id,
    key: &'a str,
    depth: usize,
    up: Option<&'a Frame<'a, Id>>,
}

impl<Id: PartialEq + Copy> Frame<'_, Id> {
    fn on_path(&self, id: Id) -> bool {
        let mut frame = Some(self);
        while let Some(f) = frame {
            if f.id == id {
                return true;
            }
            frame = f.up;
        }
        false
    }
}

pub struct TreeWalker<'t, T: TopologyView> {
    topology: &'t T,
    max_depth: usize,
}

impl<'t, T: TopologyView> TreeWalker<'t, T> {
    pub fn new(topology: &'t T) -> Self {
        Self {
            topology,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Walk every root in order and merge the results.
    pub fn walk(&self) -> Result<WalkResult> {
        let mut result = WalkResult::default();
        let mut seen = HashSet::new();
        for &root in self.topology.roots() {
            let tree = self
                .walk_entity(root, None, &mut seen)
                .map_err(|e| e.with_operation("vizceral::walk"))?;
            result.merge(tree);
        }
        debug!(
            nodes = result.nodes.len(),
            connections = result.connections.len(),
            volume = result.volume,
            "topology walked"
        );
        Ok(result)
    }

    fn label(&self, id: T::Id) -> String {
        format!(
            "{} ({})",
            self.topology.name(id),
            self.topology.version(id)
        )
    }

    fn identity(&self, id: T::Id) -> Result<NodeIdentity> {
        NodeIdentity::of(self.topology.name(id), self.topology.version(id))
    }

    fn walk_entity(
        &self,
        id: T::Id,
        caller: Option<&Frame<'_, T::Id>>,
        seen: &mut HashSet<String>,
    ) -> Result<WalkResult> {
        let depth = caller.map_or(0, |f| f.depth + 1);
        if let Some(caller) = caller
            && caller.on_path(id)
        {
            return Err(Error::cycle_detected(self.label(id)));
        }
        if depth > self.max_depth {
            return Err(Error::depth_exceeded(self.label(id), self.max_depth));
        }

        let identity = self.identity(id)?;
        let meta = self.topology.metadata(id);
        let mut result = WalkResult::default();

        if seen.insert(identity.key.clone()) {
            result.nodes.push(Node {
                display_name: identity.display_name.clone(),
                notices: vec![Notice::link(
                    PROMETHEUS_NOTICE_TITLE,
                    meta.link_prom_graph.clone(),
                )],
                ..Node::new(Renderer::FocusedChild, identity.key.clone())
            });
        } else {
            trace!(key = %identity.key, "duplicate node skipped");
        }

        let source = self.source_key(id, caller)?;
        if let Some(source) = source {
            result.connections.push(Connection::new(
                source,
                identity.key.clone(),
                health_ratios(&meta.rates),
            ));
            result.volume += volume(&meta.rates);
        }

        let frame = Frame {
            id,
            key: &identity.key,
            depth,
            up: caller,
        };
        for &child in self.topology.children(id) {
            let subtree = with_stack(|| self.walk_entity(child, Some(&frame), seen))?;
            result.merge(subtree);
        }
        Ok(result)
    }

    /// Key of the edge source for `id`, or `None` for a parentless root.
    fn source_key(&self, id: T::Id, caller: Option<&Frame<'_, T::Id>>) -> Result<Option<String>> {
        match (self.topology.parent(id), caller) {
            (None, None) => Ok(None),
            (Some(parent), Some(caller)) if parent == caller.id => Ok(Some(caller.key.to_string())),
            (Some(parent), Some(caller)) => Err(Error::malformed_entity(
                self.label(id),
                format!(
                    "parent link points at '{}' but it was reached from '{}'",
                    self.label(parent),
                    caller.key
                ),
            )),
            (None, Some(caller)) => Err(Error::malformed_entity(
                self.label(id),
                format!("called by '{}' but has no parent link", caller.key),
            )),
            // A root handed in with a parent link still gets its incoming edge.
            (Some(parent), None) => Ok(Some(self.identity(parent)?.key)),
        }
    }
}
