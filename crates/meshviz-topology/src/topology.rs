//! Arena-backed dependency tree.
//!
//! Entities live in a flat `Vec` and refer to each other by [`EntityId`];
//! a parent link is just an index, so there is no shared ownership between
//! a caller and the services it calls.

use serde::Deserialize;
use tracing::debug;

use meshviz_error::{Error, Result};

use crate::metadata::ServiceMetadata;
use crate::raw::{RawForest, RawServiceNode};
use crate::view::TopologyView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl EntityId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One observed service at one version.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceNode {
    pub id: EntityId,
    pub name: String,
    pub version: String,
    pub parent: Option<EntityId>,
    pub children: Vec<EntityId>,
    pub metadata: ServiceMetadata,
}

impl ServiceNode {
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.version)
    }
}

/// A forest of dependency trees, one per root.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    nodes: Vec<ServiceNode>,
    roots: Vec<EntityId>,
}

impl Topology {
    /// Parse the JSON wire form and validate every entity.
    ///
    /// The parser's nesting limit is lifted; tree depth is enforced by the
    /// walker's `max_depth` instead.
    pub fn from_json(text: &str) -> Result<Self> {
        let mut de = serde_json::Deserializer::from_str(text);
        de.disable_recursion_limit();
        let forest = RawForest::deserialize(&mut de)
            .and_then(|forest| de.end().map(|()| forest))
            .map_err(|e| Error::from(e).with_operation("topology::from_json"))?;
        Self::from_raw(forest.into_roots())
    }

    /// Build the arena from nested raw trees. Ids are assigned in preorder.
    ///
    /// Fails on the first entity whose metadata is missing or mistyped;
    /// nothing is returned for the other entities in that case.
    pub fn from_raw(roots: Vec<RawServiceNode>) -> Result<Self> {
        let mut builder = TopologyBuilder::new();
        builder
            .insert_raw(roots)
            .map_err(|e| e.with_operation("topology::from_raw"))?;
        let topology = builder.build();
        debug!(
            entities = topology.len(),
            roots = topology.roots.len(),
            "topology validated"
        );
        Ok(topology)
    }

    pub fn builder() -> TopologyBuilder {
        TopologyBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&ServiceNode> {
        self.nodes.get(id.index())
    }

    /// # Panics
    /// Panics if `id` was not produced by this topology.
    pub fn node(&self, id: EntityId) -> &ServiceNode {
        &self.nodes[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceNode> {
        self.nodes.iter()
    }

    /// Find the first entity with the given name and version, in id order.
    pub fn find(&self, name: &str, version: &str) -> Option<EntityId> {
        self.nodes
            .iter()
            .find(|n| n.name == name && n.version == version)
            .map(|n| n.id)
    }
}

impl TopologyView for Topology {
    type Id = EntityId;

    fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    fn name(&self, id: EntityId) -> &str {
        &self.node(id).name
    }

    fn version(&self, id: EntityId) -> &str {
        &self.node(id).version
    }

    fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.node(id).parent
    }

    fn children(&self, id: EntityId) -> &[EntityId] {
        &self.node(id).children
    }

    fn metadata(&self, id: EntityId) -> &ServiceMetadata {
        &self.node(id).metadata
    }
}

/// Incremental construction of a [`Topology`] with already-typed metadata.
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    nodes: Vec<ServiceNode>,
    roots: Vec<EntityId>,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tree root (an entity without a caller).
    pub fn add_root(
        &mut self,
        name: impl Into<String>,
        version: impl Into<String>,
        metadata: ServiceMetadata,
    ) -> Result<EntityId> {
        let id = self.push(None, name.into(), version.into(), metadata)?;
        self.roots.push(id);
        Ok(id)
    }

    /// Add an entity called by `parent`. Children keep insertion order.
    pub fn add_child(
        &mut self,
        parent: EntityId,
        name: impl Into<String>,
        version: impl Into<String>,
        metadata: ServiceMetadata,
    ) -> Result<EntityId> {
        if parent.index() >= self.nodes.len() {
            return Err(Error::entity_not_found(parent.to_string())
                .with_operation("topology::add_child"));
        }
        let id = self.push(Some(parent), name.into(), version.into(), metadata)?;
        self.nodes[parent.index()].children.push(id);
        Ok(id)
    }

    pub fn build(self) -> Topology {
        Topology {
            nodes: self.nodes,
            roots: self.roots,
        }
    }

    fn push(
        &mut self,
        parent: Option<EntityId>,
        name: String,
        version: String,
        metadata: ServiceMetadata,
    ) -> Result<EntityId> {
        let label = format!("{} ({})", name, version);
        metadata.rates.validate(&label)?;
        let raw_id = u32::try_from(self.nodes.len())
            .map_err(|_| Error::invalid_argument("topology has too many entities"))?;
        let id = EntityId(raw_id);
        self.nodes.push(ServiceNode {
            id,
            name,
            version,
            parent,
            children: Vec::new(),
            metadata,
        });
        Ok(id)
    }

    /// Insert raw trees depth-first without recursion, assigning ids in
    /// preorder across all roots.
    fn insert_raw(&mut self, roots: Vec<RawServiceNode>) -> Result<()> {
        let mut pending: Vec<(Option<EntityId>, RawServiceNode)> =
            roots.into_iter().rev().map(|root| (None, root)).collect();
        while let Some((parent, raw)) = pending.pop() {
            let RawServiceNode {
                name,
                version,
                metadata,
                children,
            } = raw;
            let label = format!("{} ({})", name, version);
            let inserted = ServiceMetadata::from_map(&label, &metadata).and_then(|metadata| {
                match parent {
                    Some(parent) => self.add_child(parent, name, version, metadata),
                    None => self.add_root(name, version, metadata),
                }
            });
            let id = match inserted {
                Ok(id) => id,
                Err(e) => {
                    release(children);
                    release(pending.into_iter().map(|(_, raw)| raw).collect());
                    return Err(e);
                }
            };
            pending.extend(children.into_iter().rev().map(|child| (Some(id), child)));
        }
        Ok(())
    }
}

/// Drop raw trees one node at a time instead of one stack frame per level.
fn release(mut nodes: Vec<RawServiceNode>) {
    while let Some(mut node) = nodes.pop() {
        nodes.append(&mut node.children);
    }
}
