//! Serde form of the dependency tree, as handed over by the query collaborator.

use std::fmt;

use serde::de::value::{MapAccessDeserializer, SeqAccessDeserializer};
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::stack::with_stack;

/// One entity in the nested input tree. The parent is implied by nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawServiceNode {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_children"
    )]
    pub children: Vec<RawServiceNode>,
}

impl RawServiceNode {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            metadata: Map::new(),
            children: Vec::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: RawServiceNode) -> Self {
        self.children.push(child);
        self
    }

    /// Label used in error messages before an identity key exists.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.version)
    }
}

/// Each nesting level is one object plus one array, so the nested
/// deserialization runs on a grown stack.
fn deserialize_children<'de, D>(deserializer: D) -> Result<Vec<RawServiceNode>, D::Error>
where
    D: Deserializer<'de>,
{
    with_stack(|| Vec::<RawServiceNode>::deserialize(deserializer))
}

/// Top-level input: either a list of roots or a single root.
#[derive(Debug, Clone)]
pub enum RawForest {
    Many(Vec<RawServiceNode>),
    One(RawServiceNode),
}

struct ForestVisitor;

impl<'de> Visitor<'de> for ForestVisitor {
    type Value = RawForest;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a service node or a list of service nodes")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<RawForest, A::Error> {
        Vec::deserialize(SeqAccessDeserializer::new(seq)).map(RawForest::Many)
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<RawForest, A::Error> {
        RawServiceNode::deserialize(MapAccessDeserializer::new(map)).map(RawForest::One)
    }
}

// Dispatches on the first token; the tree is never buffered.
impl<'de> Deserialize<'de> for RawForest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ForestVisitor)
    }
}

impl RawForest {
    pub fn into_roots(self) -> Vec<RawServiceNode> {
        match self {
            RawForest::Many(roots) => roots,
            RawForest::One(root) => vec![root],
        }
    }
}
