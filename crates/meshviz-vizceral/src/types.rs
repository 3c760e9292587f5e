//! Vizceral document types.
//!
//! Field names and the omit-when-empty rules are the wire contract with the
//! visualization client.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, IntoStaticStr};

use meshviz_error::{Error, Result};

// Renderer

/// How the client draws a node and its children.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Renderer {
    /// Top-level view holding regions.
    Global,
    /// A group of services (the namespace, or the INTERNET boundary).
    #[default]
    Region,
    /// A single service inside a region.
    FocusedChild,
}

// Node, Connection, Notice

/// A node at any nesting level of the document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub renderer: Renderer,
    /// Unique key within the parent's `nodes`.
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Unix seconds; only set on the namespace region.
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub updated: i64,
    #[serde(default, skip_serializing_if = "is_zero_f64")]
    pub max_volume: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Node>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<Connection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
}

impl Node {
    pub fn new(renderer: Renderer, name: impl Into<String>) -> Self {
        Self {
            renderer,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn region(name: impl Into<String>) -> Self {
        Self::new(Renderer::Region, name)
    }

    /// Find a direct child by its key.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Find a direct connection by its endpoints.
    pub fn connection(&self, source: &str, target: &str) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|c| c.source == source && c.target == target)
    }
}

/// A directed edge between two sibling nodes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Connection {
    pub source: String,
    pub target: String,
    pub metrics: Metrics,
}

impl Connection {
    pub fn new(source: impl Into<String>, target: impl Into<String>, metrics: Metrics) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            metrics,
        }
    }
}

/// Traffic split of an edge by health class. All three are always written.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub normal: f64,
    pub warning: f64,
    pub danger: f64,
}

/// An annotation shown next to a node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(default, skip_serializing_if = "is_zero_u8")]
    pub severity: u8,
}

impl Notice {
    pub fn link(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            severity: 0,
        }
    }
}

// Document

/// The complete document handed to the client: a `global` node holding the
/// boundary region and the namespace region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub root: Node,
}

impl Document {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(serialization_error)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(serialization_error)
    }

    /// The namespace region, i.e. the region that is not the boundary.
    pub fn namespace_region(&self) -> Option<&Node> {
        self.root
            .nodes
            .iter()
            .find(|n| n.name != crate::identity::INTERNET)
    }
}

fn serialization_error(err: serde_json::Error) -> Error {
    Error::new(
        meshviz_error::ErrorKind::SerializationFailed,
        err.to_string(),
    )
    .with_operation("vizceral::to_json")
    .set_source(err)
}

fn is_zero_i64(value: &i64) -> bool {
    *value == 0
}

fn is_zero_f64(value: &f64) -> bool {
    *value == 0.0
}

fn is_zero_u8(value: &u8) -> bool {
    *value == 0
}
