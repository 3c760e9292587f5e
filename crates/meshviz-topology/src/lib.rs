//! Service dependency topology: the input of the meshviz transform.
//!
//! - [`metadata`]: typed per-entity counters and links
//! - [`raw`]: the nested JSON wire form
//! - [`stack`]: stack growth for recursion over deep trees
//! - [`topology`]: the validated arena and its builder
//! - [`view`]: the read-only trait the transform is written against

pub mod metadata;
pub mod raw;
pub mod stack;
pub mod topology;
pub mod view;

pub use meshviz_error::{Error, ErrorKind, Result};
pub use metadata::{RateCounters, ServiceMetadata};
pub use raw::{RawForest, RawServiceNode};
pub use stack::with_stack;
pub use topology::{EntityId, ServiceNode, Topology, TopologyBuilder};
pub use view::TopologyView;
