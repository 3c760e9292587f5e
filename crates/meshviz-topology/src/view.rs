use std::fmt;
use std::hash::Hash;

use crate::metadata::ServiceMetadata;

/// Read-only access to a dependency tree.
///
/// This is everything the visualization transform needs from its input:
/// the roots, each entity's identity, its parent link, its ordered
/// children and its metadata. Ids passed to the accessors must come from
/// the same view.
pub trait TopologyView {
    type Id: Copy + Eq + Hash + fmt::Debug;

    fn roots(&self) -> &[Self::Id];

    fn name(&self, id: Self::Id) -> &str;

    fn version(&self, id: Self::Id) -> &str;

    fn parent(&self, id: Self::Id) -> Option<Self::Id>;

    fn children(&self, id: Self::Id) -> &[Self::Id];

    fn metadata(&self, id: Self::Id) -> &ServiceMetadata;
}
