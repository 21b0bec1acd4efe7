//! Scene graph module
//!
//! Hierarchical transform state and its update machinery:
//! - `Transform` / `Spatial`: local and world TRS state of one node
//! - `ParentRelation`: how a child inherits its parent's world transform
//! - `FamilyGroup`: the shared lock of one connected tree
//! - `SpatialController`: per-node overrides polled before the relation
//! - `NodeCallbacks`: client hooks (replicate, destroy, notify, schedule)
//! - `SceneNode` / `SceneGraph`: the node arena and its operations
//! - `ScheduleQueue`: intrusive lists of nodes awaiting an update
//! - `transform_system`: frame-level drivers draining the queue

pub mod callbacks;
pub mod controller;
pub mod family;
pub mod graph;
pub mod node;
pub mod relation;
pub mod schedule;
pub mod transform;
pub mod transform_system;

pub use callbacks::{ClientObject, DefaultCallbacks, NodeCallbacks, QueueingCallbacks};
pub use controller::{SharedController, SpatialController, shared_controller};
pub use family::FamilyGroup;
pub use graph::SceneGraph;
pub use node::{SceneNode, TransformSource};
pub use relation::{NormalParentRelation, ParentRelation, SlowParentRelation, VertexParentRelation};
pub use schedule::{Membership, ScheduleQueue};
pub use transform::{Spatial, Transform};

use slotmap::new_key_type;

new_key_type! {
    /// Generational handle of a node inside a [`SceneGraph`].
    pub struct NodeKey;
}
