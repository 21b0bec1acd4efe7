//! Spatial Graph
//!
//! A hierarchical transform engine: nodes carry a local position, orientation
//! and scale relative to their parent, and an update pass propagates those into
//! world space through a pluggable parent relation (rigid, vertex-only or
//! damped "slow parent").
//!
//! Updates can be driven from a single thread, or from a pool of workers that
//! each own one *family* (a connected tree sharing a single lock) at a time.
//!
//! ```rust,ignore
//! use spatial_graph::prelude::*;
//!
//! let mut graph = SceneGraph::new();
//! let root = graph.insert(SceneNode::new(QueueingCallbacks::shared()));
//! let arm = graph.insert(SceneNode::new(QueueingCallbacks::shared()));
//! graph.add_child(root, arm)?;
//!
//! graph.set_local_position(root, Vec3::new(1.0, 0.0, 0.0))?;
//! transform_system::update_scheduled(&graph, 0.0);
//! ```

pub mod errors;
pub mod scene;
pub mod settings;

pub use errors::{Result, SceneGraphError};
pub use scene::{
    ClientObject, DefaultCallbacks, FamilyGroup, Membership, NodeCallbacks, NodeKey,
    NormalParentRelation, ParentRelation, QueueingCallbacks, SceneGraph, SceneNode,
    ScheduleQueue, SharedController, SlowParentRelation, Spatial, SpatialController, Transform,
    VertexParentRelation, transform_system,
};
pub use settings::SceneGraphSettings;

pub mod prelude {
    pub use crate::errors::{Result, SceneGraphError};
    pub use crate::scene::*;
    pub use crate::settings::SceneGraphSettings;
    pub use glam::{Quat, Vec3};
}
