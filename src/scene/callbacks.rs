//! Client hooks
//!
//! The graph never knows what its nodes stand for. A client (a game object
//! layer, an editor) attaches an opaque payload to every node and receives
//! notifications through [`NodeCallbacks`]. Every hook has a default, which is
//! what a node without that hook does.

use std::any::Any;
use std::sync::Arc;

use crate::scene::node::SceneNode;
use crate::scene::schedule::ScheduleQueue;

/// Opaque client payload. The graph stores and hands it back, never inspects it.
pub type ClientObject = Arc<dyn Any + Send + Sync>;

/// Client notification hooks, shared between a node and its replicas.
///
/// Hooks run on whatever thread drives the graph. `update_transform` is
/// serialized process-wide unless
/// [`SceneGraphSettings::serialize_transform_callbacks`](crate::SceneGraphSettings::serialize_transform_callbacks)
/// is turned off. While a hook runs, the node passed to it is borrowed from the
/// graph; a hook must not call back into the graph for that same node.
///
/// `update_transform` runs while the walked family is locked. It may edit
/// other nodes of that family; graph calls that would lock any other family
/// return [`SceneGraphError::ForeignFamilyEdit`](crate::SceneGraphError::ForeignFamilyEdit).
pub trait NodeCallbacks: Send + Sync {
    /// Called on a freshly copied replica before its children are copied.
    ///
    /// The replica still carries the source's client payload; a client
    /// typically swaps in a new one here. Returning `false` discards the
    /// replica and its whole branch.
    fn replicate(&self, replica: &mut SceneNode) -> bool {
        let _ = replica;
        true
    }

    /// Receives ownership of a destructed node. The default drops it.
    fn destroy(&self, node: SceneNode) {
        drop(node);
    }

    /// The node's world transform was recomputed.
    fn update_transform(&self, node: &SceneNode) {
        let _ = node;
    }

    /// The node became modified and is not in the schedule list yet.
    ///
    /// Returns whether the node was scheduled.
    fn schedule_for_update(&self, node: &SceneNode, queue: &ScheduleQueue) -> bool {
        let _ = (node, queue);
        false
    }

    /// The node wants another update on a later pass (slow parents).
    fn reschedule_for_update(&self, node: &SceneNode, queue: &ScheduleQueue) {
        let _ = (node, queue);
    }
}

/// Callbacks with every hook left at its default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCallbacks;

impl DefaultCallbacks {
    #[must_use]
    pub fn shared() -> Arc<dyn NodeCallbacks> {
        Arc::new(Self)
    }
}

impl NodeCallbacks for DefaultCallbacks {}

/// Callbacks that link every modified node into the schedule queue and park
/// slow-parented nodes in the reschedule list.
#[derive(Debug, Default, Clone, Copy)]
pub struct QueueingCallbacks;

impl QueueingCallbacks {
    #[must_use]
    pub fn shared() -> Arc<dyn NodeCallbacks> {
        Arc::new(Self)
    }
}

impl NodeCallbacks for QueueingCallbacks {
    fn schedule_for_update(&self, node: &SceneNode, queue: &ScheduleQueue) -> bool {
        node.schedule(queue)
    }

    fn reschedule_for_update(&self, node: &SceneNode, queue: &ScheduleQueue) {
        node.reschedule(queue);
    }
}
