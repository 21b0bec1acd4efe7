use std::sync::Arc;

use parking_lot::Mutex;

use crate::scene::transform::Spatial;

/// A per-node driver polled at the start of every update of its node.
///
/// Animation players, IK solvers and physics bridges implement this. A
/// controller that writes the node's world transform itself returns `true`
/// from [`update`](Self::update); the node's parent relation is then skipped
/// for this pass.
pub trait SpatialController: Send {
    /// Advances the controller to `time`, optionally writing `spatial`.
    ///
    /// Returns `true` when the world transform of the node was computed here.
    fn update(&mut self, time: f64, spatial: &mut Spatial) -> bool;

    fn set_simulated_time(&mut self, time: f64);
}

/// Controllers are owned outside the node and shared by reference; identity
/// (`Arc::ptr_eq`) is what [`SceneGraph::remove_controller`](crate::SceneGraph::remove_controller)
/// matches on.
pub type SharedController = Arc<Mutex<dyn SpatialController>>;

/// Wraps a controller for attachment to a node.
pub fn shared_controller<C: SpatialController + 'static>(controller: C) -> SharedController {
    Arc::new(Mutex::new(controller))
}
