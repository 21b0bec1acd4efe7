use std::fmt;
use std::sync::Arc;

use glam::{Affine3A, Quat, Vec3};

use crate::scene::NodeKey;
use crate::scene::callbacks::{ClientObject, NodeCallbacks};
use crate::scene::controller::SharedController;
use crate::scene::family::FamilyGroup;
use crate::scene::relation::{NormalParentRelation, ParentRelation};
use crate::scene::schedule::ScheduleQueue;
use crate::scene::transform::{Spatial, Transform};

/// What produced a node's world transform during an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformSource {
    Controller,
    Relation,
}

/// A node of the scene graph.
///
/// # Hierarchy
///
/// - `parent`: non-owning handle to the parent (`None` for roots)
/// - `children`: ordered child handles; insertion order is traversal order
///
/// Hierarchy edits go through [`SceneGraph`](crate::SceneGraph), which keeps
/// both ends of every link and the family handle in sync.
///
/// # Spatial state
///
/// [`Spatial`] holds the local and world transforms and the `modified` /
/// `dirty` flags. The world transform is computed by the node's controllers
/// or, when none of them claims it, by its [`ParentRelation`].
pub struct SceneNode {
    pub(crate) key: NodeKey,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,

    pub(crate) spatial: Spatial,
    pub(crate) relation: Box<dyn ParentRelation>,
    pub(crate) controllers: Vec<SharedController>,
    pub(crate) family: Arc<FamilyGroup>,

    pub(crate) callbacks: Arc<dyn NodeCallbacks>,
    pub(crate) client_object: Option<ClientObject>,
    pub(crate) client_info: Option<ClientObject>,
}

impl SceneNode {
    /// Creates a detached root node with a normal parent relation and a
    /// family of its own.
    #[must_use]
    pub fn new(callbacks: Arc<dyn NodeCallbacks>) -> Self {
        Self {
            key: NodeKey::default(),
            parent: None,
            children: Vec::new(),
            spatial: Spatial::new(),
            relation: NormalParentRelation::boxed(),
            controllers: Vec::new(),
            family: FamilyGroup::new(),
            callbacks,
            client_object: None,
            client_info: None,
        }
    }

    #[must_use]
    pub fn with_client_object(mut self, object: ClientObject) -> Self {
        self.client_object = Some(object);
        self
    }

    #[must_use]
    pub fn with_client_info(mut self, info: ClientObject) -> Self {
        self.client_info = Some(info);
        self
    }

    #[must_use]
    pub fn with_relation(mut self, relation: Box<dyn ParentRelation>) -> Self {
        self.relation = relation;
        self
    }

    #[must_use]
    pub fn with_local_transform(mut self, local: Transform) -> Self {
        self.spatial.local = local;
        self
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// The node's handle; the null key until the node is inserted in a graph.
    #[inline]
    #[must_use]
    pub fn key(&self) -> NodeKey {
        self.key
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[inline]
    #[must_use]
    pub fn family(&self) -> &Arc<FamilyGroup> {
        &self.family
    }

    // ========================================================================
    // Spatial state
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn spatial(&self) -> &Spatial {
        &self.spatial
    }

    #[inline]
    #[must_use]
    pub fn local_position(&self) -> Vec3 {
        self.spatial.local.position
    }

    #[inline]
    #[must_use]
    pub fn local_orientation(&self) -> Quat {
        self.spatial.local.orientation
    }

    #[inline]
    #[must_use]
    pub fn local_scale(&self) -> Vec3 {
        self.spatial.local.scale
    }

    #[inline]
    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        self.spatial.world.position
    }

    #[inline]
    #[must_use]
    pub fn world_orientation(&self) -> Quat {
        self.spatial.world.orientation
    }

    #[inline]
    #[must_use]
    pub fn world_scale(&self) -> Vec3 {
        self.spatial.world.scale
    }

    /// World transform as a matrix, for renderers and physics mirrors.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> Affine3A {
        self.spatial.world.to_affine()
    }

    #[inline]
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.spatial.modified
    }

    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.spatial.dirty
    }

    // ========================================================================
    // Relation, controllers, payload
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn relation(&self) -> &dyn ParentRelation {
        self.relation.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn is_vertex_parent(&self) -> bool {
        self.relation.is_vertex_relation()
    }

    #[inline]
    #[must_use]
    pub fn is_slow_parent(&self) -> bool {
        self.relation.is_slow_relation()
    }

    #[inline]
    #[must_use]
    pub fn controllers(&self) -> &[SharedController] {
        &self.controllers
    }

    #[inline]
    #[must_use]
    pub fn callbacks(&self) -> &Arc<dyn NodeCallbacks> {
        &self.callbacks
    }

    #[inline]
    #[must_use]
    pub fn client_object(&self) -> Option<&ClientObject> {
        self.client_object.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn client_info(&self) -> Option<&ClientObject> {
        self.client_info.as_ref()
    }

    /// Replaces the client payload. Meant for replication hooks, which get the
    /// replica before it enters the graph.
    pub fn set_client_object(&mut self, object: Option<ClientObject>) {
        self.client_object = object;
    }

    pub fn set_client_info(&mut self, info: Option<ClientObject>) {
        self.client_info = info;
    }

    // ========================================================================
    // Scheduling
    // ========================================================================

    /// Links this node into the schedule list; roots go to the front.
    pub fn schedule(&self, queue: &ScheduleQueue) -> bool {
        queue.schedule(self.key, self.is_root())
    }

    /// Links this node into the reschedule list.
    pub fn reschedule(&self, queue: &ScheduleQueue) -> bool {
        queue.reschedule(self.key)
    }

    // ========================================================================
    // Update internals
    // ========================================================================

    /// Polls every controller, then falls back to the parent relation when no
    /// controller computed the world transform.
    pub(crate) fn update_spatial_data(
        &mut self,
        parent: Option<&Transform>,
        time: f64,
        parent_updated: &mut bool,
    ) -> Option<TransformSource> {
        let mut computed_by_controller = false;
        for controller in &self.controllers {
            if controller.lock().update(time, &mut self.spatial) {
                computed_by_controller = true;
            }
        }

        if computed_by_controller {
            self.spatial.clear_modified();
            *parent_updated = true;
            return Some(TransformSource::Controller);
        }

        self.relation
            .update_child_coordinates(&mut self.spatial, parent, parent_updated)
            .then_some(TransformSource::Relation)
    }

    pub(crate) fn set_controller_time(&self, time: f64) {
        for controller in &self.controllers {
            controller.lock().set_simulated_time(time);
        }
    }

    /// Shallow copy for replication: transforms, relation copy, callbacks and
    /// payload. The copy has no parent, no children, no controllers, and a
    /// family of its own.
    pub(crate) fn new_replica(&self) -> Self {
        Self {
            key: NodeKey::default(),
            parent: None,
            children: Vec::new(),
            spatial: Spatial {
                local: self.spatial.local,
                world: self.spatial.world,
                modified: true,
                dirty: false,
            },
            relation: self.relation.new_copy(),
            controllers: Vec::new(),
            family: FamilyGroup::new(),
            callbacks: Arc::clone(&self.callbacks),
            client_object: self.client_object.clone(),
            client_info: self.client_info.clone(),
        }
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("key", &self.key)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("spatial", &self.spatial)
            .field("relation", &self.relation)
            .field("controllers", &self.controllers.len())
            .field("family", &self.family.id())
            .field("has_client_object", &self.client_object.is_some())
            .finish_non_exhaustive()
    }
}
