//! The scene graph arena.
//!
//! [`SceneGraph`] owns every node in a [`SlotMap`] and is the only place where
//! hierarchy links are edited, so both ends of a parent/child link and the
//! family handle of a whole subtree always change together.
//!
//! # Locking
//!
//! Three lock domains, always taken in this order:
//!
//! 1. family locks ([`FamilyGroup`]), one per connected tree, held for a whole
//!    subtree walk by [`SceneGraph::update_world_data_thread`] and around every
//!    transform edit;
//! 2. per-node `RwLock`s, held only for the few instructions touching one node;
//! 3. the schedule lock inside [`ScheduleQueue`], and the process-wide
//!    notification lock around update-transform callbacks.
//!
//! An update-transform callback runs under the notification lock, so it may
//! only lock the family being walked (reentrantly). Any call from such a
//! callback that would lock another family fails with
//! [`SceneGraphError::ForeignFamilyEdit`] instead of blocking.
//!
//! Hierarchy edits take `&mut self` and so can never race an update.

use std::cell::Cell;
use std::sync::Arc;

use glam::{Affine3A, Quat, Vec3};
use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::errors::{Result, SceneGraphError};
use crate::scene::NodeKey;
use crate::scene::callbacks::{ClientObject, DefaultCallbacks};
use crate::scene::controller::SharedController;
use crate::scene::family::FamilyGroup;
use crate::scene::node::{SceneNode, TransformSource};
use crate::scene::relation::ParentRelation;
use crate::scene::schedule::{Membership, ScheduleQueue};
use crate::scene::transform::Transform;
use crate::settings::SceneGraphSettings;

/// Serializes client notification code across every graph in the process.
static TRANSFORM_NOTIFY_LOCK: Mutex<()> = parking_lot::const_mutex(());

thread_local! {
    /// Family id of the node whose update-transform callback is running on
    /// this thread.
    static NOTIFYING_FAMILY: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Marks the current thread as notifying for one family until dropped.
struct NotifyScope {
    previous: Option<u64>,
}

impl NotifyScope {
    fn enter(family: u64) -> Self {
        Self {
            previous: NOTIFYING_FAMILY.replace(Some(family)),
        }
    }
}

impl Drop for NotifyScope {
    fn drop(&mut self) {
        NOTIFYING_FAMILY.set(self.previous);
    }
}

/// One level of an in-progress replication.
struct ReplicaFrame {
    source: NodeKey,
    replica: SceneNode,
    /// Source children left to copy, last child first.
    pending: Vec<NodeKey>,
    replicas: SmallVec<[NodeKey; 8]>,
}

/// Hierarchical transform graph.
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, RwLock<SceneNode>>,
    queue: ScheduleQueue,
    settings: SceneGraphSettings,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(SceneGraphSettings::default())
    }

    #[must_use]
    pub fn with_settings(settings: SceneGraphSettings) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(settings.node_capacity),
            queue: ScheduleQueue::new(),
            settings,
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &SceneGraphSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn schedule_queue(&self) -> &ScheduleQueue {
        &self.queue
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Iterates over every live key, in arena order.
    pub fn keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.nodes.keys()
    }

    /// Read access to a node.
    ///
    /// The guard blocks writers to this one node; do not hold it across calls
    /// that edit the same node.
    #[must_use]
    pub fn node(&self, key: NodeKey) -> Option<RwLockReadGuard<'_, SceneNode>> {
        self.nodes.get(key).map(RwLock::read)
    }

    fn slot(&self, key: NodeKey) -> Result<&RwLock<SceneNode>> {
        self.nodes.get(key).ok_or(SceneGraphError::NodeNotFound(key))
    }

    /// The node's family, unless locking it would invert the lock order
    /// (see the module docs).
    fn lockable_family(&self, key: NodeKey, slot: &RwLock<SceneNode>) -> Result<Arc<FamilyGroup>> {
        let family = Arc::clone(&slot.read().family);
        match NOTIFYING_FAMILY.get() {
            Some(active) if active != family.id() => {
                log::warn!("update-transform callback tried to lock the family of {key:?}");
                Err(SceneGraphError::ForeignFamilyEdit(key))
            }
            _ => Ok(family),
        }
    }

    fn node_mut(&mut self, key: NodeKey) -> Result<&mut SceneNode> {
        self.nodes
            .get_mut(key)
            .map(RwLock::get_mut)
            .ok_or(SceneGraphError::NodeNotFound(key))
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Moves a node into the graph and returns its key.
    pub fn insert(&mut self, node: SceneNode) -> NodeKey {
        self.nodes.insert_with_key(|key| {
            let mut node = node;
            node.key = key;
            RwLock::new(node)
        })
    }

    /// Inserts a payload-less root node with default callbacks.
    pub fn create_node(&mut self) -> NodeKey {
        self.insert(SceneNode::new(DefaultCallbacks::shared()))
    }

    // ========================================================================
    // Hierarchy queries
    // ========================================================================

    #[must_use]
    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.node(key).and_then(|node| node.parent)
    }

    #[must_use]
    pub fn children(&self, key: NodeKey) -> Vec<NodeKey> {
        self.node(key)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// Walks up to the topmost ancestor (the node itself for a root).
    #[must_use]
    pub fn root_sg_parent(&self, key: NodeKey) -> Option<NodeKey> {
        let mut current = key;
        loop {
            match self.node(current)?.parent {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
    }

    /// Whether `ancestor` appears on the parent chain of `key`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeKey, key: NodeKey) -> bool {
        let mut cursor = self.parent(key);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    #[must_use]
    pub fn family(&self, key: NodeKey) -> Option<Arc<FamilyGroup>> {
        self.node(key).map(|node| Arc::clone(&node.family))
    }

    #[must_use]
    pub fn is_vertex_parent(&self, key: NodeKey) -> bool {
        self.node(key).is_some_and(|node| node.is_vertex_parent())
    }

    #[must_use]
    pub fn is_slow_parent(&self, key: NodeKey) -> bool {
        self.node(key).is_some_and(|node| node.is_slow_parent())
    }

    #[must_use]
    pub fn world_transform(&self, key: NodeKey) -> Option<Transform> {
        self.node(key).map(|node| node.spatial.world)
    }

    #[must_use]
    pub fn local_transform(&self, key: NodeKey) -> Option<Transform> {
        self.node(key).map(|node| node.spatial.local)
    }

    #[must_use]
    pub fn world_matrix(&self, key: NodeKey) -> Option<Affine3A> {
        self.node(key).map(|node| node.world_matrix())
    }

    // ========================================================================
    // Hierarchy edits
    // ========================================================================

    /// Appends `child` to `parent`'s children.
    ///
    /// The child is detached from its previous parent first, joins the
    /// parent's family together with its whole subtree, and is marked
    /// modified.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<()> {
        self.slot(parent)?;
        self.slot(child)?;
        if parent == child || self.is_ancestor(child, parent) {
            log::warn!("Cannot attach {child:?} under {parent:?}: cycle");
            return Err(SceneGraphError::CyclicHierarchy { child, parent });
        }

        self.unlink_from_parent(child);
        self.link_child(parent, child);
        log::debug!("attached {child:?} under {parent:?}");

        self.set_modified(child)
    }

    /// Attaches `child` under `parent`, or detaches it when `parent` is `None`.
    pub fn set_sg_parent(&mut self, child: NodeKey, parent: Option<NodeKey>) -> Result<()> {
        match parent {
            Some(parent) => self.add_child(parent, child),
            None => self.disconnect_from_parent(child),
        }
    }

    /// Makes `key` a root. Its subtree gets a brand-new family so it stops
    /// contending with its former relatives. No-op for roots.
    pub fn disconnect_from_parent(&mut self, key: NodeKey) -> Result<()> {
        self.slot(key)?;
        if self.unlink_from_parent(key).is_none() {
            return Ok(());
        }
        self.set_family(key, &FamilyGroup::new());
        log::debug!("detached {key:?}");

        self.set_modified(key)
    }

    /// Removes `child` from its parent's child list and clears its parent
    /// link. Families are left untouched.
    fn unlink_from_parent(&mut self, child: NodeKey) -> Option<NodeKey> {
        let parent = self.node_mut(child).ok()?.parent.take()?;
        if let Ok(parent_node) = self.node_mut(parent)
            && let Some(index) = parent_node.children.iter().position(|&c| c == child)
        {
            parent_node.children.remove(index);
        }
        Some(parent)
    }

    /// Links a detached `child` under `parent` and shares the parent's family
    /// with the child's subtree.
    fn link_child(&mut self, parent: NodeKey, child: NodeKey) {
        let Ok(parent_node) = self.node_mut(parent) else {
            return;
        };
        parent_node.children.push(child);
        let family = Arc::clone(&parent_node.family);

        if let Ok(child_node) = self.node_mut(child) {
            debug_assert!(child_node.parent.is_none(), "child must be detached first");
            child_node.parent = Some(parent);
        }
        self.set_family(child, &family);
    }

    /// Assigns `family` to `key` and every descendant.
    fn set_family(&mut self, key: NodeKey, family: &Arc<FamilyGroup>) {
        let mut stack: SmallVec<[NodeKey; 16]> = SmallVec::new();
        stack.push(key);
        while let Some(current) = stack.pop() {
            if let Ok(node) = self.node_mut(current) {
                node.family = Arc::clone(family);
                stack.extend(node.children.iter().copied());
            }
        }
    }

    // ========================================================================
    // Replication & destruction
    // ========================================================================

    /// Deep-copies the subtree rooted at `key`.
    ///
    /// Each copied node runs its replication hook; a refusing hook drops that
    /// branch. Copies that end up with neither children nor a client object
    /// are pruned. Returns `Ok(None)` when nothing survives. The replica is a
    /// new root in a family of its own.
    pub fn replicate(&mut self, key: NodeKey) -> Result<Option<NodeKey>> {
        self.slot(key)?;
        let replica = self.process_replica(key);
        log::debug!("replicated {key:?} -> {replica:?}");
        Ok(replica)
    }

    /// Post-order copy over an explicit stack. Each frame owns a replica whose
    /// hook already ran, the source children still to visit, and the child
    /// replicas that survived so far.
    fn process_replica(&mut self, source: NodeKey) -> Option<NodeKey> {
        let mut stack = vec![self.begin_replica(source)?];
        let mut result = None;

        while let Some(frame) = stack.last_mut() {
            if let Some(child) = frame.pending.pop() {
                if let Some(child_frame) = self.begin_replica(child) {
                    stack.push(child_frame);
                }
                continue;
            }

            let Some(frame) = stack.pop() else { break };
            let finished = self.finish_replica(frame);
            match stack.last_mut() {
                Some(parent) => parent.replicas.extend(finished),
                None => result = finished,
            }
        }
        result
    }

    /// Copies one node and runs its replication hook.
    fn begin_replica(&self, source: NodeKey) -> Option<ReplicaFrame> {
        let (mut replica, mut pending) = {
            let node = self.node(source)?;
            (node.new_replica(), node.children.clone())
        };

        let callbacks = Arc::clone(&replica.callbacks);
        if !callbacks.replicate(&mut replica) {
            log::trace!("replication of {source:?} refused by client");
            return None;
        }

        pending.reverse();
        Some(ReplicaFrame {
            source,
            replica,
            pending,
            replicas: SmallVec::new(),
        })
    }

    /// Inserts a finished replica and links its surviving children, or prunes it.
    fn finish_replica(&mut self, frame: ReplicaFrame) -> Option<NodeKey> {
        if frame.replicas.is_empty() && frame.replica.client_object.is_none() {
            log::trace!("pruned empty replica of {:?}", frame.source);
            return None;
        }

        let key = self.insert(frame.replica);
        for child in frame.replicas {
            self.link_child(key, child);
        }
        Some(key)
    }

    /// Removes `key` and its subtree from the graph.
    ///
    /// Children are handed to their destruction hook before their parent; a
    /// node's relation and controllers are released with it. Destructed nodes
    /// are unlinked from the schedule queue.
    pub fn destruct(&mut self, key: NodeKey) -> Result<()> {
        self.slot(key)?;
        self.unlink_from_parent(key);

        // Pre-order collection, consumed in reverse = children before parents.
        let mut order = Vec::new();
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.node(current) {
                order.push(current);
                stack.extend(node.children.iter().copied());
            }
        }

        log::debug!("destructing {key:?} ({} nodes)", order.len());
        for current in order.into_iter().rev() {
            self.queue.forget(current);
            if let Some(slot) = self.nodes.remove(current) {
                let mut node = slot.into_inner();
                node.parent = None;
                node.children.clear();
                node.controllers.clear();
                let callbacks = Arc::clone(&node.callbacks);
                callbacks.destroy(node);
            }
        }
        Ok(())
    }

    // ========================================================================
    // Transform edits
    // ========================================================================

    /// Runs `edit` on the node under its family lock, then marks it modified.
    fn modify(&self, key: NodeKey, edit: impl FnOnce(&mut SceneNode)) -> Result<()> {
        let slot = self.slot(key)?;
        let family = self.lockable_family(key, slot)?;
        let _family = family.lock();

        {
            let mut node = slot.write();
            edit(&mut node);
            node.spatial.set_modified();
        }
        self.activate_schedule_update_callback(slot);
        Ok(())
    }

    /// Runs `edit` on the node under its family lock without scheduling.
    fn overwrite(&self, key: NodeKey, edit: impl FnOnce(&mut SceneNode)) -> Result<()> {
        let slot = self.slot(key)?;
        let family = self.lockable_family(key, slot)?;
        let _family = family.lock();
        edit(&mut slot.write());
        Ok(())
    }

    pub fn set_local_position(&self, key: NodeKey, position: Vec3) -> Result<()> {
        self.modify(key, |node| node.spatial.set_local_position(position))
    }

    /// Moves the node by `translation`, in its own axes when `local`, in world
    /// axes otherwise.
    pub fn relative_translate(&self, key: NodeKey, translation: Vec3, local: bool) -> Result<()> {
        let slot = self.slot(key)?;
        let family = self.lockable_family(key, slot)?;
        let _family = family.lock();

        let parent_orientation = if local {
            None
        } else {
            self.parent(key)
                .and_then(|parent| self.node(parent).map(|p| p.spatial.world.orientation))
        };
        self.modify(key, |node| {
            node.spatial
                .relative_translate(translation, parent_orientation, local);
        })
    }

    /// Rotates the node by `rotation`, about its own axes when `local`, about
    /// world axes otherwise.
    pub fn relative_rotate(&self, key: NodeKey, rotation: Quat, local: bool) -> Result<()> {
        self.modify(key, |node| node.spatial.relative_rotate(rotation, local))
    }

    pub fn set_local_orientation(&self, key: NodeKey, orientation: Quat) -> Result<()> {
        self.modify(key, |node| node.spatial.set_local_orientation(orientation))
    }

    /// Multiplies the local scale component-wise.
    pub fn relative_scale(&self, key: NodeKey, scale: Vec3) -> Result<()> {
        self.modify(key, |node| node.spatial.relative_scale(scale))
    }

    pub fn set_local_scale(&self, key: NodeKey, scale: Vec3) -> Result<()> {
        self.modify(key, |node| node.spatial.set_local_scale(scale))
    }

    /// Swaps the node's parent relation.
    pub fn set_parent_relation(&self, key: NodeKey, relation: Box<dyn ParentRelation>) -> Result<()> {
        self.modify(key, |node| node.relation = relation)
    }

    /// Flags the node for recomputation and fires its schedule hook.
    pub fn set_modified(&self, key: NodeKey) -> Result<()> {
        self.modify(key, |_| {})
    }

    // World overrides: used for roots and teleports, never scheduled.

    pub fn set_world_position(&self, key: NodeKey, position: Vec3) -> Result<()> {
        self.overwrite(key, |node| node.spatial.set_world_position(position))
    }

    pub fn set_world_orientation(&self, key: NodeKey, orientation: Quat) -> Result<()> {
        self.overwrite(key, |node| node.spatial.set_world_orientation(orientation))
    }

    pub fn set_world_scale(&self, key: NodeKey, scale: Vec3) -> Result<()> {
        self.overwrite(key, |node| node.spatial.set_world_scale(scale))
    }

    pub fn set_world_from_local_transform(&self, key: NodeKey) -> Result<()> {
        self.overwrite(key, |node| node.spatial.set_world_from_local())
    }

    pub fn clear_modified(&self, key: NodeKey) -> Result<()> {
        self.overwrite(key, |node| node.spatial.clear_modified())
    }

    /// Acknowledges that a downstream cache consumed the world transform.
    pub fn clear_dirty(&self, key: NodeKey) -> Result<()> {
        self.overwrite(key, |node| node.spatial.clear_dirty())
    }

    pub fn set_client_object(&self, key: NodeKey, object: Option<ClientObject>) -> Result<()> {
        self.overwrite(key, |node| node.client_object = object)
    }

    pub fn set_client_info(&self, key: NodeKey, info: Option<ClientObject>) -> Result<()> {
        self.overwrite(key, |node| node.client_info = info)
    }

    // ========================================================================
    // Controllers
    // ========================================================================

    pub fn add_controller(&self, key: NodeKey, controller: SharedController) -> Result<()> {
        self.overwrite(key, |node| node.controllers.push(controller))
    }

    /// Detaches a controller by identity. Returns whether it was attached.
    pub fn remove_controller(&self, key: NodeKey, controller: &SharedController) -> Result<bool> {
        let mut removed = false;
        self.overwrite(key, |node| {
            if let Some(index) = node
                .controllers
                .iter()
                .position(|c| Arc::ptr_eq(c, controller))
            {
                node.controllers.remove(index);
                removed = true;
            }
        })?;
        Ok(removed)
    }

    pub fn remove_all_controllers(&self, key: NodeKey) -> Result<()> {
        self.overwrite(key, |node| node.controllers.clear())
    }

    /// Forwards `time` to the node's controllers, and to its descendants'
    /// when `recurse` is set. The caller keeps other threads off this subtree.
    pub fn set_simulated_time(&self, key: NodeKey, time: f64, recurse: bool) -> Result<()> {
        self.slot(key)?;
        self.propagate_time(key, time, recurse);
        Ok(())
    }

    /// [`set_simulated_time`](Self::set_simulated_time) under the family lock.
    pub fn set_simulated_time_thread(&self, key: NodeKey, time: f64, recurse: bool) -> Result<()> {
        let slot = self.slot(key)?;
        let family = self.lockable_family(key, slot)?;
        let _family = family.lock();
        self.propagate_time(key, time, recurse);
        Ok(())
    }

    fn propagate_time(&self, key: NodeKey, time: f64, recurse: bool) {
        let mut stack: SmallVec<[NodeKey; 16]> = SmallVec::new();
        stack.push(key);
        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current) else {
                continue;
            };
            node.set_controller_time(time);
            if recurse {
                stack.extend(node.children.iter().rev().copied());
            }
        }
    }

    // ========================================================================
    // Update
    // ========================================================================

    /// Updates the world transform of `key` and walks its whole subtree.
    ///
    /// The caller guarantees no other thread edits this subtree meanwhile; use
    /// [`update_world_data_thread`](Self::update_world_data_thread) when that
    /// is not the case.
    pub fn update_world_data(&self, key: NodeKey, time: f64, parent_updated: bool) -> Result<()> {
        self.slot(key)?;
        self.update_subtree(key, time, parent_updated);
        Ok(())
    }

    /// Same as [`update_world_data`](Self::update_world_data), holding the
    /// family lock for the entire walk.
    pub fn update_world_data_thread(
        &self,
        key: NodeKey,
        time: f64,
        parent_updated: bool,
    ) -> Result<()> {
        let slot = self.slot(key)?;
        let family = self.lockable_family(key, slot)?;
        let _family = family.lock();
        self.update_subtree(key, time, parent_updated);
        Ok(())
    }

    /// Pre-order walk with an explicit stack. Each node sees the flag its
    /// parent produced, never one from a sibling.
    fn update_subtree(&self, key: NodeKey, time: f64, parent_updated: bool) {
        let mut stack: Vec<(NodeKey, bool)> = Vec::with_capacity(32);
        stack.push((key, parent_updated));

        while let Some((current, mut updated)) = stack.pop() {
            let Some(slot) = self.nodes.get(current) else {
                continue;
            };

            // Unlinked first: a slow parent re-links itself while updating.
            self.queue.delink(current);

            let parent_world = slot
                .read()
                .parent
                .and_then(|parent| self.node(parent))
                .map(|parent| parent.spatial.world);

            let (source, children) = {
                let mut node = slot.write();
                let source = node.update_spatial_data(parent_world.as_ref(), time, &mut updated);
                let children: SmallVec<[NodeKey; 8]> = node.children.iter().copied().collect();
                (source, children)
            };

            if let Some(source) = source {
                let node = slot.read();
                log::trace!("updated {current:?} via {source:?}");
                self.activate_update_transform_callback(&node);
                if source == TransformSource::Relation && node.is_slow_parent() {
                    self.activate_reschedule_update_callback(&node);
                }
            }

            for &child in children.iter().rev() {
                stack.push((child, updated));
            }
        }
    }

    // ========================================================================
    // Scheduling
    // ========================================================================

    /// Links `key` into the schedule list (roots at the front).
    pub fn schedule(&self, key: NodeKey) -> Result<bool> {
        Ok(self.slot(key)?.read().schedule(&self.queue))
    }

    /// Links `key` into the reschedule list.
    pub fn reschedule(&self, key: NodeKey) -> Result<bool> {
        Ok(self.slot(key)?.read().reschedule(&self.queue))
    }

    /// Unlinks and returns the next node of the schedule list.
    #[must_use]
    pub fn get_next_scheduled(&self) -> Option<NodeKey> {
        self.queue.pop_scheduled()
    }

    /// Unlinks and returns the next node of the reschedule list.
    #[must_use]
    pub fn get_next_rescheduled(&self) -> Option<NodeKey> {
        self.queue.pop_rescheduled()
    }

    /// Moves every rescheduled node into the schedule list.
    pub fn promote_rescheduled(&self) -> usize {
        self.queue
            .promote_rescheduled(|key| self.node(key).is_none_or(|node| node.is_root()))
    }

    // ========================================================================
    // Callback activation
    // ========================================================================

    fn activate_schedule_update_callback(&self, slot: &RwLock<SceneNode>) -> bool {
        let node = slot.read();
        if self.queue.membership(node.key) == Membership::InSchedule {
            return false;
        }
        let callbacks = Arc::clone(&node.callbacks);
        callbacks.schedule_for_update(&node, &self.queue)
    }

    fn activate_reschedule_update_callback(&self, node: &SceneNode) {
        node.callbacks.reschedule_for_update(node, &self.queue);
    }

    fn activate_update_transform_callback(&self, node: &SceneNode) {
        let _notify = self
            .settings
            .serialize_transform_callbacks
            .then(|| TRANSFORM_NOTIFY_LOCK.lock());
        let _scope = NotifyScope::enter(node.family.id());
        node.callbacks.update_transform(node);
    }
}

impl std::fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneGraph")
            .field("nodes", &self.nodes.len())
            .field("scheduled", &self.queue.len())
            .field("rescheduled", &self.queue.rescheduled_len())
            .field("settings", &self.settings)
            .finish()
    }
}
