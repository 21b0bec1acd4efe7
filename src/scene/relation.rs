//! Parent relations
//!
//! A parent relation decides how a child's world transform follows its
//! parent's. Three couplings are provided:
//!
//! - [`NormalParentRelation`]: full rigid inheritance of position, orientation
//!   and scale.
//! - [`VertexParentRelation`]: only the parent's world position is inherited.
//! - [`SlowParentRelation`]: the child relaxes towards the rigid target over
//!   several updates.
//!
//! Relations are owned by their node as `Box<dyn ParentRelation>` and can be
//! swapped at runtime through
//! [`SceneGraph::set_parent_relation`](crate::SceneGraph::set_parent_relation).

use std::fmt;

use crate::scene::transform::{Spatial, Transform};

/// Coupling policy between a child's local transform and its parent's world
/// transform.
pub trait ParentRelation: Send + Sync + fmt::Debug {
    /// Computes the child's world transform.
    ///
    /// `parent` is the parent's current world transform, or `None` for a root.
    /// `parent_updated` tells whether an ancestor was recomputed during this
    /// pass; a relation that recomputes the child sets it so descendants
    /// follow. Returns `true` when the world transform was (re)computed.
    fn update_child_coordinates(
        &mut self,
        child: &mut Spatial,
        parent: Option<&Transform>,
        parent_updated: &mut bool,
    ) -> bool;

    /// Returns a fresh heap instance with the same parameters.
    fn new_copy(&self) -> Box<dyn ParentRelation>;

    fn is_vertex_relation(&self) -> bool {
        false
    }

    fn is_slow_relation(&self) -> bool {
        false
    }
}

// ============================================================================
// Normal
// ============================================================================

/// Rigid parenting: world = parent world ∘ local.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalParentRelation;

impl NormalParentRelation {
    #[must_use]
    pub fn boxed() -> Box<dyn ParentRelation> {
        Box::new(Self)
    }
}

impl ParentRelation for NormalParentRelation {
    fn update_child_coordinates(
        &mut self,
        child: &mut Spatial,
        parent: Option<&Transform>,
        parent_updated: &mut bool,
    ) -> bool {
        if !*parent_updated && !child.is_modified() {
            return false;
        }
        *parent_updated = true;

        match parent {
            Some(parent) => child.set_world(parent.compose(child.local())),
            None => child.set_world_from_local(),
        }
        child.clear_modified();
        true
    }

    fn new_copy(&self) -> Box<dyn ParentRelation> {
        Box::new(*self)
    }
}

// ============================================================================
// Vertex
// ============================================================================

/// Position-only parenting: the child is offset by the parent's world
/// position, orientation and scale stay the child's own.
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexParentRelation;

impl VertexParentRelation {
    #[must_use]
    pub fn boxed() -> Box<dyn ParentRelation> {
        Box::new(Self)
    }
}

impl ParentRelation for VertexParentRelation {
    fn update_child_coordinates(
        &mut self,
        child: &mut Spatial,
        parent: Option<&Transform>,
        parent_updated: &mut bool,
    ) -> bool {
        if !*parent_updated && !child.is_modified() {
            return false;
        }
        *parent_updated = true;

        let local = *child.local();
        let position = match parent {
            Some(parent) => local.position + parent.position,
            None => local.position,
        };
        child.set_world(Transform::new(position, local.orientation, local.scale));
        child.clear_modified();
        true
    }

    fn new_copy(&self) -> Box<dyn ParentRelation> {
        Box::new(*self)
    }

    fn is_vertex_relation(&self) -> bool {
        true
    }
}

// ============================================================================
// Slow
// ============================================================================

/// Damped parenting.
///
/// Each update blends the child's previous world transform with the rigid
/// target: `new = (r * previous + target) / (r + 1)` for position and scale,
/// and a slerp by `r / (r + 1)` towards the previous orientation, where `r` is
/// the relaxation coefficient. `r = 0` behaves like [`NormalParentRelation`].
///
/// The very first update of a node has no meaningful previous transform and
/// snaps straight to the target. The relation is therefore stateful: calling
/// it twice with identical inputs moves the child twice.
#[derive(Debug, Clone, Copy)]
pub struct SlowParentRelation {
    relaxation: f32,
    initialized: bool,
}

impl SlowParentRelation {
    #[must_use]
    pub fn new(relaxation: f32) -> Self {
        debug_assert!(relaxation >= 0.0, "relaxation must not be negative");
        Self {
            relaxation,
            initialized: false,
        }
    }

    #[must_use]
    pub fn boxed(relaxation: f32) -> Box<dyn ParentRelation> {
        Box::new(Self::new(relaxation))
    }

    #[inline]
    #[must_use]
    pub fn relaxation(&self) -> f32 {
        self.relaxation
    }

    #[inline]
    pub fn set_relaxation(&mut self, relaxation: f32) {
        self.relaxation = relaxation;
    }

    /// Whether the first (snapping) update already happened.
    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl ParentRelation for SlowParentRelation {
    fn update_child_coordinates(
        &mut self,
        child: &mut Spatial,
        parent: Option<&Transform>,
        parent_updated: &mut bool,
    ) -> bool {
        let world = match parent {
            Some(parent) => {
                let target = parent.compose(child.local());
                if self.initialized {
                    let current = *child.world();
                    let r = self.relaxation;
                    let weight = 1.0 / (r + 1.0);
                    Transform {
                        position: (current.position * r + target.position) * weight,
                        orientation: target.orientation.slerp(current.orientation, r * weight),
                        scale: (current.scale * r + target.scale) * weight,
                    }
                } else {
                    target
                }
            }
            None => *child.local(),
        };
        self.initialized = true;
        *parent_updated = true;

        child.set_world(world);
        child.clear_modified();
        true
    }

    /// Copies the relaxation; the copy starts uninitialized so its first
    /// update snaps onto the target.
    fn new_copy(&self) -> Box<dyn ParentRelation> {
        Box::new(Self::new(self.relaxation))
    }

    fn is_slow_relation(&self) -> bool {
        true
    }
}
