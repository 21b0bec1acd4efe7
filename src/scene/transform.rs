use glam::{Affine3A, Quat, Vec3};

/// Position, orientation and scale (TRS) of a node in some coordinate space.
///
/// A node holds two of these: one relative to its parent (local) and one in
/// root space (world).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[inline]
    #[must_use]
    pub fn new(position: Vec3, orientation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            orientation,
            scale,
        }
    }

    #[inline]
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Composes `self` (a parent's world transform) with a child's local
    /// transform, returning the child's world transform.
    ///
    /// Scale and orientation multiply; the local position is scaled, then
    /// rotated, then offset by the parent's position.
    #[must_use]
    pub fn compose(&self, local: &Self) -> Self {
        Self {
            position: self.position + self.orientation * (self.scale * local.position),
            orientation: self.orientation * local.orientation,
            scale: self.scale * local.scale,
        }
    }

    /// Returns the transform as an affine matrix (T * R * S).
    #[inline]
    #[must_use]
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.orientation, self.position)
    }

    /// Component-wise comparison with an absolute tolerance.
    #[must_use]
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f32) -> bool {
        self.position.abs_diff_eq(other.position, max_abs_diff)
            && self.scale.abs_diff_eq(other.scale, max_abs_diff)
            && (self.orientation.abs_diff_eq(other.orientation, max_abs_diff)
                || self.orientation.abs_diff_eq(-other.orientation, max_abs_diff))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Spatial state of one node: local and world transforms plus the two
/// independent update flags.
///
/// `modified` means the world transform must be recomputed. `dirty` means the
/// world transform changed since a downstream cache (a renderer, a physics
/// mirror) last consumed it. Parent relations and controllers write into this
/// struct during an update pass.
#[derive(Debug, Clone)]
pub struct Spatial {
    pub(crate) local: Transform,
    pub(crate) world: Transform,
    pub(crate) modified: bool,
    pub(crate) dirty: bool,
}

impl Spatial {
    /// Identity local and world transforms, flagged for a first update.
    #[must_use]
    pub fn new() -> Self {
        Self {
            local: Transform::IDENTITY,
            world: Transform::IDENTITY,
            modified: true,
            dirty: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn local(&self) -> &Transform {
        &self.local
    }

    #[inline]
    #[must_use]
    pub fn world(&self) -> &Transform {
        &self.world
    }

    /// Whether the world transform is stale.
    #[inline]
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Whether a downstream consumer still has to pick up the world transform.
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the world transform as valid and unconsumed.
    #[inline]
    pub fn clear_modified(&mut self) {
        self.modified = false;
        self.dirty = true;
    }

    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    #[inline]
    pub(crate) fn set_modified(&mut self) {
        self.modified = true;
    }

    #[inline]
    pub fn set_world(&mut self, world: Transform) {
        self.world = world;
    }

    #[inline]
    pub fn set_world_position(&mut self, position: Vec3) {
        self.world.position = position;
    }

    #[inline]
    pub fn set_world_orientation(&mut self, orientation: Quat) {
        self.world.orientation = orientation;
    }

    #[inline]
    pub fn set_world_scale(&mut self, scale: Vec3) {
        self.world.scale = scale;
    }

    /// Copies the local transform verbatim into world space (root case).
    #[inline]
    pub fn set_world_from_local(&mut self) {
        self.world = self.local;
    }

    // ========================================================================
    // Local edits (scheduling is the graph's job, see `SceneGraph`)
    // ========================================================================

    pub(crate) fn set_local_position(&mut self, position: Vec3) {
        self.local.position = position;
    }

    pub(crate) fn set_local_orientation(&mut self, orientation: Quat) {
        self.local.orientation = orientation;
    }

    pub(crate) fn set_local_scale(&mut self, scale: Vec3) {
        self.local.scale = scale;
    }

    /// Translates the local position.
    ///
    /// With `local`, `translation` is expressed in the node's own axes.
    /// Otherwise it is a world-space offset, brought into the parent's frame
    /// through the inverse of the parent's world orientation.
    pub(crate) fn relative_translate(
        &mut self,
        translation: Vec3,
        parent_orientation: Option<Quat>,
        local: bool,
    ) {
        let delta = if local {
            self.local.orientation * translation
        } else if let Some(parent_orientation) = parent_orientation {
            parent_orientation.inverse() * translation
        } else {
            translation
        };
        self.local.position += delta;
    }

    /// Applies `rotation` after the local orientation; a world-space rotation
    /// is conjugated into the node's frame first.
    pub(crate) fn relative_rotate(&mut self, rotation: Quat, local: bool) {
        let rotation = if local {
            rotation
        } else {
            let world = self.world.orientation;
            world.inverse() * rotation * world
        };
        self.local.orientation = (self.local.orientation * rotation).normalize();
    }

    pub(crate) fn relative_scale(&mut self, scale: Vec3) {
        self.local.scale *= scale;
    }
}

impl Default for Spatial {
    fn default() -> Self {
        Self::new()
    }
}
