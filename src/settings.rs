//! Scene graph configuration.

/// Configuration for a [`SceneGraph`](crate::SceneGraph).
///
/// Construct with struct update syntax:
///
/// ```rust,ignore
/// use spatial_graph::SceneGraphSettings;
///
/// // Four workers, callbacks known to be reentrant
/// let settings = SceneGraphSettings {
///     worker_threads: 4,
///     serialize_transform_callbacks: false,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneGraphSettings {
    /// Number of workers used by
    /// [`update_scheduled_parallel`](crate::transform_system::update_scheduled_parallel).
    ///
    /// Defaults to the available hardware parallelism. Values below 1 are
    /// treated as 1.
    pub worker_threads: usize,

    /// Wrap every update-transform callback in one process-wide lock.
    ///
    /// When `true` (the default), no two threads ever run client
    /// notification code at the same time, which is what a non-reentrant
    /// consumer (a renderer cache, a physics bridge) needs. Set to `false`
    /// only when every installed [`NodeCallbacks`](crate::NodeCallbacks)
    /// implementation is thread-safe on its own.
    pub serialize_transform_callbacks: bool,

    /// Initial capacity of the node arena.
    pub node_capacity: usize,
}

impl Default for SceneGraphSettings {
    fn default() -> Self {
        Self {
            worker_threads: std::thread::available_parallelism().map_or(1, usize::from),
            serialize_transform_callbacks: true,
            node_capacity: 64,
        }
    }
}

impl SceneGraphSettings {
    /// Returns the worker count actually used by the parallel driver.
    #[inline]
    #[must_use]
    pub fn effective_workers(&self) -> usize {
        self.worker_threads.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serialize_callbacks() {
        let settings = SceneGraphSettings::default();
        assert!(settings.serialize_transform_callbacks);
        assert!(settings.effective_workers() >= 1);
    }

    #[test]
    fn zero_workers_clamps_to_one() {
        let settings = SceneGraphSettings {
            worker_threads: 0,
            ..Default::default()
        };
        assert_eq!(settings.effective_workers(), 1);
    }
}
