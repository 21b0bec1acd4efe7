//! Error Types
//!
//! This module defines the error types used throughout the scene graph.
//!
//! # Overview
//!
//! Most structural failure modes of a pointer-based scene graph are contract
//! violations rather than runtime conditions. The arena-based graph adds one
//! that *is* observable at runtime: a [`NodeKey`] can outlive the node it named.
//! [`SceneGraphError`] covers that, cyclic attachments, and worker failures of
//! the parallel update driver.
//!
//! # Usage
//!
//! Mutating APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, SceneGraphError>`. Read-only getters return
//! `Option` instead.
//!
//! ```rust,ignore
//! use spatial_graph::errors::Result;
//!
//! fn attach(graph: &mut SceneGraph, parent: NodeKey, child: NodeKey) -> Result<()> {
//!     graph.add_child(parent, child)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::scene::NodeKey;

/// The main error type for the scene graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneGraphError {
    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// The key does not name a live node (it was destructed or never inserted).
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeKey),

    /// Attaching `child` under `parent` would make a node its own ancestor.
    #[error("Cannot attach {child:?} under {parent:?}: the hierarchy would contain a cycle")]
    CyclicHierarchy {
        /// The node being attached
        child: NodeKey,
        /// The requested new parent
        parent: NodeKey,
    },

    // ========================================================================
    // Threading Errors
    // ========================================================================
    /// A worker of the parallel update driver panicked.
    #[error("Worker thread panicked during a parallel transform update")]
    WorkerPanicked,

    /// An update-transform callback tried to lock a family other than the
    /// one being walked.
    #[error("Cannot touch {0:?} from an update-transform callback of another family")]
    ForeignFamilyEdit(NodeKey),
}

/// Alias for `Result<T, SceneGraphError>`.
pub type Result<T> = std::result::Result<T, SceneGraphError>;
