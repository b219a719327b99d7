//! Error Types
//!
//! This module defines the error types used throughout the engine core.
//!
//! # Overview
//!
//! The main error type [`LumenError`] wraps the per-subsystem errors:
//! - [`SceneError`]: misuse of the scene graph API (unknown handles, cycles)
//! - [`ProjectorError`]: configuration problems detected before a projection
//!   pass (zero-size viewport, degenerate or invalid camera)
//!
//! Data problems inside geometry (face indices out of range, bad face arity)
//! are *not* errors: the projector skips the offending primitive and counts it
//! in [`ProjectionStats`](crate::projector::ProjectionStats).
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, LumenError>`.
//!
//! ```rust,ignore
//! use lumen::errors::Result;
//!
//! fn render_one_frame() -> Result<()> {
//!     let data = projector.project_active(&scene, &assets)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::scene::NodeHandle;

/// The main error type for the engine core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LumenError {
    /// Scene graph API misuse.
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Projection setup failure.
    #[error("Projector error: {0}")]
    Projector(#[from] ProjectorError),
}

/// Errors raised by hierarchy operations on a [`Scene`](crate::scene::Scene).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The handle does not refer to a live node.
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeHandle),

    /// A node cannot become its own parent.
    #[error("Cannot attach node {0:?} to itself")]
    AttachToSelf(NodeHandle),

    /// Attaching would make `parent` a descendant of `child`.
    #[error("Attaching {child:?} under {parent:?} would create a cycle")]
    CyclicAttach {
        /// The node being moved
        child: NodeHandle,
        /// The requested new parent (a descendant of `child`)
        parent: NodeHandle,
    },

    /// The node exists but carries no camera payload.
    #[error("Node {0:?} is not a camera")]
    NotACamera(NodeHandle),
}

/// Configuration errors reported by the [`Projector`](crate::projector::Projector).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectorError {
    /// The viewport has no area.
    #[error("Viewport has zero size: {width}x{height}")]
    ZeroViewport {
        /// Viewport width in pixels
        width: u32,
        /// Viewport height in pixels
        height: u32,
    },

    /// Camera projection parameters are unusable.
    #[error("Invalid camera: {0}")]
    InvalidCamera(String),

    /// The camera world matrix cannot be inverted into a view matrix.
    #[error("Camera world matrix is singular (determinant {determinant})")]
    DegenerateCamera {
        /// Determinant of the camera's world matrix
        determinant: f32,
    },

    /// The scene has no active camera to project with.
    #[error("Scene has no active camera")]
    NoActiveCamera,
}

/// Alias for `Result<T, LumenError>`.
pub type Result<T> = std::result::Result<T, LumenError>;
