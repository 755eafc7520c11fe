//! Core error taxonomy.
//!
//! Structural findings (bounds, keyframes, anchors, indices) are collected by
//! the validate passes and surfaced as reports; they are never raised during
//! a parameter traversal. Shape mismatches can also occur at update time, in
//! which case they abort the affected component only and end up in the
//! update report. An unknown parameter name is deliberately not an error:
//! one global value map is broadcast to a heterogeneous tree and each
//! component takes what it recognizes.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum RigError {
    /// A parameter's bounds are inverted. Reported, never auto-corrected.
    #[error("parameter bounds inconsistent: min {min} > max {max}")]
    BoundsInconsistency { min: f32, max: f32 },

    /// A keyframe table is missing an entry at a required bound.
    #[error("no keyframe at required bound {at}")]
    MissingKeyframe { at: f32 },

    /// A child component's name has no anchor entry in the parent's mesh.
    #[error("no anchor for child component '{child}'")]
    UnknownAnchor { child: String },

    /// Two meshes with different vertex counts met in an operation that
    /// requires index-for-index correspondence.
    #[error("mesh shape mismatch: expected {expected} vertices, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A center, anchor or face index points outside the vertex sequence.
    #[error("mesh index {index} out of range for {len} vertices")]
    InvalidIndex { index: usize, len: usize },

    /// Transformers bound under one parameter name disagree about which
    /// metadata entry they reference. A load-time wiring bug.
    #[error("parameter identity conflict: {0}")]
    ParameterConflict(String),
}

/// One validation or update finding, attributed to a component by its
/// slash-separated path from the root.
#[derive(Clone, Debug, PartialEq)]
pub struct Issue {
    pub component: String,
    pub error: RigError,
}

impl Issue {
    pub fn new(component: impl Into<String>, error: RigError) -> Self {
        Self {
            component: component.into(),
            error,
        }
    }
}
