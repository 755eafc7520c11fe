//! Transformers: the units a component's pipeline is made of.
//!
//! A transformer is a pure function of (input mesh, scalar) → mesh,
//! dispatched over a tagged variant. The shared part is the parameter key it
//! listens to and the last value it was driven with, which doubles as the
//! fallback when a traversal's value map does not mention its parameter.

use serde::{Deserialize, Serialize};

use crate::error::RigError;
use crate::geometry::Mesh;
use crate::param::{KeyTable, ParamId, ParamSpec};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transformer {
    /// Key of the parameter that drives this transformer.
    pub param: ParamId,
    /// Last value applied; used when the caller's value map has no entry for
    /// the parameter. Seeded with the parameter's default at load.
    pub last_value: f32,
    pub kind: TransformerKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TransformerKind {
    /// Rotate the input mesh about its own current center. The offset is the
    /// number of clockwise degrees from global "up" that counts as "up" for
    /// the component, so a parameter value of zero points the offset
    /// direction up.
    Rotation { offset: f32 },
    /// Substitute the mesh resolved from a keyframe table. The input mesh is
    /// informational only; the result comes entirely from the table.
    Substitution { keys: KeyTable },
}

impl Transformer {
    pub fn new(param: ParamId, default_value: f32, kind: TransformerKind) -> Self {
        Self {
            param,
            last_value: default_value,
            kind,
        }
    }

    /// Produce the transformed mesh for `value`. Stateless given its inputs;
    /// the caller owns updating [`Transformer::last_value`].
    pub fn transform(&self, spec: &ParamSpec, mesh: &Mesh, value: f32) -> Result<Mesh, RigError> {
        match &self.kind {
            TransformerKind::Rotation { offset } => {
                let mod_param = value % 360.0;
                let mod_angle = (mod_param + offset) % 360.0;
                let angle = (360.0 - mod_angle) % 360.0;
                Ok(mesh.rotate(angle, *mesh.center_vertex()))
            }
            TransformerKind::Substitution { keys } => keys.resolve(spec, value),
        }
    }

    /// Structural checks against the parameter metadata. Findings are
    /// collected, not short-circuited.
    pub fn validate(&self, spec: &ParamSpec) -> Vec<RigError> {
        let mut errors = Vec::new();

        if spec.min > spec.max {
            errors.push(RigError::BoundsInconsistency {
                min: spec.min,
                max: spec.max,
            });
        }

        if let TransformerKind::Substitution { keys } = &self.kind {
            if !keys.has_key_at(spec.min) {
                errors.push(RigError::MissingKeyframe { at: spec.min });
            }
            if !keys.has_key_at(spec.max) {
                errors.push(RigError::MissingKeyframe { at: spec.max });
            }
            if !keys.has_key_at(spec.default) {
                log::warn!(
                    "parameter '{}' has no keyframe at its default value {}",
                    spec.name,
                    spec.default
                );
            }

            // All key meshes must agree on vertex count or interpolation
            // between neighbors is impossible.
            if let Some(first) = keys.keys().first() {
                let expected = first.mesh.vertices.len();
                for key in keys.keys() {
                    if key.mesh.vertices.len() != expected {
                        errors.push(RigError::ShapeMismatch {
                            expected,
                            actual: key.mesh.vertices.len(),
                        });
                    }
                }
            }
        }

        errors
    }
}
