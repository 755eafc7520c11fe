//! A component: one node of the rig tree.
//!
//! A component groups a base (rest-pose) mesh, the current working mesh, a
//! UV map, an ordered transformer pipeline and its children. Children are
//! exclusively owned; the tree is never shared and never cyclic. A parent
//! positions each child by translating the child's current mesh onto the
//! anchor vertex registered under the child's name.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Issue, RigError};
use crate::geometry::{Mesh, Uv};
use crate::param::ParamTable;
use crate::transformer::{Transformer, TransformerKind};

/// Parameter name → value map broadcast to the whole tree. Names a
/// component does not recognize are ignored.
pub type ParamValues = HashMap<String, f32>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Used as the anchor key by this component's parent.
    pub name: String,
    /// Rest pose; immutable after construction.
    pub base_mesh: Mesh,
    /// Working pose; rewritten on every parameter update.
    pub current_mesh: Mesh,
    /// One texture coordinate per vertex; unchanged by updates.
    #[serde(default)]
    pub uv: Vec<Uv>,
    /// Transformers applied in order, each consuming the previous output.
    #[serde(default)]
    pub pipeline: Vec<Transformer>,
    #[serde(default)]
    pub children: Vec<Component>,
}

impl Component {
    pub fn new(name: impl Into<String>, base_mesh: Mesh) -> Self {
        let current_mesh = base_mesh.clone();
        Self {
            name: name.into(),
            base_mesh,
            current_mesh,
            uv: Vec::new(),
            pipeline: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Restore the current mesh to the rest pose while preserving wherever
    /// the parent last placed this component.
    pub fn reset(&mut self) {
        let origin = *self.current_mesh.center_vertex();
        self.current_mesh = self.base_mesh.clone();
        self.current_mesh.translate_to_point_in_place(origin);
    }

    /// One update cycle: reset, run the pipeline, reposition children.
    ///
    /// A pipeline failure aborts this component's update only: the current
    /// mesh stays at the reset pose, children are still moved to match it,
    /// and the error is returned for the caller's report.
    pub fn set_parameters(
        &mut self,
        table: &ParamTable,
        values: &ParamValues,
    ) -> Result<(), RigError> {
        self.reset();
        let applied = self.apply_pipeline(table, values);
        self.move_children()?;
        applied
    }

    fn apply_pipeline(&mut self, table: &ParamTable, values: &ParamValues) -> Result<(), RigError> {
        let mut acc: Option<Mesh> = None;

        for transformer in &mut self.pipeline {
            let Some(spec) = table.get(transformer.param) else {
                // Dangling key; validate reports it, the update skips it.
                continue;
            };
            let value = values
                .get(spec.name.as_str())
                .copied()
                .unwrap_or(transformer.last_value);
            transformer.last_value = value;

            // The first transformer sees the rest-pose base mesh; the rest
            // compose on the accumulated output.
            let input = acc.as_ref().unwrap_or(&self.base_mesh);
            acc = Some(transformer.transform(spec, input, value)?);
        }

        if let Some(mesh) = acc {
            self.current_mesh = mesh;
        }
        Ok(())
    }

    /// Translate every child's current mesh onto the anchor vertex this
    /// component's current mesh keeps under the child's name. Repositioning
    /// only; each child's shape is its own pipeline's business.
    pub fn move_children(&mut self) -> Result<(), RigError> {
        let Component {
            current_mesh,
            children,
            ..
        } = self;

        for child in children.iter_mut() {
            let anchor = current_mesh
                .anchor_vertex(&child.name)
                .ok_or_else(|| RigError::UnknownAnchor {
                    child: child.name.clone(),
                })?;
            child.current_mesh.translate_to_point_in_place(*anchor);
        }
        Ok(())
    }

    /// Structural validation of this subtree. Collects every finding with
    /// the slash-separated path of the component it belongs to.
    pub fn validate(&self, table: &ParamTable) -> Vec<Issue> {
        let mut issues = Vec::new();
        self.validate_into(table, &self.name, &mut issues);
        issues
    }

    fn validate_into(&self, table: &ParamTable, path: &str, issues: &mut Vec<Issue>) {
        check_mesh_indices(&self.base_mesh, path, issues);

        if !self.uv.is_empty() && self.uv.len() != self.base_mesh.vertices.len() {
            issues.push(Issue::new(
                path,
                RigError::ShapeMismatch {
                    expected: self.base_mesh.vertices.len(),
                    actual: self.uv.len(),
                },
            ));
        }

        for child in &self.children {
            if !self.base_mesh.anchors.contains_key(&child.name) {
                issues.push(Issue::new(
                    path,
                    RigError::UnknownAnchor {
                        child: child.name.clone(),
                    },
                ));
            }
        }

        for transformer in &self.pipeline {
            let Some(spec) = table.get(transformer.param) else {
                issues.push(Issue::new(
                    path,
                    RigError::ParameterConflict(format!(
                        "transformer key {:?} is not in the parameter table",
                        transformer.param
                    )),
                ));
                continue;
            };

            for error in transformer.validate(spec) {
                issues.push(Issue::new(path, error));
            }

            // Keyframe meshes stand in for the base mesh wholesale, so they
            // must match its vertex count and keep the child anchors.
            if let TransformerKind::Substitution { keys } = &transformer.kind {
                let expected = self.base_mesh.vertices.len();
                for key in keys.keys() {
                    check_mesh_indices(&key.mesh, path, issues);
                    if key.mesh.vertices.len() != expected {
                        issues.push(Issue::new(
                            path,
                            RigError::ShapeMismatch {
                                expected,
                                actual: key.mesh.vertices.len(),
                            },
                        ));
                    }
                    for child in &self.children {
                        if !key.mesh.anchors.contains_key(&child.name) {
                            issues.push(Issue::new(
                                path,
                                RigError::UnknownAnchor {
                                    child: child.name.clone(),
                                },
                            ));
                        }
                    }
                }
            }
        }

        for child in &self.children {
            let child_path = format!("{path}/{}", child.name);
            child.validate_into(table, &child_path, issues);
        }
    }
}

fn check_mesh_indices(mesh: &Mesh, path: &str, issues: &mut Vec<Issue>) {
    let len = mesh.vertices.len();

    if mesh.center >= len {
        issues.push(Issue::new(
            path,
            RigError::InvalidIndex {
                index: mesh.center,
                len,
            },
        ));
    }
    for &idx in mesh.anchors.values() {
        if idx >= len {
            issues.push(Issue::new(path, RigError::InvalidIndex { index: idx, len }));
        }
    }
    for face in &mesh.faces {
        for &idx in face {
            if idx as usize >= len {
                issues.push(Issue::new(
                    path,
                    RigError::InvalidIndex {
                        index: idx as usize,
                        len,
                    },
                ));
            }
        }
    }
}
