//! The model: a component tree, its parameter table, and the traversals.
//!
//! `set_parameters` is the single externally-triggered mutation entry point.
//! It walks the tree in level order, parents before children: a child's
//! reset depends on its current center having been moved by the parent's
//! move-children step in the same pass, so a parent is fully processed
//! before its children are visited.

use std::collections::VecDeque;

use crate::component::{Component, ParamValues};
use crate::error::{Issue, RigError};
use crate::param::{ParamId, ParamTable};
use crate::render::{DrawData, RenderTarget};

use hashbrown::HashMap;

/// Per-branch failures from one `set_parameters` pass. A failed component
/// keeps its reset pose; siblings and the rest of the walk are unaffected.
#[derive(Clone, Debug, Default)]
pub struct UpdateReport {
    pub failures: Vec<Issue>,
}

impl UpdateReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Structural findings from a validate pass. Reported, never auto-corrected.
#[derive(Clone, Debug, Default)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }
}

pub struct Model {
    pub name: String,
    pub root: Component,
    params: ParamTable,
}

impl Model {
    pub fn new(name: impl Into<String>, root: Component, params: ParamTable) -> Self {
        Self {
            name: name.into(),
            root,
            params,
        }
    }

    pub fn params(&self) -> &ParamTable {
        &self.params
    }

    /// Apply a value map to the whole tree, level order, parents first.
    /// Unknown names are ignored per component; failures are collected per
    /// component path and returned, and never abort the walk.
    pub fn set_parameters(&mut self, values: &ParamValues) -> UpdateReport {
        let mut report = UpdateReport::default();

        let root_path = self.root.name.clone();
        let mut queue: VecDeque<(&mut Component, String)> = VecDeque::new();
        queue.push_back((&mut self.root, root_path));

        while let Some((component, path)) = queue.pop_front() {
            if let Err(error) = component.set_parameters(&self.params, values) {
                log::warn!("component '{path}' update failed: {error}");
                report.failures.push(Issue::new(path.clone(), error));
            }
            for child in component.children.iter_mut() {
                let child_path = format!("{path}/{}", child.name);
                queue.push_back((child, child_path));
            }
        }

        report
    }

    /// Structural validation of the whole model: every per-component finding
    /// plus the parameter-group identity check, which requires every
    /// transformer bound under one parameter name to reference the same
    /// table entry.
    pub fn validate(&self) -> ValidationReport {
        let mut issues = self.root.validate(&self.params);

        let mut groups: HashMap<&str, ParamId> = HashMap::new();
        let mut queue: VecDeque<(&Component, String)> = VecDeque::new();
        queue.push_back((&self.root, self.root.name.clone()));

        while let Some((component, path)) = queue.pop_front() {
            for transformer in &component.pipeline {
                let Some(spec) = self.params.get(transformer.param) else {
                    // Dangling keys are already reported by Component::validate.
                    continue;
                };
                let id = *groups.entry(spec.name.as_str()).or_insert(transformer.param);
                if id != transformer.param {
                    issues.push(Issue::new(
                        path.clone(),
                        RigError::ParameterConflict(format!(
                            "parameter '{}' is bound to more than one metadata entry",
                            spec.name
                        )),
                    ));
                }
            }
            for child in &component.children {
                queue.push_back((child, format!("{path}/{}", child.name)));
            }
        }

        ValidationReport { issues }
    }

    /// Hand each component's draw data to the rendering collaborator, level
    /// order, so parents are submitted before the children layered on them.
    pub fn render(&self, target: &mut dyn RenderTarget) {
        let mut queue: VecDeque<&Component> = VecDeque::new();
        queue.push_back(&self.root);

        while let Some(component) = queue.pop_front() {
            target.draw(DrawData {
                component: &component.name,
                vertices: &component.current_mesh.vertices,
                faces: &component.current_mesh.faces,
                uv: &component.uv,
            });
            for child in &component.children {
                queue.push_back(child);
            }
        }
    }
}
