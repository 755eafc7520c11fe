//! Stored-rig JSON loader.
//!
//! Parses a rig document into a [`Model`]: parameter metadata first, then
//! the component tree with pipelines resolved against the metadata table by
//! name, then a full structural validation before the model is handed out.
//! The loader takes a string; reading files stays with the caller.
//!
//! Document shape:
//!
//! ```json
//! {
//!   "name": "face",
//!   "params": [
//!     { "name": "mouth-open", "type": "continuous", "min": 0, "max": 1, "default": 0 }
//!   ],
//!   "root": {
//!     "name": "face",
//!     "mesh": {
//!       "vertices": [[0.0, 0.0, 0.0]],
//!       "center": 0,
//!       "anchors": { "mouth": 0 },
//!       "faces": []
//!     },
//!     "uv": [[0.5, 0.5]],
//!     "pipeline": [
//!       { "type": "rotation", "param": "head-tilt", "offset": 0.0 },
//!       { "type": "substitution", "param": "mouth-open",
//!         "keys": [ { "value": 0.0, "mesh": { "vertices": [[0.0, 0.0, 0.0]], "center": 0 } } ] }
//!     ],
//!     "children": []
//!   }
//! }
//! ```

use hashbrown::HashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::component::Component;
use crate::geometry::{Mesh, Uv, Vertex};
use crate::model::Model;
use crate::param::{KeyTable, ParamKind, ParamSpec, ParamTable};
use crate::transformer::{Transformer, TransformerKind};

/// Errors produced while loading a stored-rig document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("rig json parse error: {0}")]
    Parse(String),
    #[error("component '{component}' references unknown parameter '{param}'")]
    UnknownParam { component: String, param: String },
    #[error("rig document failed validation: {0}")]
    Invalid(String),
}

/// Parse a stored-rig JSON document into a validated [`Model`].
pub fn parse_stored_rig_json(s: &str) -> Result<Model, LoadError> {
    let doc: StoredRig = serde_json::from_str(s).map_err(|e| LoadError::Parse(e.to_string()))?;

    let mut params = ParamTable::new();
    for raw in &doc.params {
        params.insert(ParamSpec {
            name: raw.name.clone(),
            kind: match raw.kind {
                RawKind::Discrete => ParamKind::Discrete,
                RawKind::Continuous => ParamKind::Continuous,
            },
            min: raw.min,
            max: raw.max,
            default: raw.default,
        });
    }

    let root = build_component(&doc.root, &params)?;
    let model = Model::new(doc.name, root, params);

    let report = model.validate();
    if !report.is_ok() {
        let summary = report
            .issues
            .iter()
            .map(|i| format!("{}: {}", i.component, i.error))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(LoadError::Invalid(summary));
    }

    Ok(model)
}

fn build_component(raw: &RawComponent, params: &ParamTable) -> Result<Component, LoadError> {
    let mut component = Component::new(raw.name.clone(), build_mesh(&raw.mesh));
    component.uv = raw.uv.iter().map(|p| Uv::new(p[0], p[1])).collect();

    for raw_t in &raw.pipeline {
        let param_name = match raw_t {
            RawTransformer::Rotation { param, .. } => param,
            RawTransformer::Substitution { param, .. } => param,
        };
        let (id, spec) = params
            .find(param_name)
            .ok_or_else(|| LoadError::UnknownParam {
                component: raw.name.clone(),
                param: param_name.clone(),
            })?;

        let kind = match raw_t {
            RawTransformer::Rotation { offset, .. } => TransformerKind::Rotation { offset: *offset },
            RawTransformer::Substitution { keys, .. } => {
                let mut table = KeyTable::new();
                for key in keys {
                    table.insert(key.value, build_mesh(&key.mesh));
                }
                TransformerKind::Substitution { keys: table }
            }
        };
        component
            .pipeline
            .push(Transformer::new(id, spec.default, kind));
    }

    for raw_child in &raw.children {
        component.children.push(build_component(raw_child, params)?);
    }

    Ok(component)
}

fn build_mesh(raw: &RawMesh) -> Mesh {
    Mesh {
        vertices: raw
            .vertices
            .iter()
            .map(|v| Vertex::with_z(v[0], v[1], v[2]))
            .collect(),
        center: raw.center,
        anchors: raw.anchors.clone(),
        faces: raw.faces.clone(),
    }
}

// ----- JSON schema (serde) -----

#[derive(Debug, Deserialize)]
struct StoredRig {
    name: String,
    #[serde(default)]
    params: Vec<RawParam>,
    root: RawComponent,
}

#[derive(Debug, Deserialize)]
struct RawParam {
    name: String,
    #[serde(rename = "type")]
    kind: RawKind,
    min: f32,
    max: f32,
    default: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawKind {
    Discrete,
    Continuous,
}

#[derive(Debug, Deserialize)]
struct RawComponent {
    name: String,
    mesh: RawMesh,
    #[serde(default)]
    uv: Vec<[f32; 2]>,
    #[serde(default)]
    pipeline: Vec<RawTransformer>,
    #[serde(default)]
    children: Vec<RawComponent>,
}

#[derive(Debug, Deserialize)]
struct RawMesh {
    vertices: Vec<[f32; 3]>,
    center: usize,
    #[serde(default)]
    anchors: HashMap<String, usize>,
    #[serde(default)]
    faces: Vec<[u32; 3]>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawTransformer {
    Rotation {
        param: String,
        offset: f32,
    },
    Substitution {
        param: String,
        keys: Vec<RawKeyframe>,
    },
}

#[derive(Debug, Deserialize)]
struct RawKeyframe {
    value: f32,
    mesh: RawMesh,
}
