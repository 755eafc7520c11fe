//! Marionette rig core (renderer-agnostic)
//!
//! A parametric 2D puppet rig: a tree of mesh components deforms in response
//! to named scalar parameters. Each component owns a rest-pose mesh, a
//! working mesh and an ordered transformer pipeline; parents keep named
//! anchor vertices marking where children attach, and a level-order
//! traversal propagates positions parent-to-child so the tree stays
//! spatially coherent. Loading, texture decoding and GPU submission live in
//! collaborator crates behind the contracts in [`stored_rig`] and [`render`].

pub mod component;
pub mod error;
pub mod geometry;
pub mod model;
pub mod param;
pub mod render;
pub mod stored_rig;
pub mod transformer;

// Re-exports for consumers (adapters)
pub use component::{Component, ParamValues};
pub use error::{Issue, RigError};
pub use geometry::{Mesh, Uv, Vector, Vertex};
pub use model::{Model, UpdateReport, ValidationReport};
pub use param::{KeyTable, Keyframe, ParamId, ParamKind, ParamSpec, ParamTable, KEY_EPS};
pub use render::{DrawData, RenderTarget};
pub use stored_rig::{parse_stored_rig_json, LoadError};
pub use transformer::{Transformer, TransformerKind};
