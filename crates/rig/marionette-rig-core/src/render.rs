//! The boundary to the rendering collaborator.
//!
//! The core never touches GPU state. Once per frame, after a parameter pass,
//! [`crate::model::Model::render`] hands each component's read-only draw
//! data to a caller-supplied target. Adapters own programs, textures and
//! submission; the context is passed in explicitly rather than held in any
//! global.

use crate::geometry::{Uv, Vertex};

/// One component's renderable state, borrowed for the duration of the call.
#[derive(Clone, Copy, Debug)]
pub struct DrawData<'a> {
    pub component: &'a str,
    pub vertices: &'a [Vertex],
    pub faces: &'a [[u32; 3]],
    pub uv: &'a [Uv],
}

/// Implemented by the rendering collaborator. Called once per component per
/// frame, parents before children.
pub trait RenderTarget {
    fn draw(&mut self, data: DrawData<'_>);
}
