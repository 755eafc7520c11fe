//! Vertex/vector value types and the mesh transform algebra.
//!
//! A Mesh is an ordered vertex sequence plus a designated center vertex, a
//! name-keyed anchor map, and triangular faces as index triples. Vertex
//! indices are stable for the life of a mesh instance and are what anchors,
//! faces and the center refer to. Every transform has a mutating `*_in_place`
//! form and a pure copy-then-mutate form.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::RigError;

/// A point in 2D space. `z` is a draw-order index only and never enters the
/// scale/rotate math; translation and interpolation carry it through.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

/// A displacement is the same value type as a point.
pub type Vector = Vertex;

impl Vertex {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub const fn with_z(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Lerp every coordinate (z included) toward `other` by `factor`.
    #[inline]
    pub fn interpolate_in_place(&mut self, other: &Vertex, factor: f32) {
        self.x = (other.x - self.x) * factor + self.x;
        self.y = (other.y - self.y) * factor + self.y;
        self.z = (other.z - self.z) * factor + self.z;
    }

    #[inline]
    pub fn interpolate(&self, other: &Vertex, factor: f32) -> Vertex {
        let mut vertex = *self;
        vertex.interpolate_in_place(other, factor);
        vertex
    }
}

/// Texture coordinate. Owned by components, untouched by the transform
/// algebra; exposed to the renderer alongside the current mesh.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Uv {
    pub u: f32,
    pub v: f32,
}

impl Uv {
    pub const fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }
}

/// An ordered set of vertices and the operations on the set as a whole.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    /// Index of the pivot vertex: the origin for scale/rotate and the point
    /// moved by `translate_to_point`. Must be a valid index into `vertices`.
    pub center: usize,
    /// Child component name → index of that child's attachment vertex.
    #[serde(default)]
    pub anchors: HashMap<String, usize>,
    /// Triangles as index triples into `vertices`.
    #[serde(default)]
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn from_vertices(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            center: 0,
            anchors: HashMap::new(),
            faces: Vec::new(),
        }
    }

    #[inline]
    pub fn center_vertex(&self) -> &Vertex {
        &self.vertices[self.center]
    }

    /// The anchor vertex registered for a child component, if any.
    pub fn anchor_vertex(&self, component_name: &str) -> Option<&Vertex> {
        self.anchors
            .get(component_name)
            .and_then(|&idx| self.vertices.get(idx))
    }

    /// Add `vec` to every vertex, z included.
    pub fn translate_in_place(&mut self, vec: Vector) {
        for v in &mut self.vertices {
            v.x += vec.x;
            v.y += vec.y;
            v.z += vec.z;
        }
    }

    pub fn translate(&self, vec: Vector) -> Mesh {
        let mut mesh = self.clone();
        mesh.translate_in_place(vec);
        mesh
    }

    /// Translate so that the center vertex lands exactly on `dest`, keeping
    /// the shape unchanged.
    pub fn translate_to_point_in_place(&mut self, dest: Vertex) {
        let center = self.vertices[self.center];
        self.translate_in_place(Vector::with_z(
            dest.x - center.x,
            dest.y - center.y,
            dest.z - center.z,
        ));
    }

    pub fn translate_to_point(&self, dest: Vertex) -> Mesh {
        let mut mesh = self.clone();
        mesh.translate_to_point_in_place(dest);
        mesh
    }

    /// Scale x/y uniformly about the center vertex, then translate so that
    /// `origin`'s pre-scale location is restored. `origin` need not be the
    /// center; this is "scale about the center but pin an arbitrary point".
    /// z is untouched.
    pub fn scale_in_place(&mut self, factor: f32, origin: Vertex) {
        let center = self.vertices[self.center];

        let new_origin = Vertex::new(
            (origin.x - center.x) * factor + center.x,
            (origin.y - center.y) * factor + center.y,
        );

        for v in &mut self.vertices {
            v.x = (v.x - center.x) * factor + center.x;
            v.y = (v.y - center.y) * factor + center.y;
        }

        self.translate_in_place(Vector::new(
            origin.x - new_origin.x,
            origin.y - new_origin.y,
        ));
    }

    pub fn scale(&self, factor: f32, origin: Vertex) -> Mesh {
        let mut mesh = self.clone();
        mesh.scale_in_place(factor, origin);
        mesh
    }

    /// Rotate every vertex counter-clockwise about `origin`. z is untouched.
    pub fn rotate_in_place(&mut self, degrees: f32, origin: Vertex) {
        let (sin, cos) = degrees.to_radians().sin_cos();
        for v in &mut self.vertices {
            let ox = v.x - origin.x;
            let oy = v.y - origin.y;
            v.x = ox * cos - oy * sin + origin.x;
            v.y = ox * sin + oy * cos + origin.y;
        }
    }

    pub fn rotate(&self, degrees: f32, origin: Vertex) -> Mesh {
        let mut mesh = self.clone();
        mesh.rotate_in_place(degrees, origin);
        mesh
    }

    /// Lerp every vertex (z included) toward the matching vertex of `other`
    /// by `factor`: 0 leaves this mesh unchanged, 1 matches `other`.
    ///
    /// Meshes that interpolate with each other must have equal vertex counts
    /// with index-for-index correspondence; a count mismatch fails with
    /// [`RigError::ShapeMismatch`].
    pub fn interpolate_in_place(&mut self, other: &Mesh, factor: f32) -> Result<(), RigError> {
        if self.vertices.len() != other.vertices.len() {
            return Err(RigError::ShapeMismatch {
                expected: self.vertices.len(),
                actual: other.vertices.len(),
            });
        }

        for (v, o) in self.vertices.iter_mut().zip(other.vertices.iter()) {
            v.interpolate_in_place(o, factor);
        }
        Ok(())
    }

    pub fn interpolate(&self, other: &Mesh, factor: f32) -> Result<Mesh, RigError> {
        let mut mesh = self.clone();
        mesh.interpolate_in_place(other, factor)?;
        Ok(mesh)
    }
}
