//! Parameter identity, metadata and the keyframe resolver.
//!
//! Parameter metadata lives in a single model-owned [`ParamTable`];
//! everything that binds to a parameter holds a [`ParamId`] key into that
//! table, so "same parameter" is key equality. Keyframe tables are vectors
//! sorted by value, and [`KeyTable::resolve`] maps a clamped scalar to a
//! shape by exact match, discrete rounding or continuous interpolation.

use serde::{Deserialize, Serialize};

use crate::error::RigError;
use crate::geometry::Mesh;

/// Tolerance for treating two keyframe values as the same key.
pub const KEY_EPS: f32 = 1e-6;

/// Key into a model's [`ParamTable`]. Opaque externally.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ParamId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Resolution snaps to the nearest keyframe.
    Discrete,
    /// Resolution interpolates linearly between neighboring keyframes.
    Continuous,
}

/// Parameter metadata. The name links instances of one logical control
/// across components in a model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

/// The single model-owned metadata table. Insertion order is identity:
/// the returned [`ParamId`] is the index of the spec.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamTable {
    specs: Vec<ParamSpec>,
}

impl ParamTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, spec: ParamSpec) -> ParamId {
        let id = ParamId(self.specs.len() as u32);
        self.specs.push(spec);
        id
    }

    pub fn get(&self, id: ParamId) -> Option<&ParamSpec> {
        self.specs.get(id.0 as usize)
    }

    /// Look a spec up by name. First match wins; names are expected to be
    /// unique within a table.
    pub fn find(&self, name: &str) -> Option<(ParamId, &ParamSpec)> {
        self.specs
            .iter()
            .enumerate()
            .find(|(_, s)| s.name == name)
            .map(|(i, s)| (ParamId(i as u32), s))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParamId, &ParamSpec)> {
        self.specs
            .iter()
            .enumerate()
            .map(|(i, s)| (ParamId(i as u32), s))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// One keyframe: the mesh a parameter produces at an exact value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub value: f32,
    pub mesh: Mesh,
}

/// Keyframes sorted by value. The key set is fixed after load; only a
/// table's meshes participate in resolution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyTable {
    keys: Vec<Keyframe>,
}

impl KeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a keyframe, keeping the table sorted. A value within
    /// [`KEY_EPS`] of an existing key replaces that key's mesh.
    pub fn insert(&mut self, value: f32, mesh: Mesh) {
        if let Some(existing) = self
            .keys
            .iter_mut()
            .find(|k| (k.value - value).abs() <= KEY_EPS)
        {
            existing.mesh = mesh;
            return;
        }
        let idx = self.keys.partition_point(|k| k.value < value);
        self.keys.insert(idx, Keyframe { value, mesh });
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn has_key_at(&self, value: f32) -> bool {
        self.key_at(value).is_some()
    }

    fn key_at(&self, value: f32) -> Option<&Keyframe> {
        self.keys
            .iter()
            .find(|k| (k.value - value).abs() <= KEY_EPS)
    }

    /// Resolve `value` against this table under `spec`:
    ///
    /// 1. at or beyond a bound, the bound's keyframe wins;
    /// 2. an exact key match wins;
    /// 3. otherwise the two neighboring keyframes decide: nearest for
    ///    Discrete (ties to the upper key), linear interpolation for
    ///    Continuous.
    ///
    /// The result is always a fresh mesh; callers never alias table storage.
    pub fn resolve(&self, spec: &ParamSpec, value: f32) -> Result<Mesh, RigError> {
        if self.keys.is_empty() {
            return Err(RigError::MissingKeyframe { at: spec.min });
        }

        if value <= spec.min {
            let key = self.key_at(spec.min).unwrap_or(&self.keys[0]);
            return Ok(key.mesh.clone());
        }
        if value >= spec.max {
            let key = self
                .key_at(spec.max)
                .unwrap_or(&self.keys[self.keys.len() - 1]);
            return Ok(key.mesh.clone());
        }

        if let Some(key) = self.key_at(value) {
            return Ok(key.mesh.clone());
        }

        let hi_idx = self.keys.partition_point(|k| k.value < value);
        if hi_idx == 0 {
            return Ok(self.keys[0].mesh.clone());
        }
        if hi_idx == self.keys.len() {
            return Ok(self.keys[self.keys.len() - 1].mesh.clone());
        }
        let lo = &self.keys[hi_idx - 1];
        let hi = &self.keys[hi_idx];

        match spec.kind {
            ParamKind::Discrete => {
                // Round to the nearer key; the tie goes to the upper one.
                let lo_dist = value - lo.value;
                let hi_dist = hi.value - value;
                if hi_dist > lo_dist {
                    Ok(lo.mesh.clone())
                } else {
                    Ok(hi.mesh.clone())
                }
            }
            ParamKind::Continuous => {
                let factor = (value - lo.value) / (hi.value - lo.value);
                lo.mesh.interpolate(&hi.mesh, factor)
            }
        }
    }
}
