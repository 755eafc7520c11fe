//! Shared fixture loader for marionette integration tests and benches.
//!
//! Fixtures live under the workspace-level `fixtures/` directory and are
//! indexed by `fixtures/manifest.json`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    rigs: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

pub mod rigs {
    use super::*;

    /// Load a stored-rig JSON fixture by manifest name.
    pub fn json(name: &str) -> Result<String> {
        let rel = MANIFEST
            .rigs
            .get(name)
            .ok_or_else(|| anyhow!("unknown rig fixture '{name}'"))?;
        let path = fixtures_root().join(rel);
        fs::read_to_string(&path)
            .with_context(|| format!("failed to read fixture at {}", path.display()))
    }

    /// Names of every rig fixture in the manifest.
    pub fn names() -> Vec<&'static str> {
        MANIFEST.rigs.keys().map(String::as_str).collect()
    }
}
