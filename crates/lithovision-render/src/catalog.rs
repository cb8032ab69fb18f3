use crate::error::RenderError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Surface finish of a stone slab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Finish {
    /// Glossy, reflective surface.
    Polished,
    /// Matte, smooth surface.
    Honed,
    /// Textured, leather-like surface.
    Leathered,
    /// Lightly textured, satin surface.
    Brushed,
}

/// A material record in the slab catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slab {
    /// Stock keeping unit, unique within the catalog.
    pub sku: String,
    /// Display name.
    pub name: String,
    /// Surface finish.
    pub finish: Finish,
    /// Reference resolved by a texture source into encoded image bytes.
    pub texture_ref: String,
    /// Origin quarry.
    pub quarry: String,
    /// Optional dominant color tag.
    #[serde(default)]
    pub color: Option<String>,
    /// Optional stone type tag, e.g. granite or quartzite.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Read-only list of available slab materials.
#[derive(Debug, Clone, Default)]
pub struct SlabCatalog {
    slabs: Vec<Slab>,
}

impl SlabCatalog {
    /// Parse a catalog from a JSON array of slab records.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        let slabs: Vec<Slab> =
            serde_json::from_str(json).map_err(|e| RenderError::Config(e.to_string()))?;
        Ok(Self { slabs })
    }

    /// Load a catalog from a JSON file.
    pub fn from_json_file(file_path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let contents = std::fs::read_to_string(file_path.as_ref())
            .map_err(|e| RenderError::Config(e.to_string()))?;
        Self::from_json(&contents)
    }

    /// Look up a slab by its sku.
    pub fn get(&self, sku: &str) -> Option<&Slab> {
        self.slabs.iter().find(|slab| slab.sku == sku)
    }

    /// Iterate over all slabs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Slab> {
        self.slabs.iter()
    }

    /// Number of slabs in the catalog.
    pub fn len(&self) -> usize {
        self.slabs.len()
    }

    /// Whether the catalog has no slabs.
    pub fn is_empty(&self) -> bool {
        self.slabs.is_empty()
    }
}
