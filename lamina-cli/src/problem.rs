//! JSON problem descriptions.
//!
//! ```json
//! {
//!   "material": {"youngs_modulus": 200000.0, "poissons_ratio": 0.3, "thickness": 1.0},
//!   "nodes": [
//!     {"coords": [0.0, 0.0], "displacements": [{"direction": 0, "value": 0.0}]},
//!     {"coords": [1.0, 0.0]},
//!     {"coords": [1.0, 1.0], "forces": [{"direction": 1, "value": -1000.0}]},
//!     {"coords": [0.0, 1.0]}
//!   ]
//! }
//! ```

use crate::error::{CliError, Result};
use lamina_core::{Material, Node, Quad4PlaneStress};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_thickness() -> f64 {
    1.0
}

/// Material block of a problem file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    pub youngs_modulus: f64,
    pub poissons_ratio: f64,
    #[serde(default = "default_thickness")]
    pub thickness: f64,
}

/// A single-element plane-stress problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub material: MaterialSpec,
    pub nodes: Vec<Node<f64>>,
}

impl Problem {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Read a problem file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| CliError::Problem {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validated material constants.
    pub fn material(&self) -> Result<Material<f64>> {
        Ok(Material::new(
            self.material.youngs_modulus,
            self.material.poissons_ratio,
        )?)
    }

    /// Element formulation for the given thickness.
    pub fn element(&self) -> Result<Quad4PlaneStress<f64>> {
        Ok(Quad4PlaneStress::new(self.material.thickness)?)
    }
}
