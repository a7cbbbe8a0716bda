// Data-driven elevator configuration.
//
// `ElevatorConfig` is loaded from JSON once at startup and never mutated.
// Every field has a default, so `{}` is a valid config. Material names are
// resolved against `Material` case-insensitively by `marker_pattern()`.
//
// An unresolvable material name is not fatal. `ElevatorSystem::new` reports
// it at `error` level and runs with a disabled validator, which recognizes
// no floors at all.
//
// See also: `pattern.rs` for `MarkerPattern`, `indicator.rs` which reads
// `display_ticks()`, `elevator.rs` which owns the config.

use crate::error::{ConfigError, MaterialRole};
use crate::pattern::MarkerPattern;
use crate::types::Material;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Host simulation ticks per real-time second.
pub const TICKS_PER_SECOND: u64 = 20;

/// Top-level elevator configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevatorConfig {
    /// Material of the block an agent stands on to use a floor.
    pub center_material: String,

    /// Material that must surround the center on all four horizontal sides.
    pub rim_material: String,

    /// Show "Floor N of M" after each move.
    pub display_floor_on_teleport: bool,

    /// How long the floor indicator stays up after the agent steps off the
    /// elevator, in seconds. Re-checked at this interval while the agent
    /// stays on it.
    pub display_duration_secs: u32,
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        Self {
            center_material: Material::IronBlock.name().to_string(),
            rim_material: Material::SmoothStone.name().to_string(),
            display_floor_on_teleport: true,
            display_duration_secs: 3,
        }
    }
}

impl ElevatorConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Resolve the two configured material names.
    pub fn marker_pattern(&self) -> Result<MarkerPattern, ConfigError> {
        Ok(MarkerPattern {
            center: resolve(&self.center_material, MaterialRole::Center)?,
            rim: resolve(&self.rim_material, MaterialRole::Rim)?,
        })
    }

    /// Check everything that can be wrong with a parsed config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.marker_pattern()?;
        if self.display_duration_secs == 0 {
            return Err(ConfigError::InvalidDisplayDuration);
        }
        Ok(())
    }

    /// Indicator re-check interval in ticks. Never zero, so a hide check can
    /// never re-arm for the tick it is running in.
    pub fn display_ticks(&self) -> u64 {
        u64::from(self.display_duration_secs.max(1)) * TICKS_PER_SECOND
    }
}

fn resolve(name: &str, role: MaterialRole) -> Result<Material, ConfigError> {
    name.parse().map_err(|_| ConfigError::UnknownMaterial {
        role,
        name: name.to_string(),
    })
}
