use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::regulation::RegulationSet;

/// What happens when starting or manually logging an activity whose day is
/// already at its limit. Observed deployments differ, so this is explicit
/// configuration rather than baked-in behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnforcementPolicy {
    /// Refuse the start/entry outright.
    Blocking,
    /// Allow it and surface the limit check to the caller.
    Advisory,
}

impl Default for EnforcementPolicy {
    fn default() -> Self {
        EnforcementPolicy::Advisory
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerConfig {
    pub regulation: RegulationSet,
    pub enforcement: EnforcementPolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            regulation: RegulationSet::eu_2024(),
            enforcement: EnforcementPolicy::Advisory,
        }
    }
}

impl TrackerConfig {
    /// Reads the config file, falling back to defaults when it is missing
    /// or unparseable. Only an unreadable file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read tracker config from {}", path.display()))?;
        match serde_json::from_str(&contents) {
            Ok(config) => Ok(config),
            Err(err) => {
                warn!("invalid tracker config at {}: {err}", path.display());
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write tracker config to {}", path.display()))
    }
}
