//! GPS proximity check configuration.

use serde::{Deserialize, Serialize};

/// Hard ceiling on the configurable tolerance.
const MAX_TOLERANCE_METERS: u32 = 500;

/// Settings for the check-in GPS proximity guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpsConfig {
    /// Default allowed distance between the reported coordinate and the
    /// location's stored coordinate, in meters.
    #[serde(default = "default_tolerance")]
    pub tolerance_meters: u32,
}

impl GpsConfig {
    /// The effective tolerance for a check, clamped to the permitted
    /// ceiling. A caller-supplied override takes precedence over the
    /// configured default but never the ceiling.
    pub fn effective_tolerance(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.tolerance_meters)
            .min(MAX_TOLERANCE_METERS)
    }
}

impl Default for GpsConfig {
    fn default() -> Self {
        Self {
            tolerance_meters: default_tolerance(),
        }
    }
}

fn default_tolerance() -> u32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_is_clamped() {
        let config = GpsConfig {
            tolerance_meters: 10_000,
        };
        assert_eq!(config.effective_tolerance(None), 500);
        assert_eq!(GpsConfig::default().effective_tolerance(None), 100);
    }

    #[test]
    fn requested_tolerance_overrides_but_respects_ceiling() {
        let config = GpsConfig::default();
        assert_eq!(config.effective_tolerance(Some(50)), 50);
        assert_eq!(config.effective_tolerance(Some(9_999)), 500);
    }
}
