//! Run configuration.
//!
//! Both structs deserialize from JSON with every field optional, so a config
//! file only needs to name what it changes.

use crate::core::Domain;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Confining box.
    pub domain: Domain,
    /// Absolute simulation time at which the run terminates.
    pub time_limit: f64,
    /// Spacing of redraw events; `None` or `0` disables them.
    pub redraw_interval: Option<f64>,
    /// Reject initial states with overlapping discs or discs outside the box.
    pub check_overlap: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            domain: Domain::default(),
            time_limit: 10.0,
            redraw_interval: None,
            check_overlap: true,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        self.domain.validate()?;
        if !self.time_limit.is_finite() || self.time_limit <= 0.0 {
            return Err(Error::InvalidParam(
                "time_limit must be finite and > 0".into(),
            ));
        }
        if let Some(dt) = self.redraw_interval {
            if !dt.is_finite() || dt < 0.0 {
                return Err(Error::InvalidParam(
                    "redraw_interval must be finite and >= 0".into(),
                ));
            }
        }
        Ok(())
    }

    /// Effective redraw period, if redraw is enabled.
    #[inline]
    pub fn redraw_period(&self) -> Option<f64> {
        self.redraw_interval.filter(|&dt| dt > 0.0)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Parameters for generating a random initial configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnParams {
    pub count: usize,
    pub radius: f64,
    pub mass: f64,
    /// Velocity components are drawn uniformly from `[-max_speed, max_speed]`.
    pub max_speed: f64,
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            count: 100,
            radius: 0.01,
            mass: 1.0,
            max_speed: 0.1,
        }
    }
}

impl SpawnParams {
    pub fn validate(&self, domain: &Domain) -> Result<()> {
        if self.count == 0 {
            return Err(Error::InvalidParam("count must be > 0".into()));
        }
        if u32::try_from(self.count).is_err() {
            return Err(Error::InvalidParam(format!(
                "count must fit in u32, got {}",
                self.count
            )));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !self.max_speed.is_finite() || self.max_speed < 0.0 {
            return Err(Error::InvalidParam(
                "max_speed must be finite and >= 0".into(),
            ));
        }
        if !domain.fits_disc(self.radius) {
            return Err(Error::InvalidParam(
                "domain must be wider than 2 * radius in every dimension".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() -> Result<()> {
        let cfg = SimConfig::default();
        cfg.validate()?;
        assert!(cfg.redraw_period().is_none());
        SpawnParams::default().validate(&cfg.domain)?;
        Ok(())
    }

    #[test]
    fn zero_interval_disables_redraw() {
        let cfg = SimConfig {
            redraw_interval: Some(0.0),
            ..SimConfig::default()
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.redraw_period(), None);
    }

    #[test]
    fn rejects_bad_limits() {
        let cfg = SimConfig {
            time_limit: f64::INFINITY,
            ..SimConfig::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = SimConfig {
            redraw_interval: Some(-1.0),
            ..SimConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() -> Result<()> {
        let cfg = SimConfig::from_json_str(
            r#"{ "time_limit": 25.0, "redraw_interval": 0.5, "domain": { "width": 2.0 } }"#,
        )?;
        assert_eq!(cfg.time_limit, 25.0);
        assert_eq!(cfg.redraw_period(), Some(0.5));
        assert_eq!(cfg.domain.width, 2.0);
        assert_eq!(cfg.domain.height, 1.0);
        assert!(cfg.check_overlap);
        Ok(())
    }

    #[test]
    fn invalid_json_values_rejected() {
        let err = SimConfig::from_json_str(r#"{ "time_limit": -3.0 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidParam(_)));
        let err = SimConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn spawn_rejects_oversized_radius() {
        let p = SpawnParams {
            radius: 0.6,
            ..SpawnParams::default()
        };
        let err = p.validate(&Domain::default()).unwrap_err();
        assert!(err.to_string().contains("2 * radius"));
    }
}
