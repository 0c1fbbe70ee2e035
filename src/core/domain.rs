use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Axis-aligned box `[0, width] × [0, height]` confining every particle.
///
/// Vertical walls sit at `x = 0` and `x = width`, horizontal walls at `y = 0`
/// and `y = height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Domain {
    pub width: f64,
    pub height: f64,
}

impl Default for Domain {
    /// The unit square.
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
        }
    }
}

impl Domain {
    /// Create a domain after checking both extents are finite and positive.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let d = Self { width, height };
        d.validate()?;
        Ok(d)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(Error::InvalidParam(
                "domain width must be finite and > 0".into(),
            ));
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(Error::InvalidParam(
                "domain height must be finite and > 0".into(),
            ));
        }
        Ok(())
    }

    /// Extents indexed by axis (0 = x, 1 = y).
    #[inline]
    pub fn extents(&self) -> [f64; 2] {
        [self.width, self.height]
    }

    /// Whether a disc of `radius` has room to move between each pair of walls.
    pub fn fits_disc(&self, radius: f64) -> bool {
        self.extents().iter().all(|&l| 2.0 * radius < l)
    }

    /// Whether a disc of `radius` centred at `r` lies fully inside the box.
    pub fn contains_disc(&self, r: [f64; 2], radius: f64) -> bool {
        self.extents()
            .iter()
            .zip(r.iter())
            .all(|(&l, &x)| x - radius >= 0.0 && x + radius <= l)
    }
}
