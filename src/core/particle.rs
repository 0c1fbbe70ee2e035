use crate::core::domain::Domain;
use crate::error::{Error, Result};

/// Fixed spatial dimension (2D).
pub const DIM: usize = 2;

/// A hard disc moving freely between instantaneous elastic collisions.
///
/// Radius and mass are fixed at construction. Position and velocity change only
/// through [`Particle::advance`] and the `bounce_off*` family, each of which
/// also maintains the collision counter used to invalidate predicted events.
#[derive(Debug, Clone)]
pub struct Particle {
    id: u32,
    r: [f64; DIM],
    v: [f64; DIM],
    radius: f64,
    mass: f64,
    collision_count: u64,
    /// Display colour handed to renderers; has no physical meaning.
    pub color: [u8; 3],
}

impl Particle {
    /// Create a new particle after validating invariants.
    ///
    /// `id` is the particle's slot in the simulation arena.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `radius` or `mass` is non-positive or any component is NaN/inf.
    pub fn new(id: u32, r: [f64; DIM], v: [f64; DIM], radius: f64, mass: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !r.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !v.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self {
            id,
            r,
            v,
            radius,
            mass,
            collision_count: 0,
            color: [0, 0, 0],
        })
    }

    /// Builder-style display colour.
    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn position(&self) -> [f64; DIM] {
        self.r
    }

    #[inline]
    pub fn velocity(&self) -> [f64; DIM] {
        self.v
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Number of collisions (wall or particle) this particle has taken part in.
    #[inline]
    pub fn collision_count(&self) -> u64 {
        self.collision_count
    }

    #[inline]
    fn bump_collision_count(&mut self) {
        self.collision_count = self.collision_count.saturating_add(1);
    }

    /// Move in a straight line for `dt` time units.
    #[inline]
    pub fn advance(&mut self, dt: f64) {
        debug_assert!(dt >= 0.0, "cannot advance backwards in time");
        for (rk, &vk) in self.r.iter_mut().zip(self.v.iter()) {
            *rk += vk * dt;
        }
    }

    /// Time until the surfaces of `self` and `other` touch, assuming both keep
    /// their current velocities. Infinite if they never meet.
    pub fn time_to_hit(&self, other: &Particle) -> f64 {
        if self.id == other.id {
            return f64::INFINITY;
        }
        let dx = other.r[0] - self.r[0];
        let dy = other.r[1] - self.r[1];
        let dvx = other.v[0] - self.v[0];
        let dvy = other.v[1] - self.v[1];

        let dvdr = dx * dvx + dy * dvy;
        if dvdr > 0.0 {
            return f64::INFINITY;
        }
        let dvdv = dvx * dvx + dvy * dvy;
        if dvdv == 0.0 {
            return f64::INFINITY;
        }
        let drdr = dx * dx + dy * dy;
        let sigma = self.radius + other.radius;
        if drdr < sigma * sigma && dvdr < 0.0 {
            // Already in contact (rounding) and still closing.
            return 0.0;
        }
        let d = dvdr * dvdr - dvdv * (drdr - sigma * sigma);
        if d < 0.0 {
            return f64::INFINITY;
        }
        let t = -(dvdr + d.sqrt()) / dvdv;
        // Negative root: coincident centres.
        if t < 0.0 || !t.is_finite() {
            return f64::INFINITY;
        }
        t
    }

    /// Time until this particle touches the left or right wall.
    #[inline]
    pub fn time_to_hit_vertical_wall(&self, domain: &Domain) -> f64 {
        time_to_wall(self.r[0], self.v[0], self.radius, domain.width)
    }

    /// Time until this particle touches the bottom or top wall.
    #[inline]
    pub fn time_to_hit_horizontal_wall(&self, domain: &Domain) -> f64 {
        time_to_wall(self.r[1], self.v[1], self.radius, domain.height)
    }

    /// Resolve an elastic collision between two touching discs.
    ///
    /// The impulse acts along the line of centres, so total momentum and
    /// kinetic energy are conserved. Both collision counts are incremented.
    ///
    /// Errors:
    /// - `Error::MathError` if the centres coincide (no contact normal); neither particle changes.
    pub fn bounce_off(&mut self, other: &mut Particle) -> Result<()> {
        let dx = other.r[0] - self.r[0];
        let dy = other.r[1] - self.r[1];
        let dvx = other.v[0] - self.v[0];
        let dvy = other.v[1] - self.v[1];
        let dvdr = dx * dvx + dy * dvy;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist == 0.0 {
            return Err(Error::MathError(format!(
                "particles {} and {} share a centre",
                self.id, other.id
            )));
        }

        let magnitude = 2.0 * self.mass * other.mass * dvdr / ((self.mass + other.mass) * dist);
        let fx = magnitude * dx / dist;
        let fy = magnitude * dy / dist;

        self.v[0] += fx / self.mass;
        self.v[1] += fy / self.mass;
        other.v[0] -= fx / other.mass;
        other.v[1] -= fy / other.mass;

        self.bump_collision_count();
        other.bump_collision_count();
        Ok(())
    }

    /// Specular reflection off a vertical wall.
    #[inline]
    pub fn bounce_off_vertical_wall(&mut self) {
        self.v[0] = -self.v[0];
        self.bump_collision_count();
    }

    /// Specular reflection off a horizontal wall.
    #[inline]
    pub fn bounce_off_horizontal_wall(&mut self) {
        self.v[1] = -self.v[1];
        self.bump_collision_count();
    }

    /// Returns the particle's kinetic energy: 1/2 m |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        let vsq: f64 = self.v.iter().map(|&c| c * c).sum();
        0.5 * self.mass * vsq
    }

    /// Linear momentum m v.
    #[inline]
    pub fn momentum(&self) -> [f64; DIM] {
        [self.mass * self.v[0], self.mass * self.v[1]]
    }
}

/// Contact time along one axis for a disc at `x` moving at `v` between walls
/// at `0` and `extent`. A disc already past contact and still moving outward
/// hits immediately.
#[inline]
fn time_to_wall(x: f64, v: f64, radius: f64, extent: f64) -> f64 {
    let t = if v > 0.0 {
        (extent - x - radius) / v
    } else if v < 0.0 {
        (radius - x) / v
    } else {
        return f64::INFINITY;
    };
    if t.is_finite() {
        t.max(0.0)
    } else {
        f64::INFINITY
    }
}
