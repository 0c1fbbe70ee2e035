use crate::config::SpawnParams;
use crate::core::particle::DIM;
use crate::core::{Domain, Particle};
use crate::error::{Error, Result};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

const MAX_ATTEMPTS: usize = 1_000_000;

/// Generate `params.count` identical discs at random non-overlapping positions
/// inside `domain`, with velocity components uniform in `[-max_speed, max_speed]`.
///
/// `seed = None` draws a fresh seed from the thread RNG.
pub fn random_particles(
    params: &SpawnParams,
    domain: &Domain,
    seed: Option<u64>,
) -> Result<Vec<Particle>> {
    domain.validate()?;
    params.validate(domain)?;

    let mut rng: StdRng = match seed {
        Some(s) => SeedableRng::seed_from_u64(s),
        None => SeedableRng::seed_from_u64(rng().random()),
    };

    let radius = params.radius;
    let extents = domain.extents();
    let mut particles: Vec<Particle> = Vec::with_capacity(params.count);
    for id in 0..(params.count as u32) {
        let mut attempts = 0usize;
        let r = loop {
            if attempts >= MAX_ATTEMPTS {
                return Err(Error::InvalidParam(format!(
                    "failed to place particle {id} without overlap; try fewer particles or smaller radius"
                )));
            }
            attempts += 1;
            let mut r = [0.0_f64; DIM];
            for (r_k, &l) in r.iter_mut().zip(extents.iter()) {
                *r_k = rng.random_range(radius..=(l - radius));
            }
            if !overlaps_existing(&particles, &r, radius) {
                break r;
            }
        };

        let s = params.max_speed;
        let mut v = [0.0_f64; DIM];
        v.iter_mut().for_each(|x| *x = rng.random_range(-s..=s));

        let color = [rng.random(), rng.random(), rng.random()];
        particles.push(Particle::new(id, r, v, radius, params.mass)?.with_color(color));
    }

    debug!(count = particles.len(), ?seed, "spawned random particles");
    Ok(particles)
}

fn overlaps_existing(existing: &[Particle], r: &[f64; DIM], radius: f64) -> bool {
    existing.iter().any(|p| {
        let min = p.radius() + radius;
        let q = p.position();
        let dx = r[0] - q[0];
        let dy = r[1] - q[1];
        dx * dx + dy * dy < min * min
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_particles() -> Result<()> {
        let params = SpawnParams {
            count: 20,
            ..SpawnParams::default()
        };
        let a = random_particles(&params, &Domain::default(), Some(42))?;
        let b = random_particles(&params, &Domain::default(), Some(42))?;
        for (pa, pb) in a.iter().zip(b.iter()) {
            assert_eq!(pa.position(), pb.position());
            assert_eq!(pa.velocity(), pb.velocity());
        }
        Ok(())
    }

    #[test]
    fn placed_inside_without_overlap() -> Result<()> {
        let params = SpawnParams {
            count: 60,
            radius: 0.03,
            max_speed: 0.5,
            ..SpawnParams::default()
        };
        let dom = Domain::new(2.0, 1.0)?;
        let ps = random_particles(&params, &dom, Some(7))?;
        assert_eq!(ps.len(), 60);
        for (i, p) in ps.iter().enumerate() {
            assert_eq!(p.id() as usize, i);
            assert!(dom.contains_disc(p.position(), p.radius()));
            assert!(p.velocity().iter().all(|c| c.abs() <= 0.5));
            assert!(!overlaps_existing(&ps[..i], &p.position(), p.radius()));
        }
        Ok(())
    }

    #[test]
    fn impossible_packing_fails() {
        let params = SpawnParams {
            count: 10,
            radius: 0.4,
            ..SpawnParams::default()
        };
        let err = random_particles(&params, &Domain::default(), Some(1)).unwrap_err();
        assert!(err.to_string().contains("failed to place"));
    }
}
