use collide::core::{Domain, Particle};
use proptest::prelude::*;

/// Two discs placed in contact along direction `theta`.
fn touching(
    ra: f64,
    rb: f64,
    ma: f64,
    mb: f64,
    theta: f64,
    va: (f64, f64),
    vb: (f64, f64),
) -> (Particle, Particle) {
    let sigma = ra + rb;
    let a = Particle::new(0, [0.5, 0.5], [va.0, va.1], ra, ma).expect("valid particle");
    let b = Particle::new(
        1,
        [0.5 + sigma * theta.cos(), 0.5 + sigma * theta.sin()],
        [vb.0, vb.1],
        rb,
        mb,
    )
    .expect("valid particle");
    (a, b)
}

proptest! {
    #[test]
    fn bounce_conserves_momentum_and_energy(
        ra in 0.005f64..0.1,
        rb in 0.005f64..0.1,
        ma in 0.1f64..10.0,
        mb in 0.1f64..10.0,
        theta in 0.0f64..std::f64::consts::TAU,
        va in (-1.0f64..1.0, -1.0f64..1.0),
        vb in (-1.0f64..1.0, -1.0f64..1.0),
    ) {
        let (mut a, mut b) = touching(ra, rb, ma, mb, theta, va, vb);
        let p0 = [a.momentum()[0] + b.momentum()[0], a.momentum()[1] + b.momentum()[1]];
        let e0 = a.kinetic_energy() + b.kinetic_energy();

        a.bounce_off(&mut b).expect("distinct centres");

        let p1 = [a.momentum()[0] + b.momentum()[0], a.momentum()[1] + b.momentum()[1]];
        let e1 = a.kinetic_energy() + b.kinetic_energy();
        prop_assert!((p0[0] - p1[0]).abs() < 1e-9);
        prop_assert!((p0[1] - p1[1]).abs() < 1e-9);
        prop_assert!((e0 - e1).abs() <= 1e-9 * e0 + 1e-15);
        prop_assert_eq!(a.collision_count(), 1);
        prop_assert_eq!(b.collision_count(), 1);
    }

    #[test]
    fn predicted_contact_is_surface_contact(
        ax in 0.1f64..0.4, ay in 0.1f64..0.9,
        bx in 0.6f64..0.9, by in 0.1f64..0.9,
        va in (-1.0f64..1.0, -1.0f64..1.0),
        vb in (-1.0f64..1.0, -1.0f64..1.0),
        ra in 0.01f64..0.08,
        rb in 0.01f64..0.08,
    ) {
        let mut a = Particle::new(0, [ax, ay], [va.0, va.1], ra, 1.0).expect("valid particle");
        let mut b = Particle::new(1, [bx, by], [vb.0, vb.1], rb, 1.0).expect("valid particle");
        let t = a.time_to_hit(&b);
        prop_assert_eq!(t, b.time_to_hit(&a));
        if t.is_finite() {
            prop_assert!(t >= 0.0);
            a.advance(t);
            b.advance(t);
            let (pa, pb) = (a.position(), b.position());
            let d = ((pb[0] - pa[0]).powi(2) + (pb[1] - pa[1]).powi(2)).sqrt();
            prop_assert!((d - (ra + rb)).abs() < 1e-7, "distance {} vs {}", d, ra + rb);
        }
    }

    #[test]
    fn wall_prediction_lands_on_wall(
        x in 0.1f64..0.9, y in 0.1f64..0.9,
        vx in -1.0f64..1.0, vy in -1.0f64..1.0,
        r in 0.01f64..0.09,
    ) {
        let dom = Domain::default();
        let p = Particle::new(0, [x, y], [vx, vy], r, 1.0).expect("valid particle");
        let tv = p.time_to_hit_vertical_wall(&dom);
        if tv.is_finite() {
            let xe = x + vx * tv;
            prop_assert!((xe - r).abs() < 1e-9 || (xe - (1.0 - r)).abs() < 1e-9);
        } else {
            prop_assert_eq!(vx, 0.0);
        }
        let th = p.time_to_hit_horizontal_wall(&dom);
        if th.is_finite() {
            let ye = y + vy * th;
            prop_assert!((ye - r).abs() < 1e-9 || (ye - (1.0 - r)).abs() < 1e-9);
        } else {
            prop_assert_eq!(vy, 0.0);
        }
    }
}
