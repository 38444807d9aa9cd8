//! Property-based tests for objects and tracks using the `proptest` crate.

use proptest::prelude::*;

use quadcsg::{Object, Point3, Surface, Track, TrackDirection, Vec3};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_point(range: f64) -> impl Strategy<Value = Point3> {
    (-range..range, -range..range, -range..range).prop_map(|(x, y, z)| Point3::new(x, y, z))
}

fn arb_direction() -> impl Strategy<Value = Vec3> {
    (-1.0..1.0f64, -1.0..1.0f64, -1.0..1.0f64)
        .prop_map(|(x, y, z)| Vec3::new(x, y, z))
        .prop_filter("non-degenerate direction", |v| v.norm() > 0.1)
}

fn sphere_minus_cylinder() -> Object {
    Object::from_text(1, "10 -11", &["10 so 4", "11 cz 1"]).unwrap()
}

// ---------------------------------------------------------------------------
// 1. Sphere side matches the distance to the centre
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn sphere_side_matches_radius(
        c in arb_point(5.0),
        r in 0.5..5.0f64,
        p in arb_point(10.0),
    ) {
        let s = Surface::parse(1, &format!("s {} {} {} {}", c.x, c.y, c.z, r)).unwrap();
        let gap = r - (p - c).norm();
        prop_assume!(gap.abs() > 1e-4);
        prop_assert_eq!(s.side(&p), if gap > 0.0 { 1 } else { -1 });
    }
}

// ---------------------------------------------------------------------------
// 2. A ray through the centre meets the sphere a diameter apart
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn ray_through_centre_spans_diameter(
        c in arb_point(5.0),
        r in 0.5..5.0f64,
        d in arb_direction(),
    ) {
        let s = Surface::parse(1, &format!("s {} {} {} {}", c.x, c.y, c.z, r)).unwrap();
        let origin = c - 20.0 * d.normalize();
        let roots = s.intersect_ray(&origin, &d);
        prop_assert_eq!(roots.len(), 2);
        let span = (roots[1] - roots[0]) * d.norm();
        prop_assert!((span - 2.0 * r).abs() < 1e-6, "span {} for radius {}", span, r);
    }
}

// ---------------------------------------------------------------------------
// 3. Tracks alternate entering and leaving and links lie inside
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn track_links_lie_inside(start in arb_point(10.0), d in arb_direction()) {
        let obj = sphere_minus_cylinder();
        prop_assume!(!obj.is_on_side(&start));
        let mut track = Track::new(start, d).unwrap();
        obj.intercept_surface(&mut track);

        let mut inside = obj.is_valid(&start);
        for ic in track.intercepts() {
            let expected = if inside { TrackDirection::Leaving } else { TrackDirection::Entering };
            prop_assert_eq!(ic.direction, expected);
            inside = !inside;
        }

        let mut total = 0.0;
        for link in track.links() {
            let mid = Point3::from((link.entry.coords + link.exit.coords) / 2.0);
            prop_assert!(obj.is_valid(&mid), "link midpoint {:?} is outside", mid);
            total += link.dist_inside;
        }
        prop_assert!((total - track.total_length()).abs() < 1e-9);
    }
}

// ---------------------------------------------------------------------------
// 4. Displacing an object moves its interior with it
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn displacement_moves_interior(p in arb_point(6.0), v in arb_point(3.0)) {
        let obj = sphere_minus_cylinder();
        prop_assume!(!obj.is_on_side(&p));
        let mut moved = obj.clone();
        moved.displace(&v.coords);
        prop_assert_eq!(moved.is_valid(&(p + v.coords)), obj.is_valid(&p));
    }
}
