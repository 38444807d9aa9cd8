//! Arbitrary quadric given directly by its ten coefficients.

use std::fmt;

use quadcsg_math::{Matrix3, Point3, Vec3};

use crate::{QuadricEqn, QuadricSurface, SurfaceKind};

/// Iteration cap for the projection in [`GeneralQuadric::distance`].
const MAX_PROJECTION_STEPS: usize = 50;

/// A general quadric `f(x) = 0`, inside where `f < 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralQuadric {
    /// The defining equation.
    pub eqn: QuadricEqn,
}

impl GeneralQuadric {
    /// Quadric from its equation.
    pub fn new(eqn: QuadricEqn) -> Self {
        Self { eqn }
    }

    /// Project `p` onto the surface by Newton steps along the gradient.
    ///
    /// Returns `None` if a singular point is hit or the iteration does not
    /// settle.
    fn project(&self, p: &Point3) -> Option<Point3> {
        let mut x = *p;
        for _ in 0..MAX_PROJECTION_STEPS {
            let f = self.eqn.value(&x);
            let g = self.eqn.gradient(&x);
            let g2 = g.norm_squared();
            if g2 < 1e-24 {
                return None;
            }
            let step = g * (f / g2);
            x -= step;
            if step.norm() < 1e-12 {
                return Some(x);
            }
        }
        let f = self.eqn.value(&x);
        (f.abs() < 1e-9).then_some(x)
    }
}

impl QuadricSurface for GeneralQuadric {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::General
    }

    fn equation(&self) -> QuadricEqn {
        self.eqn
    }

    /// First-order estimate `f / |∇f|`; exact for planes.
    fn signed_distance(&self, p: &Point3) -> f64 {
        let f = self.eqn.value(p);
        let g = self.eqn.gradient(p).norm();
        if g < 1e-12 {
            f
        } else {
            f / g
        }
    }

    fn distance(&self, p: &Point3) -> f64 {
        match self.project(p) {
            Some(foot) => (foot - p).norm(),
            None => self.signed_distance(p).abs(),
        }
    }

    fn intersect_ray(&self, origin: &Point3, direction: &Vec3) -> Vec<f64> {
        self.eqn.intersect_ray(origin, direction)
    }

    fn displace(&mut self, v: &Vec3) {
        self.eqn = self.eqn.transformed(&Matrix3::identity(), v);
    }

    fn rotate(&mut self, m: &Matrix3) {
        self.eqn = self.eqn.transformed(m, &Vec3::zeros());
    }
}

impl fmt::Display for GeneralQuadric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gq {}", self.eqn)
    }
}
