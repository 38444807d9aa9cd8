//! Infinite double cone given by apex, axis and half-angle.

use std::fmt;

use quadcsg_math::{solve_quadratic, Dir3, Matrix3, Point3, Vec3};

use crate::shape::{aligned_axis, other_axes, AXIS_NAMES};
use crate::{QuadricEqn, QuadricSurface, SurfaceKind};

/// A double cone. Both nappes belong to the surface; the inside is the
/// region around the axis, `angle(p - apex, ±axis) < half_angle`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cone {
    /// Apex point.
    pub apex: Point3,
    /// Axis direction (sign is irrelevant).
    pub axis: Dir3,
    /// Half-angle in radians, strictly between 0 and π/2.
    pub half_angle: f64,
}

impl Cone {
    /// Cone with apex, axis and half-angle (radians).
    pub fn new(apex: Point3, axis: Dir3, half_angle: f64) -> Self {
        Self {
            apex,
            axis,
            half_angle,
        }
    }

    /// Cone from `tan²` of its half-angle.
    pub fn from_tan_squared(apex: Point3, axis: Dir3, t2: f64) -> Self {
        Self::new(apex, axis, t2.sqrt().atan())
    }

    /// `tan²` of the half-angle.
    pub fn tan_squared(&self) -> f64 {
        let t = self.half_angle.tan();
        t * t
    }
}

impl QuadricSurface for Cone {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Cone
    }

    fn equation(&self) -> QuadricEqn {
        let cos2 = self.half_angle.cos().powi(2);
        let a = self.axis.into_inner();
        let m = cos2 * Matrix3::identity() - a * a.transpose();
        let c = self.apex.coords;
        let mc = m * c;
        QuadricEqn::from_parts(&m, &(-2.0 * mc), c.dot(&mc))
    }

    fn signed_distance(&self, p: &Point3) -> f64 {
        let w = p - self.apex;
        let h = w.dot(&self.axis);
        let rho = (w - h * self.axis.into_inner()).norm();
        let (sin_a, cos_a) = self.half_angle.sin_cos();
        rho * cos_a - h.abs() * sin_a
    }

    fn intersect_ray(&self, origin: &Point3, direction: &Vec3) -> Vec<f64> {
        let axis = self.axis.as_ref();
        let co = origin - self.apex;
        let cos2 = self.half_angle.cos().powi(2);

        // ((P - apex)·axis)^2 = |P - apex|^2 cos^2(half_angle), P = origin + t*d
        let d_dot_a = direction.dot(axis);
        let co_dot_a = co.dot(axis);

        let a = d_dot_a * d_dot_a - cos2 * direction.dot(direction);
        let b = 2.0 * (d_dot_a * co_dot_a - cos2 * direction.dot(&co));
        let c = co_dot_a * co_dot_a - cos2 * co.dot(&co);

        solve_quadratic(a, b, c)
    }

    fn displace(&mut self, v: &Vec3) {
        self.apex += v;
    }

    fn rotate(&mut self, m: &Matrix3) {
        self.apex = Point3::from(m * self.apex.coords);
        self.axis = Dir3::new_normalize(m * self.axis.into_inner());
    }
}

impl fmt::Display for Cone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.apex;
        if let Some(i) = aligned_axis(&self.axis) {
            let (u, v) = other_axes(i);
            let t2 = self.tan_squared();
            return if p[u] == 0.0 && p[v] == 0.0 {
                write!(f, "k{} {} {}", AXIS_NAMES[i], p[i], t2)
            } else {
                write!(f, "k/{} {} {} {} {}", AXIS_NAMES[i], p.x, p.y, p.z, t2)
            };
        }
        let a = self.axis;
        write!(
            f,
            "k {} {} {} {} {} {} {}",
            p.x,
            p.y,
            p.z,
            a.x,
            a.y,
            a.z,
            self.half_angle.to_degrees()
        )
    }
}
