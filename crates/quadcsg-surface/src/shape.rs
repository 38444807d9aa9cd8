//! The capability shared by every surface type and the sum type over them.

use std::fmt;

use quadcsg_math::{Dir3, Matrix3, Point3, Vec3};

use crate::{Cone, Cylinder, GeneralQuadric, Plane, QuadricEqn, Sphere};

/// The kind of a surface (for match-based dispatch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// Infinite plane.
    Plane,
    /// Sphere.
    Sphere,
    /// Infinite circular cylinder.
    Cylinder,
    /// Infinite double cone.
    Cone,
    /// Arbitrary second-degree surface.
    General,
}

/// Operations every analytic surface provides in closed form.
pub trait QuadricSurface: Send + Sync + fmt::Debug {
    /// The kind of this surface.
    fn kind(&self) -> SurfaceKind;

    /// Coefficient form derived from the canonical parameters.
    fn equation(&self) -> QuadricEqn;

    /// Signed distance to the surface: negative inside, positive outside.
    fn signed_distance(&self, p: &Point3) -> f64;

    /// Unsigned minimum distance from `p` to the surface.
    fn distance(&self, p: &Point3) -> f64 {
        self.signed_distance(p).abs()
    }

    /// All ray parameters `t` where `origin + t·direction` lies on the surface,
    /// ascending. Negative parameters are included.
    fn intersect_ray(&self, origin: &Point3, direction: &Vec3) -> Vec<f64>;

    /// Translate the surface by `v`.
    fn displace(&mut self, v: &Vec3);

    /// Rotate the surface about the origin by the proper rotation `m`.
    fn rotate(&mut self, m: &Matrix3);
}

/// A concrete surface: one of the supported quadric types.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Infinite plane.
    Plane(Plane),
    /// Sphere.
    Sphere(Sphere),
    /// Infinite cylinder.
    Cylinder(Cylinder),
    /// Infinite double cone.
    Cone(Cone),
    /// General quadric.
    General(GeneralQuadric),
}

impl Shape {
    /// Borrow the variant through its capability interface.
    pub fn as_quadric(&self) -> &dyn QuadricSurface {
        match self {
            Shape::Plane(s) => s,
            Shape::Sphere(s) => s,
            Shape::Cylinder(s) => s,
            Shape::Cone(s) => s,
            Shape::General(s) => s,
        }
    }

    fn as_quadric_mut(&mut self) -> &mut dyn QuadricSurface {
        match self {
            Shape::Plane(s) => s,
            Shape::Sphere(s) => s,
            Shape::Cylinder(s) => s,
            Shape::Cone(s) => s,
            Shape::General(s) => s,
        }
    }

    /// The kind of this shape.
    pub fn kind(&self) -> SurfaceKind {
        self.as_quadric().kind()
    }

    /// Coefficient form of this shape.
    pub fn equation(&self) -> QuadricEqn {
        self.as_quadric().equation()
    }

    /// Translate by `v`.
    pub fn displace(&mut self, v: &Vec3) {
        self.as_quadric_mut().displace(v);
    }

    /// Rotate about the origin by `m`.
    pub fn rotate(&mut self, m: &Matrix3) {
        self.as_quadric_mut().rotate(m);
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Plane(s) => fmt::Display::fmt(s, f),
            Shape::Sphere(s) => fmt::Display::fmt(s, f),
            Shape::Cylinder(s) => fmt::Display::fmt(s, f),
            Shape::Cone(s) => fmt::Display::fmt(s, f),
            Shape::General(s) => fmt::Display::fmt(s, f),
        }
    }
}

macro_rules! impl_from_shape {
    ($($variant:ident => $ty:ty),*) => {
        $(impl From<$ty> for Shape {
            fn from(s: $ty) -> Self {
                Shape::$variant(s)
            }
        })*
    };
}

impl_from_shape!(
    Plane => Plane,
    Sphere => Sphere,
    Cylinder => Cylinder,
    Cone => Cone,
    General => GeneralQuadric
);

pub(crate) const AXIS_NAMES: [char; 3] = ['x', 'y', 'z'];

/// Index of the coordinate axis `d` is (anti)parallel to, if any.
pub(crate) fn aligned_axis(d: &Dir3) -> Option<usize> {
    (0..3).find(|&i| (d[i].abs() - 1.0).abs() < 1e-12)
}

/// Unit vector along coordinate axis `i`.
pub(crate) fn unit_axis(i: usize) -> Dir3 {
    let mut v = Vec3::zeros();
    v[i] = 1.0;
    Dir3::new_unchecked(v)
}

/// The two coordinate indices other than `i`, in ascending order.
pub(crate) fn other_axes(i: usize) -> (usize, usize) {
    match i {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    }
}
